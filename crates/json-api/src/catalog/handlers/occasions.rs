//! Occasion Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::catalog::models::Occasion;

use crate::{catalog::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OccasionResponse {
    pub uuid: Uuid,
    pub name: String,
    pub image_url: Option<String>,
}

impl From<Occasion> for OccasionResponse {
    fn from(occasion: Occasion) -> Self {
        Self {
            uuid: occasion.uuid.into(),
            name: occasion.name,
            image_url: occasion.image_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OccasionsResponse {
    pub occasions: Vec<OccasionResponse>,
}

/// Occasion Index Handler
#[endpoint(tags("catalog"), summary = "List Occasions")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OccasionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let occasions = state
        .catalog
        .list_occasions()
        .await
        .map_err(into_status_error)?;

    Ok(Json(OccasionsResponse {
        occasions: occasions.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use cinemates_app::domain::catalog::models::OccasionUuid;

    use crate::test_helpers::Mocks;

    use super::*;

    #[tokio::test]
    async fn test_index_returns_occasions() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.catalog.expect_list_occasions().once().return_once(|| {
            Ok(vec![Occasion {
                uuid: OccasionUuid::new(),
                name: "Birthday".to_string(),
                image_url: None,
            }])
        });

        let mut res = TestClient::get("http://example.com/occasions")
            .send(&mocks.service(Router::with_path("occasions").get(handler)))
            .await;

        let body: OccasionsResponse = res.take_json().await?;

        assert_eq!(
            body.occasions.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(),
            vec!["Birthday"]
        );

        Ok(())
    }
}
