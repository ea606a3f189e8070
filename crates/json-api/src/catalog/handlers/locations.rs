//! Location Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::catalog::models::Location;

use crate::{catalog::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocationResponse {
    pub uuid: Uuid,
    pub name: String,
    pub address: String,
    pub parking_available: bool,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            uuid: location.uuid.into(),
            name: location.name,
            address: location.address,
            parking_available: location.parking_available,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocationsResponse {
    /// Public locations, by name
    pub locations: Vec<LocationResponse>,
}

/// Location Index Handler
///
/// Returns the locations customers can book at.
#[endpoint(tags("catalog"), summary = "List Locations")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<LocationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let locations = state
        .catalog
        .list_locations()
        .await
        .map_err(into_status_error)?;

    Ok(Json(LocationsResponse {
        locations: locations.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use cinemates_app::domain::catalog::{CatalogServiceError, models::LocationUuid};

    use crate::test_helpers::{Mocks, sql_error};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("locations").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_locations() -> TestResult {
        let uuid = LocationUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_list_locations()
            .once()
            .return_once(move || {
                Ok(vec![Location {
                    uuid,
                    name: "Indiranagar".to_string(),
                    address: "100 Feet Road".to_string(),
                    parking_available: true,
                }])
            });

        let mut res = TestClient::get("http://example.com/locations")
            .send(&make_service(mocks))
            .await;

        let body: LocationsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.locations.len(), 1);
        assert_eq!(
            body.locations.first().map(|l| l.uuid),
            Some(uuid.into_uuid())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_failure_returns_503() {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_list_locations()
            .once()
            .return_once(|| Err(CatalogServiceError::Sql(sql_error())));

        let res = TestClient::get("http://example.com/locations")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));
    }
}
