//! Save Occasion Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::customers::models::OccasionSelection;

use crate::{customers::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaveOccasionRequest {
    pub customer_uuid: Uuid,
    pub occasion_name: String,

    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(default)]
    pub partner_nickname: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OccasionResponse {
    pub occasion_name: String,
    pub nickname: Option<String>,
    pub partner_nickname: Option<String>,
}

impl From<OccasionSelection> for OccasionResponse {
    fn from(occasion: OccasionSelection) -> Self {
        Self {
            occasion_name: occasion.occasion_name,
            nickname: occasion.nickname,
            partner_nickname: occasion.partner_nickname,
        }
    }
}

/// Save Occasion Handler
///
/// Sets the customer's occasion, replacing any earlier choice.
#[endpoint(tags("bookings"), summary = "Save Occasion")]
pub(crate) async fn handler(
    json: JsonBody<SaveOccasionRequest>,
    depot: &mut Depot,
) -> Result<Json<OccasionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let occasion = OccasionSelection {
        occasion_name: request.occasion_name.trim().to_string(),
        nickname: non_blank(request.nickname),
        partner_nickname: non_blank(request.partner_nickname),
    };

    let saved = state
        .customers
        .save_occasion(request.customer_uuid.into(), occasion)
        .await
        .map_err(into_status_error)?;

    Ok(Json(saved.into()))
}
