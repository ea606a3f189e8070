//! Check And Reserve Handler

use std::sync::Arc;

use cinemates::{errors::FlowError, slots::SlotKey};
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use cinemates_app::domain::slots::models::SlotReservation;

use crate::{
    extensions::*,
    observability::SlotOutcome,
    slots::errors::{into_status_error, outcome},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReserveSlotRequest {
    pub theater_uuid: Uuid,
    pub location_uuid: Uuid,

    /// YYYY-MM-DD
    pub date: String,
    pub slot: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReservationResponse {
    pub uuid: Uuid,
    pub theater_uuid: Uuid,
    pub location_uuid: Uuid,
    pub date: String,
    pub slot: String,
}

impl From<SlotReservation> for ReservationResponse {
    fn from(reservation: SlotReservation) -> Self {
        Self {
            uuid: reservation.uuid.into(),
            theater_uuid: reservation.theater_uuid.into(),
            location_uuid: reservation.location_uuid.into(),
            date: reservation.booked_date.to_string(),
            slot: reservation.booked_slot,
        }
    }
}

/// Check And Reserve Handler
///
/// Reserves the slot for this booking. Exactly one of any number of concurrent requests for the
/// same theater, location, date and slot succeeds; the rest get `409`.
#[endpoint(
    tags("slots"),
    summary = "Check And Reserve Slot",
    responses(
        (status_code = StatusCode::OK, description = "Slot reserved"),
        (status_code = StatusCode::CONFLICT, description = "Slot already booked"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid date, slot or theater"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ReserveSlotRequest>,
    depot: &mut Depot,
) -> Result<Json<ReservationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let key = SlotKey::parse(
        request.theater_uuid,
        request.location_uuid,
        &request.date,
        &request.slot,
    )
    .map_err(|error| {
        SlotOutcome::Rejected.record();

        FlowError::from(error).into_status_error(StatusError::bad_request())
    })?;

    let reservation = match state.slots.check_and_reserve(key.clone()).await {
        Ok(reservation) => reservation,
        Err(error) => {
            outcome(&error).record();

            info!(
                theater = %key.theater_uuid,
                date = %key.date,
                slot = %key.slot,
                %error,
                "slot not reserved"
            );

            return Err(into_status_error(error));
        }
    };

    SlotOutcome::Reserved.record();

    Ok(Json(reservation.into()))
}
