//! Create Booking Draft Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::customers::models::{CustomerUuid, NewCustomer};

use crate::{customers::errors::into_status_error, extensions::*, state::State};

/// Contact details entered on the first step.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateBookingRequest {
    pub booking_name: String,
    pub number_of_persons: u32,
    pub email: String,
    pub phone: String,

    #[serde(default)]
    pub alternate_phone: Option<String>,

    #[serde(default)]
    pub decoration_needed: bool,

    /// Theater already chosen, if any; its capacity bounds the party size
    #[serde(default)]
    pub theater_uuid: Option<Uuid>,
}

impl From<CreateBookingRequest> for NewCustomer {
    fn from(request: CreateBookingRequest) -> Self {
        NewCustomer {
            uuid: CustomerUuid::new(),
            booking_name: request.booking_name.trim().to_string(),
            number_of_persons: request.number_of_persons,
            email: request.email.trim().to_string(),
            phone: request.phone.trim().to_string(),
            alternate_phone: request
                .alternate_phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            decoration_needed: request.decoration_needed,
            theater_uuid: request.theater_uuid.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingCreatedResponse {
    /// Customer the rest of the draft is saved under
    pub customer_uuid: Uuid,
}

/// Create Booking Draft Handler
///
/// Registers the customer's contact details and returns the customer id.
#[endpoint(
    tags("bookings"),
    summary = "Start Booking",
    responses(
        (status_code = StatusCode::CREATED, description = "Customer created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid contact details"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateBookingRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BookingCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let customer = state
        .customers
        .create_customer(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(BookingCreatedResponse {
        customer_uuid: customer.uuid.into(),
    }))
}
