//! My Bookings Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::bookings::models::Booking;

use crate::{bookings::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingResponse {
    pub uuid: Uuid,
    pub booking_name: String,
    pub theater_uuid: Uuid,
    pub location_uuid: Uuid,

    /// YYYY-MM-DD
    pub booked_date: String,
    pub booked_slot: String,

    /// Amount paid, in paise
    pub amount: u64,
    pub discount: u64,
    pub coupon_code: Option<String>,

    /// "online" or "offline"
    pub booked_type: String,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            uuid: booking.uuid.into(),
            booking_name: booking.booking_name,
            theater_uuid: booking.theater_uuid.into(),
            location_uuid: booking.location_uuid.into(),
            booked_date: booking.booked_date.to_string(),
            booked_slot: booking.booked_slot,
            amount: booking.amount,
            discount: booking.discount,
            coupon_code: booking.coupon_code,
            booked_type: booking.booked_type.to_string(),
            created_at: booking.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingsResponse {
    pub bookings: Vec<BookingResponse>,
}

/// My Bookings Handler
///
/// Returns finalized bookings made with a phone number, newest first.
#[endpoint(
    tags("bookings"),
    summary = "List Bookings For Phone",
    responses(
        (status_code = StatusCode::OK, description = "Bookings"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing phone"),
    ),
)]
pub(crate) async fn handler(
    phone: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<BookingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let phone = phone
        .into_inner()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| StatusError::bad_request().brief("phone is required"))?;

    let bookings = state
        .bookings
        .list_for_phone(&phone)
        .await
        .map_err(into_status_error)?;

    Ok(Json(BookingsResponse {
        bookings: bookings.into_iter().map(Into::into).collect(),
    }))
}
