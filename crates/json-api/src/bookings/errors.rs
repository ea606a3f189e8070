//! Booking Errors

use salvo::http::StatusError;
use tracing::error;

use cinemates_app::domain::bookings::BookingsServiceError;

pub(crate) fn into_status_error(error: BookingsServiceError) -> StatusError {
    match error {
        BookingsServiceError::NotFound => StatusError::not_found().brief("Booking not found"),
        BookingsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Payment already finalized a booking")
        }
        BookingsServiceError::InvalidReference
        | BookingsServiceError::MissingRequiredData
        | BookingsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid booking request")
        }
        BookingsServiceError::Sql(source) => {
            error!("failed to load bookings: {source}");

            StatusError::internal_server_error()
        }
    }
}
