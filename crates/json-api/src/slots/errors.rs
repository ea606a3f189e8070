//! Slot Errors

use cinemates::errors::FlowError;
use salvo::http::StatusError;
use tracing::error;

use cinemates_app::domain::slots::SlotsServiceError;

use crate::{extensions::*, observability::SlotOutcome};

pub(crate) fn outcome(error: &SlotsServiceError) -> SlotOutcome {
    match error {
        SlotsServiceError::Conflict => SlotOutcome::Conflict,
        SlotsServiceError::Sql(_) => SlotOutcome::Error,
        SlotsServiceError::NotFound
        | SlotsServiceError::InvalidReference
        | SlotsServiceError::MissingRequiredData
        | SlotsServiceError::InvalidData
        | SlotsServiceError::Validation(_) => SlotOutcome::Rejected,
    }
}

pub(crate) fn into_status_error(error: SlotsServiceError) -> StatusError {
    match error {
        SlotsServiceError::Conflict => {
            FlowError::SlotConflict.into_status_error(StatusError::conflict())
        }
        SlotsServiceError::Validation(source) => {
            FlowError::from(source).into_status_error(StatusError::bad_request())
        }
        SlotsServiceError::InvalidReference => FlowError::Validation {
            field: "theater",
            message: "This theater is not available at the selected location.".to_string(),
        }
        .into_status_error(StatusError::bad_request()),
        SlotsServiceError::NotFound => StatusError::not_found().brief("Reservation not found"),
        SlotsServiceError::MissingRequiredData | SlotsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid reservation request")
        }
        SlotsServiceError::Sql(source) => {
            error!("failed to reserve slot: {source}");

            StatusError::internal_server_error()
        }
    }
}
