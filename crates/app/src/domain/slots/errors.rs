//! Slots service errors.

use cinemates::slots::SlotKeyError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlotsServiceError {
    /// The natural key is already reserved, either found by the pre-check or
    /// rejected by the unique constraint.
    #[error("slot is already reserved")]
    Conflict,

    #[error("reservation not found")]
    NotFound,

    #[error("theater or location not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Validation(#[from] SlotKeyError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SlotsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
