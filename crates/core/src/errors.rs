//! Booking flow errors
//!
//! Every failure a customer can see while booking falls into one of the [`FlowError`] categories.
//! None of them is retried automatically: each either names a corrective action or tells the
//! customer to contact support.

use thiserror::Error;

use crate::{
    cakes::WeightError,
    coupons::CouponError,
    payment::PaymentFailure,
    signature::SignatureError,
    slots::SlotKeyError,
    wizard::{DraftField, WizardStep},
};

/// Customer-facing error categories of the booking flow.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FlowError {
    /// Malformed or missing input, shown next to the offending field.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Field the message belongs to.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The slot was taken, either before or during the reservation attempt.
    #[error("slot already booked")]
    SlotConflict,

    /// A backing service could not be reached.
    #[error("upstream unavailable")]
    UpstreamUnavailable,

    /// The payment signature did not match.
    #[error("payment signature mismatch")]
    SignatureMismatch,

    /// The payment could not be verified.
    #[error("payment verification failed")]
    VerificationFailed,

    /// The payment was captured but the booking could not be saved.
    #[error("booking not saved after payment")]
    BookingNotSaved,

    /// The draft is incomplete for the requested step.
    #[error("{field} must be selected first")]
    PreconditionMissing {
        /// Missing field.
        field: DraftField,
    },
}

impl FlowError {
    /// Message shown to the customer.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Validation { message, .. } => message.clone(),
            FlowError::SlotConflict => {
                "This slot has just been booked. Please choose another slot.".to_string()
            }
            FlowError::UpstreamUnavailable => {
                "We could not load this right now. Please try again.".to_string()
            }
            FlowError::SignatureMismatch => {
                PaymentFailure::SignatureMismatch.user_message().to_string()
            }
            FlowError::VerificationFailed => {
                PaymentFailure::VerificationUnreachable.user_message().to_string()
            }
            FlowError::BookingNotSaved => {
                PaymentFailure::PersistenceFailed.user_message().to_string()
            }
            FlowError::PreconditionMissing { field } => {
                format!("Please select a {field} first.")
            }
        }
    }

    /// Step to redirect to, when the error is fixed by revisiting a step.
    pub fn redirect_to(&self) -> Option<WizardStep> {
        match self {
            FlowError::PreconditionMissing { field } => Some(field.populated_by()),
            FlowError::SlotConflict => Some(WizardStep::Theater),
            _ => None,
        }
    }

    /// Whether the customer can recover without contacting support.
    pub fn is_user_correctable(&self) -> bool {
        !matches!(
            self,
            FlowError::SignatureMismatch
                | FlowError::VerificationFailed
                | FlowError::BookingNotSaved
        )
    }
}

impl From<SlotKeyError> for FlowError {
    fn from(error: SlotKeyError) -> Self {
        let field = match error {
            SlotKeyError::InvalidDate(_) | SlotKeyError::InPast { .. } => "date",
            SlotKeyError::EmptySlot | SlotKeyError::SlotTooLong | SlotKeyError::NotOffered { .. } => {
                "slot"
            }
        };

        FlowError::Validation {
            field,
            message: error.to_string(),
        }
    }
}

impl From<WeightError> for FlowError {
    fn from(error: WeightError) -> Self {
        FlowError::Validation {
            field: "weight",
            message: error.to_string(),
        }
    }
}

impl From<CouponError> for FlowError {
    fn from(error: CouponError) -> Self {
        FlowError::Validation {
            field: "coupon",
            message: error.to_string(),
        }
    }
}

impl From<SignatureError> for FlowError {
    fn from(_error: SignatureError) -> Self {
        FlowError::SignatureMismatch
    }
}

impl From<PaymentFailure> for FlowError {
    fn from(failure: PaymentFailure) -> Self {
        match failure {
            PaymentFailure::PreconditionMissing { field } => {
                FlowError::PreconditionMissing { field }
            }
            PaymentFailure::InvalidAmount
            | PaymentFailure::OrderMismatch
            | PaymentFailure::Cancelled => FlowError::Validation {
                field: "payment",
                message: failure.user_message().to_string(),
            },
            PaymentFailure::GatewayUnavailable | PaymentFailure::OrderFailed { .. } => {
                FlowError::UpstreamUnavailable
            }
            PaymentFailure::SignatureMismatch => FlowError::SignatureMismatch,
            PaymentFailure::VerificationUnreachable => FlowError::VerificationFailed,
            PaymentFailure::PersistenceFailed => FlowError::BookingNotSaved,
        }
    }
}
