//! Booking flow error rendering.

use cinemates::errors::FlowError;
use salvo::prelude::StatusError;

/// Attach the customer-facing message of a [`FlowError`], plus the offending field or the step
/// to redirect to.
pub(crate) trait FlowErrorExt {
    fn into_status_error(self, status: StatusError) -> StatusError;
}

impl FlowErrorExt for FlowError {
    fn into_status_error(self, status: StatusError) -> StatusError {
        let status = status.brief(self.user_message());

        if let FlowError::Validation { field, .. } = &self {
            return status.detail(format!("field={field}"));
        }

        match self.redirect_to() {
            Some(step) => status.detail(format!("redirect_to={step}")),
            None => status,
        }
    }
}

#[cfg(test)]
mod tests {
    use cinemates::wizard::DraftField;

    use super::*;

    #[test]
    fn conflict_carries_message_and_redirect() {
        let status = FlowError::SlotConflict.into_status_error(StatusError::conflict());

        assert_eq!(
            status.brief,
            "This slot has just been booked. Please choose another slot."
        );
        assert_eq!(status.detail.as_deref(), Some("redirect_to=theater"));
    }

    #[test]
    fn missing_precondition_redirects_to_its_step() {
        let status = FlowError::PreconditionMissing {
            field: DraftField::Customer,
        }
        .into_status_error(StatusError::bad_request());

        assert_eq!(status.detail.as_deref(), Some("redirect_to=contact"));
    }

    #[test]
    fn validation_names_the_field() {
        let status = FlowError::Validation {
            field: "email",
            message: "email is required".to_string(),
        }
        .into_status_error(StatusError::bad_request());

        assert_eq!(status.brief, "email is required");
        assert_eq!(status.detail.as_deref(), Some("field=email"));
    }

    #[test]
    fn support_errors_have_no_redirect() {
        let status = FlowError::VerificationFailed.into_status_error(StatusError::bad_request());

        assert!(status.detail.is_none(), "expected no redirect");
    }
}
