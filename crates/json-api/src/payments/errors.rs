//! Payment Errors

use cinemates::errors::FlowError;
use salvo::http::StatusError;
use tracing::{Level, error};

use cinemates_app::domain::payments::PaymentsServiceError;

use crate::{extensions::*, observability::PaymentOutcome};

pub(crate) fn status_for(error: &PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::InvalidAmount
        | PaymentsServiceError::PriceMismatch { .. }
        | PaymentsServiceError::OrderMismatch { .. }
        | PaymentsServiceError::UnknownCoupon(_)
        | PaymentsServiceError::CouponNotApplicable(_)
        | PaymentsServiceError::Pricing(_) => StatusError::unprocessable_entity(),
        PaymentsServiceError::DraftMismatch(_) => StatusError::unprocessable_entity(),
        PaymentsServiceError::UnknownReference(_)
        | PaymentsServiceError::Signature(_)
        | PaymentsServiceError::UnknownOrder(_) => StatusError::bad_request(),
        PaymentsServiceError::UpstreamUnavailable(_) | PaymentsServiceError::Gateway(_) => {
            StatusError::bad_gateway()
        }
        PaymentsServiceError::Catalog(_)
        | PaymentsServiceError::Coupons(_)
        | PaymentsServiceError::OrderNotRecorded(_) => StatusError::service_unavailable(),
        PaymentsServiceError::AlreadyFinalized => StatusError::conflict(),
        PaymentsServiceError::Persistence(_) | PaymentsServiceError::OrderLookup(_) => {
            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn outcome(error: &PaymentsServiceError) -> PaymentOutcome {
    match error {
        PaymentsServiceError::Signature(_) => PaymentOutcome::SignatureMismatch,
        PaymentsServiceError::AlreadyFinalized => PaymentOutcome::Replay,
        _ => PaymentOutcome::Failure,
    }
}

/// Server-side faults are logged as errors, refusals of the customer's request as warnings.
pub(crate) fn log_level(error: &PaymentsServiceError) -> Level {
    if status_for(error).code.is_server_error() {
        Level::ERROR
    } else {
        Level::WARN
    }
}

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    if log_level(&error) == Level::ERROR {
        error!("payment request failed: {error:?}");
    }

    FlowError::from(&error).into_status_error(status_for(&error))
}

#[cfg(test)]
mod tests {
    use cinemates::signature::SignatureError;
    use salvo::http::StatusCode;

    use cinemates_app::domain::{
        bookings::BookingsServiceError, payment_orders::PaymentOrdersServiceError,
    };

    use super::*;

    #[test]
    fn tampered_amount_is_unprocessable() {
        let status = into_status_error(PaymentsServiceError::PriceMismatch {
            expected: 2_000_00,
            submitted: 1_00,
        });

        assert_eq!(status.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status.detail.as_deref(), Some("field=amount"));
    }

    #[test]
    fn replay_is_conflict() {
        let error = PaymentsServiceError::AlreadyFinalized;

        assert_eq!(outcome(&error), PaymentOutcome::Replay);
        assert_eq!(into_status_error(error).code, StatusCode::CONFLICT);
    }

    #[test]
    fn signature_mismatch_is_counted_separately() {
        let error = PaymentsServiceError::Signature(SignatureError::Mismatch);

        assert_eq!(outcome(&error), PaymentOutcome::SignatureMismatch);
        assert_eq!(into_status_error(error).code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn lost_booking_after_payment_is_logged_as_error() {
        let error = PaymentsServiceError::Persistence(BookingsServiceError::InvalidData);

        assert_eq!(log_level(&error), Level::ERROR);
        assert_eq!(
            into_status_error(error).code,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            log_level(&PaymentsServiceError::OrderLookup(
                PaymentOrdersServiceError::InvalidData
            )),
            Level::ERROR
        );
    }

    #[test]
    fn refused_payments_are_logged_as_warnings() {
        for error in [
            PaymentsServiceError::Signature(SignatureError::Mismatch),
            PaymentsServiceError::AlreadyFinalized,
            PaymentsServiceError::UnknownOrder("order_1".to_string()),
            PaymentsServiceError::DraftMismatch("order_1".to_string()),
        ] {
            assert_eq!(log_level(&error), Level::WARN, "{error:?}");
        }
    }

    #[test]
    fn draft_swapped_after_payment_is_unprocessable() {
        let status = into_status_error(PaymentsServiceError::DraftMismatch("order_1".to_string()));

        assert_eq!(status.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status.brief, FlowError::VerificationFailed.user_message());
    }
}
