//! Verify Payment Handler

use std::sync::Arc;

use cinemates::{errors::FlowError, payment::GatewayPayment};
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{Level, error, warn};
use uuid::Uuid;

use cinemates_app::domain::payments::models::PaymentConfirmation;

use crate::{
    extensions::*,
    observability::PaymentOutcome,
    payments::{
        errors::{log_level, outcome, status_for},
        models::DraftRequest,
    },
    state::State,
};

/// Fields of the checkout widget's success callback, plus the paid-for draft.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,

    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,

    #[serde(alias = "razorpay_signature")]
    pub signature: String,

    pub draft: DraftRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum VerificationStatus {
    Success,
    Failure,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentResponse {
    pub status: VerificationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_uuid: Option<Uuid>,

    /// Shown to the customer on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Wizard step to send the customer back to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl VerifyPaymentResponse {
    fn failure(error: &FlowError) -> Self {
        Self {
            status: VerificationStatus::Failure,
            booking_uuid: None,
            message: Some(error.user_message()),
            redirect_to: error.redirect_to().map(|step| step.to_string()),
        }
    }
}

/// Verify Payment Handler
///
/// Checks the gateway signature with the shared secret and that the draft is the one the order
/// was created for. Only then is the booking stored, at the order's amount. A payment id
/// finalizes at most one booking.
#[endpoint(
    tags("payments"),
    summary = "Verify Payment",
    responses(
        (status_code = StatusCode::OK, description = "Booking confirmed", body = VerifyPaymentResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Signature mismatch or invalid draft", body = VerifyPaymentResponse),
        (status_code = StatusCode::CONFLICT, description = "Payment already finalized", body = VerifyPaymentResponse),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Draft differs from the paid order", body = VerifyPaymentResponse),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Payment received but booking not saved", body = VerifyPaymentResponse),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let confirmation = PaymentConfirmation {
        payment: GatewayPayment {
            order_id: request.order_id,
            payment_id: request.payment_id,
            signature: request.signature,
        },
        snapshot: request.draft.into_snapshot()?,
    };

    match state.payments.verify_payment(confirmation).await {
        Ok(booking) => {
            PaymentOutcome::Success.record();

            res.render(Json(VerifyPaymentResponse {
                status: VerificationStatus::Success,
                booking_uuid: Some(booking.uuid.into()),
                message: None,
                redirect_to: None,
            }));
        }
        Err(error) => {
            outcome(&error).record();

            if log_level(&error) == Level::ERROR {
                error!("payment verification failed: {error:?}");
            } else {
                warn!(%error, "payment verification failed");
            }

            res.status_code(status_for(&error).code);
            res.render(Json(VerifyPaymentResponse::failure(&FlowError::from(&error))));
        }
    }

    Ok(())
}
