//! Payment confirmation
//!
//! [`PaymentFlow`] tracks one payment attempt from entering the payment step until the booking is
//! confirmed or the attempt fails. Failures are terminal: a new attempt starts from a new flow.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    draft::BookingDraft,
    pricing::CURRENCY_CODE,
    wizard::{DraftField, WizardStep},
};

/// Order the client asks the server to create with the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Amount in minor units.
    pub amount_minor_units: u64,
    /// ISO currency code.
    pub currency: String,
    /// Merchant receipt reference.
    pub receipt_ref: String,
}

impl OrderRequest {
    /// Order for `amount_minor_units` with a fresh receipt reference.
    pub fn new(amount_minor_units: u64) -> Self {
        Self {
            amount_minor_units,
            currency: CURRENCY_CODE.to_string(),
            receipt_ref: receipt_ref(Uuid::now_v7()),
        }
    }
}

/// Receipt reference for an attempt, within the gateway's 40 character limit.
pub fn receipt_ref(attempt: Uuid) -> String {
    format!("rcpt_{}", attempt.simple())
}

/// Order created by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id.
    pub order_id: String,
    /// Amount the gateway will charge, in minor units.
    pub amount_minor_units: u64,
}

/// Signed fields the gateway widget returns on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPayment {
    /// Order the payment belongs to.
    pub order_id: String,
    /// Gateway payment id.
    pub payment_id: String,
    /// Hex HMAC over `order_id|payment_id`.
    pub signature: String,
}

/// Why a payment attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PaymentFailure {
    /// The draft lacks a field the payment needs.
    PreconditionMissing {
        /// Missing field.
        field: DraftField,
    },
    /// The amount to charge is zero.
    InvalidAmount,
    /// The gateway script could not be loaded.
    GatewayUnavailable,
    /// The server could not create the order.
    OrderFailed {
        /// Server message.
        message: String,
    },
    /// The gateway answered for a different order or amount.
    OrderMismatch,
    /// The customer dismissed the payment widget.
    Cancelled,
    /// The server rejected the payment signature.
    SignatureMismatch,
    /// The verification request did not reach the server.
    VerificationUnreachable,
    /// The payment verified but the booking could not be saved.
    PersistenceFailed,
}

impl PaymentFailure {
    /// Message shown to the customer.
    pub fn user_message(&self) -> &'static str {
        match self {
            PaymentFailure::PreconditionMissing { .. } => {
                "Some booking details are missing. Please complete the previous steps."
            }
            PaymentFailure::InvalidAmount => "The amount to pay is invalid.",
            PaymentFailure::GatewayUnavailable => {
                "The payment service could not be loaded. Please check your connection."
            }
            PaymentFailure::OrderFailed { .. } | PaymentFailure::OrderMismatch => {
                "We could not start your payment. Please try again."
            }
            PaymentFailure::Cancelled => "Payment cancelled.",
            PaymentFailure::SignatureMismatch => {
                "Payment verification failed. Please contact support."
            }
            PaymentFailure::VerificationUnreachable => {
                "We could not confirm your payment. Please contact support before paying again."
            }
            PaymentFailure::PersistenceFailed => {
                "Your payment was received but the booking could not be saved. Please contact support."
            }
        }
    }

    /// Step to send the customer back to, for failures that the customer can fix.
    pub fn redirect_to(&self) -> Option<WizardStep> {
        match self {
            PaymentFailure::PreconditionMissing { field } => Some(field.populated_by()),
            _ => None,
        }
    }
}

/// Where a payment attempt stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaymentState {
    /// Payment step not entered.
    Idle,
    /// Waiting for the gateway script; the order request is ready.
    AwaitingGatewayScript {
        /// Order to create once the script is ready.
        request: OrderRequest,
        /// Whether the script has loaded.
        script_ready: bool,
    },
    /// The gateway order exists.
    OrderCreated {
        /// Created order.
        order: GatewayOrder,
    },
    /// The widget is open.
    AwaitingUserAction {
        /// Order being paid.
        order: GatewayOrder,
    },
    /// The payment is being verified by the server.
    Verifying {
        /// Order being paid.
        order: GatewayOrder,
        /// Signed widget result.
        payment: GatewayPayment,
    },
    /// The booking is finalized.
    Confirmed {
        /// Finalized booking.
        booking_uuid: Uuid,
    },
    /// The attempt failed.
    Failed {
        /// Reason.
        failure: PaymentFailure,
    },
}

impl PaymentState {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            PaymentState::Idle => "idle",
            PaymentState::AwaitingGatewayScript { .. } => "awaiting_gateway_script",
            PaymentState::OrderCreated { .. } => "order_created",
            PaymentState::AwaitingUserAction { .. } => "awaiting_user_action",
            PaymentState::Verifying { .. } => "verifying",
            PaymentState::Confirmed { .. } => "confirmed",
            PaymentState::Failed { .. } => "failed",
        }
    }

    /// Whether no further events are accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentState::Confirmed { .. } | PaymentState::Failed { .. }
        )
    }
}

/// Things that happen to a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// The gateway script loaded.
    ScriptLoaded,
    /// The gateway script failed to load.
    ScriptFailed,
    /// The server created the gateway order.
    OrderCreated(GatewayOrder),
    /// The server could not create the order.
    OrderFailed {
        /// Server message.
        message: String,
    },
    /// The widget was opened with the order.
    WidgetOpened,
    /// The widget reported a successful payment.
    WidgetSucceeded(GatewayPayment),
    /// The customer closed the widget.
    WidgetDismissed,
    /// The server verified the payment and saved the booking.
    Verified {
        /// Finalized booking.
        booking_uuid: Uuid,
    },
    /// The server rejected the signature.
    SignatureRejected,
    /// The verification request failed in transit.
    VerificationUnreachable,
    /// The server verified the payment but could not save the booking.
    PersistenceFailed,
}

impl PaymentEvent {
    fn name(&self) -> &'static str {
        match self {
            PaymentEvent::ScriptLoaded => "script_loaded",
            PaymentEvent::ScriptFailed => "script_failed",
            PaymentEvent::OrderCreated(_) => "order_created",
            PaymentEvent::OrderFailed { .. } => "order_failed",
            PaymentEvent::WidgetOpened => "widget_opened",
            PaymentEvent::WidgetSucceeded(_) => "widget_succeeded",
            PaymentEvent::WidgetDismissed => "widget_dismissed",
            PaymentEvent::Verified { .. } => "verified",
            PaymentEvent::SignatureRejected => "signature_rejected",
            PaymentEvent::VerificationUnreachable => "verification_unreachable",
            PaymentEvent::PersistenceFailed => "persistence_failed",
        }
    }
}

/// An event arrived in a state that does not accept it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("payment cannot handle {event} while {state}")]
pub struct TransitionError {
    /// State at the time.
    pub state: &'static str,
    /// Rejected event.
    pub event: &'static str,
}

/// One payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFlow {
    state: PaymentState,
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentFlow {
    /// Attempt that has not entered the payment step yet.
    pub fn new() -> Self {
        Self {
            state: PaymentState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &PaymentState {
        &self.state
    }

    /// Order to create, once the payment step has been entered.
    pub fn order_request(&self) -> Option<&OrderRequest> {
        match &self.state {
            PaymentState::AwaitingGatewayScript { request, .. } => Some(request),
            _ => None,
        }
    }

    /// Widget result awaiting verification.
    pub fn pending_payment(&self) -> Option<&GatewayPayment> {
        match &self.state {
            PaymentState::Verifying { payment, .. } => Some(payment),
            _ => None,
        }
    }

    /// Enter the payment step with `draft`.
    ///
    /// A draft missing a payment precondition, or priced at zero, fails the attempt.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless the flow is idle.
    pub fn enter(&mut self, draft: &BookingDraft) -> Result<&PaymentState, TransitionError> {
        if self.state != PaymentState::Idle {
            return Err(TransitionError {
                state: self.state.name(),
                event: "entered",
            });
        }

        self.state = match (WizardStep::Payment.first_unmet(draft), draft.final_price) {
            (Some((field, _step)), _) => PaymentState::Failed {
                failure: PaymentFailure::PreconditionMissing { field },
            },
            (None, Some(0) | None) => PaymentState::Failed {
                failure: PaymentFailure::InvalidAmount,
            },
            (None, Some(amount)) => PaymentState::AwaitingGatewayScript {
                request: OrderRequest::new(amount),
                script_ready: false,
            },
        };

        Ok(&self.state)
    }

    /// Advance the attempt with `event`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the current state does not accept `event`; the state is left
    /// unchanged.
    pub fn apply(&mut self, event: PaymentEvent) -> Result<&PaymentState, TransitionError> {
        let rejected = TransitionError {
            state: self.state.name(),
            event: event.name(),
        };

        let next = match (&self.state, event) {
            (
                PaymentState::AwaitingGatewayScript {
                    request,
                    script_ready: false,
                },
                PaymentEvent::ScriptLoaded,
            ) => PaymentState::AwaitingGatewayScript {
                request: request.clone(),
                script_ready: true,
            },
            (PaymentState::AwaitingGatewayScript { .. }, PaymentEvent::ScriptFailed) => {
                failed(PaymentFailure::GatewayUnavailable)
            }
            (
                PaymentState::AwaitingGatewayScript {
                    request,
                    script_ready: true,
                },
                PaymentEvent::OrderCreated(order),
            ) => {
                if order.amount_minor_units == request.amount_minor_units {
                    PaymentState::OrderCreated { order }
                } else {
                    failed(PaymentFailure::OrderMismatch)
                }
            }
            (
                PaymentState::AwaitingGatewayScript {
                    script_ready: true, ..
                },
                PaymentEvent::OrderFailed { message },
            ) => failed(PaymentFailure::OrderFailed { message }),
            (PaymentState::OrderCreated { order }, PaymentEvent::WidgetOpened) => {
                PaymentState::AwaitingUserAction {
                    order: order.clone(),
                }
            }
            (PaymentState::AwaitingUserAction { order }, PaymentEvent::WidgetSucceeded(payment)) => {
                if payment.order_id == order.order_id {
                    PaymentState::Verifying {
                        order: order.clone(),
                        payment,
                    }
                } else {
                    failed(PaymentFailure::OrderMismatch)
                }
            }
            (PaymentState::AwaitingUserAction { .. }, PaymentEvent::WidgetDismissed) => {
                failed(PaymentFailure::Cancelled)
            }
            (PaymentState::Verifying { .. }, PaymentEvent::Verified { booking_uuid }) => {
                PaymentState::Confirmed { booking_uuid }
            }
            (PaymentState::Verifying { .. }, PaymentEvent::SignatureRejected) => {
                failed(PaymentFailure::SignatureMismatch)
            }
            (PaymentState::Verifying { .. }, PaymentEvent::VerificationUnreachable) => {
                failed(PaymentFailure::VerificationUnreachable)
            }
            (PaymentState::Verifying { .. }, PaymentEvent::PersistenceFailed) => {
                failed(PaymentFailure::PersistenceFailed)
            }
            _ => return Err(rejected),
        };

        self.state = next;

        Ok(&self.state)
    }
}

fn failed(failure: PaymentFailure) -> PaymentState {
    PaymentState::Failed { failure }
}
