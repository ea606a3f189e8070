//! Payments service errors.

use cinemates::{
    coupons::CouponValidity, errors::FlowError, pricing::PricingError,
    signature::SignatureError,
};
use thiserror::Error;

use crate::{
    domain::{
        bookings::BookingsServiceError, catalog::CatalogServiceError,
        coupons::CouponsServiceError, payment_orders::PaymentOrdersServiceError,
    },
    gateway::GatewayError,
};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    /// Orders must be for a positive amount.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// The submitted amount differs from the server's price for the same selections.
    #[error("submitted amount {submitted} does not match price {expected}")]
    PriceMismatch { expected: u64, submitted: u64 },

    /// The draft names a catalog entry that does not exist or does not fit together.
    #[error("unknown {0}")]
    UnknownReference(&'static str),

    #[error("unknown coupon {0:?}")]
    UnknownCoupon(String),

    #[error("coupon is {0}")]
    CouponNotApplicable(CouponValidity),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("payment gateway unavailable")]
    UpstreamUnavailable(#[source] GatewayError),

    #[error("payment gateway error")]
    Gateway(#[source] GatewayError),

    /// The gateway created an order for a different amount.
    #[error("gateway order amount {order} does not match requested {requested}")]
    OrderMismatch { requested: u64, order: u64 },

    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The payment id already finalized a booking.
    #[error("payment already finalized")]
    AlreadyFinalized,

    /// The paid order was never created by this service.
    #[error("unknown payment order {0:?}")]
    UnknownOrder(String),

    /// The submitted draft is not the one the paid order was created for.
    #[error("draft does not match paid order {0:?}")]
    DraftMismatch(String),

    #[error("payment order could not be recorded")]
    OrderNotRecorded(#[source] PaymentOrdersServiceError),

    #[error("payment order lookup failed")]
    OrderLookup(#[source] PaymentOrdersServiceError),

    #[error("catalog lookup failed")]
    Catalog(#[source] CatalogServiceError),

    #[error("coupon lookup failed")]
    Coupons(#[source] CouponsServiceError),

    #[error("booking could not be saved")]
    Persistence(#[source] BookingsServiceError),
}

impl From<GatewayError> for PaymentsServiceError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Unavailable(_) => Self::UpstreamUnavailable(error),
            GatewayError::Http(_) | GatewayError::Rejected { .. } => Self::Gateway(error),
        }
    }
}

impl From<&PaymentsServiceError> for FlowError {
    fn from(error: &PaymentsServiceError) -> Self {
        match error {
            PaymentsServiceError::InvalidAmount
            | PaymentsServiceError::PriceMismatch { .. }
            | PaymentsServiceError::OrderMismatch { .. } => FlowError::Validation {
                field: "amount",
                message: error.to_string(),
            },
            PaymentsServiceError::UnknownReference(field) => FlowError::Validation {
                field,
                message: error.to_string(),
            },
            PaymentsServiceError::UnknownCoupon(_)
            | PaymentsServiceError::CouponNotApplicable(_) => FlowError::Validation {
                field: "coupon",
                message: error.to_string(),
            },
            PaymentsServiceError::UpstreamUnavailable(_)
            | PaymentsServiceError::Gateway(_)
            | PaymentsServiceError::Catalog(_)
            | PaymentsServiceError::Coupons(_)
            | PaymentsServiceError::OrderNotRecorded(_) => FlowError::UpstreamUnavailable,
            PaymentsServiceError::Signature(_) => FlowError::SignatureMismatch,
            PaymentsServiceError::Pricing(_)
            | PaymentsServiceError::AlreadyFinalized
            | PaymentsServiceError::UnknownOrder(_)
            | PaymentsServiceError::DraftMismatch(_)
            | PaymentsServiceError::OrderLookup(_) => FlowError::VerificationFailed,
            PaymentsServiceError::Persistence(_) => FlowError::BookingNotSaved,
        }
    }
}
