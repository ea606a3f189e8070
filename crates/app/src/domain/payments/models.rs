//! Payment Models

use cinemates::{
    draft::DraftSnapshot,
    payment::{GatewayPayment, OrderRequest},
};

/// Order creation request: the amount to charge plus the selections it pays for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentOrder {
    pub request: OrderRequest,
    pub snapshot: DraftSnapshot,
}

/// A gateway order ready to hand to the checkout widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount_minor_units: u64,
    pub currency: String,
    pub receipt_ref: String,

    /// Public key the widget is opened with.
    pub key_id: String,
}

/// Widget success callback plus the selections that were paid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub payment: GatewayPayment,
    pub snapshot: DraftSnapshot,
}

/// Server-side price of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repriced {
    pub total: u64,
    pub discount: u64,
}
