//! Payment Order Models

use jiff::Timestamp;

use crate::domain::customers::models::CustomerUuid;

/// What a gateway order was created to pay for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_uuid: CustomerUuid,

    /// Amount the order charges, in minor units.
    pub amount: u64,

    /// Coupon discount included in `amount`, as priced when the order was created.
    pub discount: u64,

    /// Digest of the draft snapshot the order pays for.
    pub draft_digest: String,

    pub created_at: Timestamp,
}

/// New Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderRecord {
    pub order_id: String,
    pub customer_uuid: CustomerUuid,
    pub amount: u64,
    pub discount: u64,
    pub draft_digest: String,
}
