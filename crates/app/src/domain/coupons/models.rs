//! Coupon Models

use cinemates::coupons::{Coupon, CouponError, CouponKind};
use jiff::civil::Date;

use crate::uuids::TypedUuid;

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Stored coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,

    /// Category shown on the coupons page, e.g. "festive".
    pub coupon_type: String,
    pub description: String,
    pub kind: CouponKind,
    pub valid_from: Date,
    pub valid_until: Date,
    pub active: bool,
}

impl CouponRecord {
    /// The pricing rule this record describes.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError`] if the stored rule is not a valid coupon.
    pub fn to_coupon(&self) -> Result<Coupon, CouponError> {
        Coupon::new(
            self.code.clone(),
            self.kind,
            self.valid_from,
            self.valid_until,
        )
    }
}

/// New Coupon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub coupon_type: String,
    pub description: String,
    pub kind: CouponKind,
    pub valid_from: Date,
    pub valid_until: Date,
}
