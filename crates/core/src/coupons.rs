//! Coupons

use decimal_percentage::Percentage;
use jiff::civil::Date;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Basis points in one hundred percent.
pub const FULL_BASIS_POINTS: u32 = 10_000;

/// Errors raised while building or applying a coupon.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CouponError {
    /// The coupon code was empty.
    #[error("coupon code must not be empty")]
    EmptyCode,

    /// Percentages above one hundred are not discounts.
    #[error("coupon percentage {basis_points} bp exceeds 100%")]
    PercentageTooLarge {
        /// Offending value.
        basis_points: u32,
    },

    /// The validity window ends before it starts.
    #[error("coupon window {valid_from}..={valid_until} is empty")]
    InvalidWindow {
        /// First valid day.
        valid_from: Date,
        /// Last valid day.
        valid_until: Date,
    },

    /// The coupon is not valid on the requested day.
    #[error("coupon {code} is {validity}")]
    NotApplicable {
        /// Coupon code.
        code: String,
        /// Why it is not applicable.
        validity: CouponValidity,
    },

    /// Discount arithmetic overflowed.
    #[error("coupon discount overflowed")]
    Overflow,
}

/// How a coupon discounts a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CouponKind {
    /// Percentage of the subtotal, in basis points (`1000` is 10%).
    Percentage {
        /// Discount rate in basis points.
        basis_points: u32,
    },

    /// Fixed amount off, in minor units.
    FlatAmount {
        /// Amount in minor units.
        amount: u64,
    },
}

/// Where a day falls relative to a coupon's validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponValidity {
    /// Inside the inclusive window.
    Valid,
    /// Before the window opens.
    NotYetValid,
    /// After the window closed.
    Expired,
}

impl std::fmt::Display for CouponValidity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CouponValidity::Valid => "valid",
            CouponValidity::NotYetValid => "not yet valid",
            CouponValidity::Expired => "expired",
        })
    }
}

/// A coupon as applied to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Code the customer entered.
    pub code: String,

    /// Discount rule.
    #[serde(flatten)]
    pub kind: CouponKind,

    /// First valid day.
    pub valid_from: Date,

    /// Last valid day, inclusive.
    pub valid_until: Date,
}

impl Coupon {
    /// Build a coupon, validating the code, the rule and the window.
    ///
    /// # Errors
    ///
    /// - [`CouponError::EmptyCode`]: the code is blank.
    /// - [`CouponError::PercentageTooLarge`]: a percentage above 100%.
    /// - [`CouponError::InvalidWindow`]: `valid_until` precedes `valid_from`.
    pub fn new(
        code: impl Into<String>,
        kind: CouponKind,
        valid_from: Date,
        valid_until: Date,
    ) -> Result<Self, CouponError> {
        let code = code.into().trim().to_string();

        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }

        if let CouponKind::Percentage { basis_points } = kind
            && basis_points > FULL_BASIS_POINTS
        {
            return Err(CouponError::PercentageTooLarge { basis_points });
        }

        if valid_until < valid_from {
            return Err(CouponError::InvalidWindow {
                valid_from,
                valid_until,
            });
        }

        Ok(Self {
            code,
            kind,
            valid_from,
            valid_until,
        })
    }

    /// Where `today` falls relative to the validity window.
    #[must_use]
    pub fn validity_on(&self, today: Date) -> CouponValidity {
        if today < self.valid_from {
            CouponValidity::NotYetValid
        } else if today > self.valid_until {
            CouponValidity::Expired
        } else {
            CouponValidity::Valid
        }
    }

    /// Whether the coupon applies on `today`. Both ends of the window are inclusive.
    #[must_use]
    pub fn is_valid_on(&self, today: Date) -> bool {
        self.validity_on(today) == CouponValidity::Valid
    }

    /// Discount this coupon grants on `subtotal` (minor units) on `today`.
    ///
    /// The discount never exceeds the subtotal.
    ///
    /// # Errors
    ///
    /// - [`CouponError::NotApplicable`]: `today` is outside the validity window.
    /// - [`CouponError::Overflow`]: the percentage could not be computed.
    pub fn discount_on(&self, subtotal: u64, today: Date) -> Result<u64, CouponError> {
        let validity = self.validity_on(today);

        if validity != CouponValidity::Valid {
            return Err(CouponError::NotApplicable {
                code: self.code.clone(),
                validity,
            });
        }

        let discount = match self.kind {
            CouponKind::Percentage { basis_points } => {
                let percent = Percentage::from(Decimal::new(i64::from(basis_points), 4));

                percent_of_minor(&percent, subtotal)?
            }
            CouponKind::FlatAmount { amount } => amount,
        };

        Ok(discount.min(subtotal))
    }
}

fn percent_of_minor(percent: &Percentage, minor: u64) -> Result<u64, CouponError> {
    let minor = Decimal::from_u64(minor).ok_or(CouponError::Overflow)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(CouponError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(CouponError::Overflow)
}
