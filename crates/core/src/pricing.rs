//! Pricing

use jiff::civil::Date;
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    cakes::{CakeLineItem, WeightError},
    coupons::{Coupon, CouponError, CouponValidity},
    draft::AddonLineItem,
};

/// Currency every booking is priced in.
pub const CURRENCY: &Currency = iso::INR;

/// ISO code of [`CURRENCY`], as sent to the payment gateway.
pub const CURRENCY_CODE: &str = "INR";

/// Errors that can occur while computing a total.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A cake line could not be priced.
    #[error(transparent)]
    Weight(#[from] WeightError),

    /// An amount did not fit in the minor unit range.
    #[error("price overflowed")]
    Overflow,

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Everything a total is computed from.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    /// Theater rental for the slot, in minor units.
    pub theater_cost: u64,

    /// Decoration charge, zero when not requested.
    pub decoration_cost: u64,

    /// Cake lines, priced at their reference weight.
    pub cakes: &'a [CakeLineItem],

    /// Add-on lines.
    pub addons: &'a [AddonLineItem],
}

/// What happened to the coupon offered with a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CouponOutcome {
    /// The coupon applied.
    Applied {
        /// Coupon code.
        code: String,
        /// Discount granted, in minor units.
        discount: u64,
    },

    /// The coupon was not valid on the pricing day and was ignored.
    Rejected {
        /// Coupon code.
        code: String,
        /// Reason it was ignored.
        validity: CouponValidity,
    },
}

/// Priced booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    subtotal: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    total: Money<'static, Currency>,
    coupon: Option<CouponOutcome>,
}

impl Quote {
    /// Sum of all line items before any discount.
    pub fn subtotal(&self) -> &Money<'static, Currency> {
        &self.subtotal
    }

    /// Discount applied.
    pub fn discount(&self) -> &Money<'static, Currency> {
        &self.discount
    }

    /// Amount payable.
    pub fn total(&self) -> &Money<'static, Currency> {
        &self.total
    }

    /// Outcome of the coupon, if one was offered.
    pub fn coupon(&self) -> Option<&CouponOutcome> {
        self.coupon.as_ref()
    }

    /// Amount payable in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total is negative, which [`compute_total`] never
    /// produces.
    pub fn total_minor(&self) -> Result<u64, PricingError> {
        u64::try_from(self.total.to_minor_units()).map_err(|_sign| PricingError::Overflow)
    }
}

/// Subtotal of all lines, in minor units.
///
/// Cakes are priced through [`CakeLineItem::line_total`] so the weight scaling here matches every
/// other place a cake price is shown.
///
/// # Errors
///
/// Returns [`PricingError`] when a line or the sum overflows.
pub fn subtotal_minor(input: &PricingInput<'_>) -> Result<u64, PricingError> {
    let cakes = input
        .cakes
        .iter()
        .try_fold(0_u64, |acc, cake| -> Result<u64, PricingError> {
            acc.checked_add(cake.line_total()?)
                .ok_or(PricingError::Overflow)
        })?;

    let addons = input
        .addons
        .iter()
        .try_fold(0_u64, |acc, addon| -> Result<u64, PricingError> {
            acc.checked_add(addon.line_total().ok_or(PricingError::Overflow)?)
                .ok_or(PricingError::Overflow)
        })?;

    [input.theater_cost, input.decoration_cost, cakes, addons]
        .into_iter()
        .try_fold(0_u64, u64::checked_add)
        .ok_or(PricingError::Overflow)
}

/// Compute subtotal, discount and total for a booking.
///
/// A coupon outside its validity window on `today` is ignored and reported as
/// [`CouponOutcome::Rejected`]; the total is then the undiscounted subtotal. The result depends
/// only on the inputs, never on line order.
///
/// # Errors
///
/// Returns [`PricingError`] when any amount overflows.
pub fn compute_total(
    input: &PricingInput<'_>,
    coupon: Option<&Coupon>,
    today: Date,
) -> Result<Quote, PricingError> {
    let subtotal = subtotal_minor(input)?;

    let (discount, outcome) = match coupon {
        None => (0, None),
        Some(coupon) => match coupon.discount_on(subtotal, today) {
            Ok(discount) => (
                discount,
                Some(CouponOutcome::Applied {
                    code: coupon.code.clone(),
                    discount,
                }),
            ),
            Err(CouponError::NotApplicable { code, validity }) => {
                (0, Some(CouponOutcome::Rejected { code, validity }))
            }
            Err(_other) => return Err(PricingError::Overflow),
        },
    };

    let subtotal = to_money(subtotal)?;
    let discount = to_money(discount)?;
    let total = subtotal.sub(discount)?;

    Ok(Quote {
        subtotal,
        discount,
        total,
        coupon: outcome,
    })
}

/// Minor units as [`CURRENCY`] money.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when `minor` does not fit an `i64`.
pub fn to_money(minor: u64) -> Result<Money<'static, Currency>, PricingError> {
    let minor = i64::try_from(minor).map_err(|_range| PricingError::Overflow)?;

    Ok(Money::from_minor(minor, CURRENCY))
}
