//! Cakes

use std::{fmt, str::FromStr};

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Weight the catalog reference price of a cake is quoted for.
pub const REFERENCE_WEIGHT_GRAMS: u32 = 500;

/// Errors raised while parsing weights or scaling cake prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    /// Weights must be strictly positive.
    #[error("weight must be greater than zero")]
    Zero,

    /// The weight label could not be understood.
    #[error("could not parse weight {0:?}")]
    Unparseable(String),

    /// The label resolved to a fractional number of grams.
    #[error("weight {0:?} is not a whole number of grams")]
    FractionalGrams(String),

    /// Scaling the price overflowed the minor unit range.
    #[error("scaled cake price overflowed")]
    Overflow,
}

/// A cake weight tier, stored in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Weight {
    grams: u32,
}

impl Weight {
    /// The reference weight catalog prices are quoted for.
    pub const REFERENCE: Weight = Weight {
        grams: REFERENCE_WEIGHT_GRAMS,
    };

    /// Create a weight from grams.
    ///
    /// # Errors
    ///
    /// Returns [`WeightError::Zero`] for a zero weight.
    pub const fn from_grams(grams: u32) -> Result<Self, WeightError> {
        if grams == 0 {
            return Err(WeightError::Zero);
        }

        Ok(Self { grams })
    }

    /// Weight in grams.
    #[must_use]
    pub const fn grams(self) -> u32 {
        self.grams
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl TryFrom<u32> for Weight {
    type Error = WeightError;

    fn try_from(grams: u32) -> Result<Self, Self::Error> {
        Self::from_grams(grams)
    }
}

impl From<Weight> for u32 {
    fn from(weight: Weight) -> Self {
        weight.grams
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.grams % 1000 == 0 {
            write!(f, "{}kg", self.grams / 1000)
        } else {
            write!(f, "{}g", self.grams)
        }
    }
}

/// Parses `"500"`, `"500g"`, `"500 g"`, `"1kg"` and `"1.5 KG"`.
///
/// An empty label means the reference weight.
impl FromStr for Weight {
    type Err = WeightError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalised = label.trim().to_ascii_lowercase();

        if normalised.is_empty() {
            return Ok(Self::REFERENCE);
        }

        let (number, multiplier) = if let Some(kilograms) = normalised.strip_suffix("kg") {
            (kilograms, Decimal::ONE_THOUSAND)
        } else if let Some(grams) = normalised.strip_suffix('g') {
            (grams, Decimal::ONE)
        } else {
            (normalised.as_str(), Decimal::ONE)
        };

        let value = Decimal::from_str(number.trim())
            .map_err(|_parse_error| WeightError::Unparseable(label.to_string()))?;

        let grams = value
            .checked_mul(multiplier)
            .ok_or_else(|| WeightError::Unparseable(label.to_string()))?;

        if !grams.fract().is_zero() {
            return Err(WeightError::FractionalGrams(label.to_string()));
        }

        let grams = grams
            .to_u32()
            .ok_or_else(|| WeightError::Unparseable(label.to_string()))?;

        Self::from_grams(grams)
    }
}

/// Scale a reference-weight price linearly to `weight`.
///
/// Fractions of a minor unit are rounded half away from zero. Every price shown for a cake,
/// whether on the selection step or the confirmation recap, goes through this function.
///
/// # Errors
///
/// Returns [`WeightError::Overflow`] if the scaled price does not fit in minor units.
pub fn scaled_unit_price(reference_price: u64, weight: Weight) -> Result<u64, WeightError> {
    let price = Decimal::from_u64(reference_price).ok_or(WeightError::Overflow)?;
    let grams = Decimal::from(weight.grams());
    let reference = Decimal::from(REFERENCE_WEIGHT_GRAMS);

    price
        .checked_mul(grams)
        .and_then(|scaled| scaled.checked_div(reference))
        .ok_or(WeightError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(WeightError::Overflow)
}

/// One cake selection within a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CakeLineItem {
    /// Catalog cake.
    pub cake_uuid: Uuid,

    /// Display name.
    pub name: String,

    /// Chosen weight tier.
    #[serde(default)]
    pub weight: Weight,

    /// Price of the reference weight, in minor units.
    pub unit_price: u64,

    /// Number of cakes at this weight.
    pub quantity: u32,

    /// Eggless variant requested.
    #[serde(default)]
    pub eggless: bool,
}

impl CakeLineItem {
    /// Unit price scaled to the chosen weight.
    ///
    /// # Errors
    ///
    /// Returns [`WeightError::Overflow`] if scaling overflows.
    pub fn scaled_price(&self) -> Result<u64, WeightError> {
        scaled_unit_price(self.unit_price, self.weight)
    }

    /// Scaled unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`WeightError::Overflow`] if the line total overflows.
    pub fn line_total(&self) -> Result<u64, WeightError> {
        self.scaled_price()?
            .checked_mul(u64::from(self.quantity))
            .ok_or(WeightError::Overflow)
    }

    /// Whether this line describes the same cake at the same weight as `other`.
    #[must_use]
    pub fn same_selection(&self, other: &CakeLineItem) -> bool {
        self.cake_uuid == other.cake_uuid && self.weight == other.weight
    }
}
