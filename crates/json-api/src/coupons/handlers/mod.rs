//! Coupon Handlers

pub(crate) mod index;
pub(crate) mod types;
