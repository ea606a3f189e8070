//! Cinemates
//!
//! Booking-flow domain for private theater screenings: the typed booking draft carried across
//! wizard steps, the pricing and coupon calculator, slot natural keys, and the payment
//! confirmation state machine.

pub mod cakes;
pub mod coupons;
pub mod draft;
pub mod errors;
pub mod payment;
pub mod pricing;
pub mod signature;
pub mod slots;
pub mod wizard;

pub use pricing::{CURRENCY, CURRENCY_CODE};
