//! Cinemates Domain Concerns

pub mod bookings;
pub mod catalog;
pub mod coupons;
pub mod customers;
pub mod payment_orders;
pub mod payments;
pub mod slots;
