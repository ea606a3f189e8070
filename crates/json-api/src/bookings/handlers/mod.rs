//! Booking Handlers

pub(crate) mod index;
