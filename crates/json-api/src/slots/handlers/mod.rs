//! Slot Handlers

pub(crate) mod booked;
pub(crate) mod reserve;
