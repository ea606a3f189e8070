//! Payment Handlers

pub(crate) mod orders;
pub(crate) mod verify;
