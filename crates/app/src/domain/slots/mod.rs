//! Slot Reservations

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::SlotsServiceError;
pub use service::*;
