//! Gateway Orders Awaiting Payment

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::PaymentOrdersServiceError;
pub use service::*;
