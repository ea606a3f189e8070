//! Customers

pub mod errors;
pub mod models;
mod repositories;
pub mod service;

pub use errors::CustomersServiceError;
pub use service::*;
