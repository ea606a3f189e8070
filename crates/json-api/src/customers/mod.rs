//! Customers
//!
//! The contact step creates the customer every later selection hangs off.

mod errors;
mod handlers;

pub(crate) use handlers::*;
