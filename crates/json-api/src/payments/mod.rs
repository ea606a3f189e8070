//! Payments
//!
//! Order creation and signature verification. Both routes carry the full draft so the server can
//! price it from the catalog instead of trusting the client's total.

mod errors;
mod handlers;
mod models;

pub(crate) use handlers::*;
