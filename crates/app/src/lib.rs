//! Persistence and services behind the Cinemates booking flow.

pub mod context;
pub mod database;
pub mod domain;
pub mod gateway;

#[cfg(test)]
mod test;

mod uuids;
