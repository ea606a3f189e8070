//! Catalog Handlers

pub(crate) mod addons;
pub(crate) mod cakes;
pub(crate) mod locations;
pub(crate) mod occasions;
pub(crate) mod theaters;
