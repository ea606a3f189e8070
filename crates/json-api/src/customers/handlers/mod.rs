//! Customer Handlers

pub(crate) mod addon;
pub(crate) mod cake;
pub(crate) mod create;
pub(crate) mod occasion;
