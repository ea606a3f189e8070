//! Extension traits

mod date;
mod depot;
mod flow;
mod result;

pub(crate) use date::DateParamExt as _;
pub(crate) use depot::DepotExt as _;
pub(crate) use flow::FlowErrorExt as _;
pub(crate) use result::ResultExt as _;
