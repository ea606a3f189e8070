//! Customer Repositories

mod customers;
mod selections;

pub(crate) use customers::PgCustomersRepository;
pub(crate) use selections::PgSelectionsRepository;
