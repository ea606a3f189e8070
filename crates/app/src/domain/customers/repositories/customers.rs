//! Customers Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    database::{count_param, try_get_count},
    domain::{
        catalog::models::TheaterUuid,
        customers::models::{Customer, CustomerUuid, NewCustomer},
    },
};

const CREATE_CUSTOMER_SQL: &str = include_str!("../sql/create_customer.sql");
const GET_CUSTOMER_SQL: &str = include_str!("../sql/get_customer.sql");
const GET_THEATER_CAPACITY_SQL: &str = include_str!("../sql/get_theater_capacity.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCustomersRepository;

impl PgCustomersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: NewCustomer,
    ) -> Result<Customer, sqlx::Error> {
        query_as::<Postgres, Customer>(CREATE_CUSTOMER_SQL)
            .bind(customer.uuid.into_uuid())
            .bind(customer.booking_name.trim())
            .bind(count_param(customer.number_of_persons, "number_of_persons")?)
            .bind(customer.email.trim())
            .bind(customer.phone.trim())
            .bind(customer.alternate_phone.as_deref().map(str::trim))
            .bind(customer.decoration_needed)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Customer, sqlx::Error> {
        query_as::<Postgres, Customer>(GET_CUSTOMER_SQL)
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn theater_capacity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        theater: TheaterUuid,
    ) -> Result<u32, sqlx::Error> {
        let max_persons = query_scalar::<Postgres, i32>(GET_THEATER_CAPACITY_SQL)
            .bind(theater.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u32::try_from(max_persons).map_err(|e| sqlx::Error::ColumnDecode {
            index: "max_persons".to_string(),
            source: Box::new(e),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Customer {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get("uuid")?),
            booking_name: row.try_get("booking_name")?,
            number_of_persons: try_get_count(row, "number_of_persons")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            alternate_phone: row.try_get("alternate_phone")?,
            decoration_needed: row.try_get("decoration_needed")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
