//! Payment Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{amount_param, try_get_amount},
    domain::{
        customers::models::CustomerUuid,
        payment_orders::models::{NewOrderRecord, OrderRecord},
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const FIND_ORDER_SQL: &str = include_str!("sql/find_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentOrdersRepository;

impl PgPaymentOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrderRecord,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.order_id)
            .bind(order.customer_uuid.into_uuid())
            .bind(amount_param(order.amount, "amount")?)
            .bind(amount_param(order.discount, "discount")?)
            .bind(order.draft_digest)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_id: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(FIND_ORDER_SQL)
            .bind(order_id)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_id: row.try_get("order_id")?,
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            amount: try_get_amount(row, "amount")?,
            discount: try_get_amount(row, "discount")?,
            draft_digest: row.try_get("draft_digest")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
