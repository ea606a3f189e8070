//! Database connection management

use sqlx::{PgPool, Postgres, Transaction};

/// Storage error carried by the service error types.
pub use sqlx::Error as SqlError;

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Underlying pool, for readiness checks.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Read a non-negative `BIGINT` amount column as `u64`.
pub(crate) fn try_get_amount(row: &sqlx::postgres::PgRow, column: &str) -> sqlx::Result<u64> {
    use sqlx::Row;

    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert an amount to the `BIGINT` it is stored as.
pub(crate) fn amount_param(amount: u64, column: &str) -> sqlx::Result<i64> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Read a non-negative `INTEGER` count column as `u32`.
pub(crate) fn try_get_count(row: &sqlx::postgres::PgRow, column: &str) -> sqlx::Result<u32> {
    use sqlx::Row;

    let count: i32 = row.try_get(column)?;

    u32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert a count to the `INTEGER` it is stored as.
pub(crate) fn count_param(count: u32, column: &str) -> sqlx::Result<i32> {
    i32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
