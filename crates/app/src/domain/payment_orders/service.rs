//! Payment orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::payment_orders::{
        errors::PaymentOrdersServiceError,
        models::{NewOrderRecord, OrderRecord},
        repository::PgPaymentOrdersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPaymentOrdersService {
    db: Db,
    repository: PgPaymentOrdersRepository,
}

impl PgPaymentOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPaymentOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl PaymentOrdersService for PgPaymentOrdersService {
    async fn record(
        &self,
        order: NewOrderRecord,
    ) -> Result<OrderRecord, PaymentOrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.create_order(&mut tx, order).await?;

        tx.commit().await?;

        info!(
            order = %order.order_id,
            customer = %order.customer_uuid,
            amount = order.amount,
            "recorded payment order"
        );

        Ok(order)
    }

    async fn find(&self, order_id: &str) -> Result<OrderRecord, PaymentOrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.find_order(&mut tx, order_id).await?;

        tx.commit().await?;

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait PaymentOrdersService: Send + Sync {
    /// Remember what a freshly created gateway order pays for.
    async fn record(&self, order: NewOrderRecord) -> Result<OrderRecord, PaymentOrdersServiceError>;

    /// The recorded order with gateway id `order_id`.
    async fn find(&self, order_id: &str) -> Result<OrderRecord, PaymentOrdersServiceError>;
}
