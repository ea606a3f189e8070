//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        bookings::{BookingsService, PgBookingsService},
        catalog::{CatalogService, PgCatalogService},
        coupons::{CouponsService, PgCouponsService},
        customers::{CustomersService, PgCustomersService},
        payment_orders::PgPaymentOrdersService,
        payments::{GatewayPaymentsService, PaymentsService},
        slots::{PgSlotsService, SlotsService},
    },
    gateway::{GatewayError, RazorpayConfig, RazorpayGateway},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build payment gateway client")]
    Gateway(#[source] GatewayError),
}

/// Everything needed to build an [`AppContext`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub gateway: RazorpayConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub db: Db,
    pub catalog: Arc<dyn CatalogService>,
    pub coupons: Arc<dyn CouponsService>,
    pub customers: Arc<dyn CustomersService>,
    pub slots: Arc<dyn SlotsService>,
    pub bookings: Arc<dyn BookingsService>,
    pub payments: Arc<dyn PaymentsService>,
}

impl AppContext {
    /// Connect to the database and wire every service.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or building the gateway client
    /// fails.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let key_id = config.gateway.key_id.clone();
        let key_secret = config.gateway.key_secret.clone();
        let gateway = RazorpayGateway::new(config.gateway).map_err(AppInitError::Gateway)?;

        let catalog: Arc<dyn CatalogService> = Arc::new(PgCatalogService::new(db.clone()));
        let coupons: Arc<dyn CouponsService> = Arc::new(PgCouponsService::new(db.clone()));
        let bookings: Arc<dyn BookingsService> = Arc::new(PgBookingsService::new(db.clone()));

        let payments = GatewayPaymentsService::new(
            Arc::clone(&catalog),
            Arc::clone(&coupons),
            Arc::clone(&bookings),
            Arc::new(PgPaymentOrdersService::new(db.clone())),
            Arc::new(gateway),
            key_id,
            key_secret,
        );

        Ok(Self {
            customers: Arc::new(PgCustomersService::new(db.clone())),
            slots: Arc::new(PgSlotsService::new(db.clone())),
            payments: Arc::new(payments),
            catalog,
            coupons,
            bookings,
            db,
        })
    }
}
