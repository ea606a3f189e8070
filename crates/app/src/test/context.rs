//! Test context for service-level integration tests.

use crate::{
    database::Db,
    domain::{
        bookings::PgBookingsService, catalog::PgCatalogService, coupons::PgCouponsService,
        customers::PgCustomersService, payment_orders::PgPaymentOrdersService,
        slots::PgSlotsService,
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub catalog: PgCatalogService,
    pub coupons: PgCouponsService,
    pub customers: PgCustomersService,
    pub slots: PgSlotsService,
    pub bookings: PgBookingsService,
    pub payment_orders: PgPaymentOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            catalog: PgCatalogService::new(db.clone()),
            coupons: PgCouponsService::new(db.clone()),
            customers: PgCustomersService::new(db.clone()),
            slots: PgSlotsService::new(db.clone()),
            bookings: PgBookingsService::new(db.clone()),
            payment_orders: PgPaymentOrdersService::new(db),
            db: test_db,
        }
    }

    /// A fresh handle on the test database, for services built inside a test.
    pub fn db(&self) -> Db {
        Db::new(self.db.pool().clone())
    }
}
