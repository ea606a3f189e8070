//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use cinemates_app::{
    database::SqlError,
    domain::{
        bookings::MockBookingsService, catalog::MockCatalogService, coupons::MockCouponsService,
        customers::MockCustomersService, payments::MockPaymentsService, slots::MockSlotsService,
    },
};

use crate::state::State;

/// One mock per service. Mocks without expectations fail the test on any call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) catalog: MockCatalogService,
    pub(crate) coupons: MockCouponsService,
    pub(crate) customers: MockCustomersService,
    pub(crate) slots: MockSlotsService,
    pub(crate) bookings: MockBookingsService,
    pub(crate) payments: MockPaymentsService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        Arc::new(State {
            catalog: Arc::new(self.catalog),
            coupons: Arc::new(self.coupons),
            customers: Arc::new(self.customers),
            slots: Arc::new(self.slots),
            bookings: Arc::new(self.bookings),
            payments: Arc::new(self.payments),
        })
    }

    /// Serve `route` with these mocks injected.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }
}

/// A storage failure for error-path tests.
pub(crate) fn sql_error() -> SqlError {
    SqlError::PoolClosed
}
