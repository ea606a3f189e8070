//! State

use std::sync::Arc;

use cinemates_app::{
    context::AppContext,
    domain::{
        bookings::BookingsService, catalog::CatalogService, coupons::CouponsService,
        customers::CustomersService, payments::PaymentsService, slots::SlotsService,
    },
};

/// Services shared by every handler.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) catalog: Arc<dyn CatalogService>,
    pub(crate) coupons: Arc<dyn CouponsService>,
    pub(crate) customers: Arc<dyn CustomersService>,
    pub(crate) slots: Arc<dyn SlotsService>,
    pub(crate) bookings: Arc<dyn BookingsService>,
    pub(crate) payments: Arc<dyn PaymentsService>,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self {
            catalog: app.catalog,
            coupons: app.coupons,
            customers: app.customers,
            slots: app.slots,
            bookings: app.bookings,
            payments: app.payments,
        })
    }
}
