//! Payments service.

use std::sync::Arc;

use async_trait::async_trait;
use cinemates::{
    cakes::CakeLineItem,
    draft::{AddonLineItem, DraftSnapshot},
    pricing::{CouponOutcome, PricingInput, compute_total},
    signature,
};
use jiff::{Zoned, civil::Date};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    domain::{
        bookings::{
            BookingsService, BookingsServiceError,
            models::{BookedType, Booking, BookingUuid, NewBooking},
        },
        catalog::{
            CatalogService, CatalogServiceError,
            models::{AddonUuid, CakeUuid, LocationUuid, TheaterUuid},
        },
        coupons::{CouponsService, CouponsServiceError},
        customers::models::CustomerUuid,
        payment_orders::{PaymentOrdersService, PaymentOrdersServiceError, models::NewOrderRecord},
        payments::{
            errors::PaymentsServiceError,
            models::{NewPaymentOrder, PaymentConfirmation, PaymentOrder, Repriced},
        },
    },
    gateway::PaymentGateway,
};

fn local_today() -> Date {
    Zoned::now().date()
}

/// Payments backed by the catalog for prices and a gateway for orders.
#[derive(Clone)]
pub struct GatewayPaymentsService {
    catalog: Arc<dyn CatalogService>,
    coupons: Arc<dyn CouponsService>,
    bookings: Arc<dyn BookingsService>,
    orders: Arc<dyn PaymentOrdersService>,
    gateway: Arc<dyn PaymentGateway>,
    key_id: String,
    key_secret: String,
    today: fn() -> Date,
}

impl GatewayPaymentsService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        coupons: Arc<dyn CouponsService>,
        bookings: Arc<dyn BookingsService>,
        orders: Arc<dyn PaymentOrdersService>,
        gateway: Arc<dyn PaymentGateway>,
        key_id: String,
        key_secret: String,
    ) -> Self {
        Self {
            catalog,
            coupons,
            bookings,
            orders,
            gateway,
            key_id,
            key_secret,
            today: local_today,
        }
    }

    /// Same service, with "today" for coupon windows taken from `today`.
    #[must_use]
    pub fn with_clock(mut self, today: fn() -> Date) -> Self {
        self.today = today;
        self
    }

    /// Price `snapshot` from catalog prices, ignoring every amount the client sent.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentsServiceError`] when a referenced entry is unknown, the coupon does not
    /// apply, or pricing overflows.
    pub async fn reprice(
        &self,
        snapshot: &DraftSnapshot,
    ) -> Result<Repriced, PaymentsServiceError> {
        let theater = self
            .catalog
            .get_theater(TheaterUuid::from_uuid(snapshot.theater_uuid))
            .await
            .map_err(|error| catalog_error(error, "theater"))?;

        if theater.location_uuid != LocationUuid::from_uuid(snapshot.location_uuid) {
            return Err(PaymentsServiceError::UnknownReference("location"));
        }

        let mut cakes = Vec::with_capacity(snapshot.cakes.len());

        for line in &snapshot.cakes {
            let cake = self
                .catalog
                .get_cake(CakeUuid::from_uuid(line.cake_uuid))
                .await
                .map_err(|error| catalog_error(error, "cake"))?;

            if !cake.weight_tiers.contains(&line.weight) {
                return Err(PaymentsServiceError::UnknownReference("cake weight"));
            }

            cakes.push(CakeLineItem {
                cake_uuid: line.cake_uuid,
                name: cake.name,
                weight: line.weight,
                unit_price: cake.reference_price,
                quantity: line.quantity,
                eggless: line.eggless,
            });
        }

        let mut addons = Vec::with_capacity(snapshot.addons.len());

        for line in &snapshot.addons {
            let addon = self
                .catalog
                .get_addon(AddonUuid::from_uuid(line.addon_uuid))
                .await
                .map_err(|error| catalog_error(error, "add-on"))?;

            addons.push(AddonLineItem {
                addon_uuid: line.addon_uuid,
                name: addon.name,
                unit_price: addon.price,
                quantity: line.quantity,
            });
        }

        let coupon = match snapshot.coupon_code.as_deref() {
            Some(code) => {
                let record = self
                    .coupons
                    .find_by_code(code)
                    .await
                    .map_err(|error| match error {
                        CouponsServiceError::NotFound => {
                            PaymentsServiceError::UnknownCoupon(code.to_string())
                        }
                        other => PaymentsServiceError::Coupons(other),
                    })?;

                Some(
                    record
                        .to_coupon()
                        .map_err(|_invalid| PaymentsServiceError::UnknownCoupon(code.to_string()))?,
                )
            }
            None => None,
        };

        let input = PricingInput {
            theater_cost: theater.cost,
            decoration_cost: if snapshot.decoration {
                theater.decoration_price
            } else {
                0
            },
            cakes: &cakes,
            addons: &addons,
        };

        let quote = compute_total(&input, coupon.as_ref(), (self.today)())?;

        let discount = match quote.coupon() {
            Some(CouponOutcome::Applied { discount, .. }) => *discount,
            Some(CouponOutcome::Rejected { validity, .. }) => {
                return Err(PaymentsServiceError::CouponNotApplicable(*validity));
            }
            None => 0,
        };

        Ok(Repriced {
            total: quote.total_minor()?,
            discount,
        })
    }
}

fn catalog_error(error: CatalogServiceError, entry: &'static str) -> PaymentsServiceError {
    match error {
        CatalogServiceError::NotFound => PaymentsServiceError::UnknownReference(entry),
        other => PaymentsServiceError::Catalog(other),
    }
}

#[async_trait]
impl PaymentsService for GatewayPaymentsService {
    async fn create_order(
        &self,
        order: NewPaymentOrder,
    ) -> Result<PaymentOrder, PaymentsServiceError> {
        let requested = order.request.amount_minor_units;

        if requested == 0 {
            return Err(PaymentsServiceError::InvalidAmount);
        }

        if order.snapshot.final_price != requested {
            return Err(PaymentsServiceError::PriceMismatch {
                expected: requested,
                submitted: order.snapshot.final_price,
            });
        }

        let repriced = self.reprice(&order.snapshot).await?;

        if repriced.total != requested {
            warn!(
                expected = repriced.total,
                submitted = requested,
                "refusing order with tampered or stale amount"
            );

            return Err(PaymentsServiceError::PriceMismatch {
                expected: repriced.total,
                submitted: requested,
            });
        }

        let created = self.gateway.create_order(&order.request).await?;

        if created.amount_minor_units != requested {
            return Err(PaymentsServiceError::OrderMismatch {
                requested,
                order: created.amount_minor_units,
            });
        }

        self.orders
            .record(NewOrderRecord {
                order_id: created.order_id.clone(),
                customer_uuid: CustomerUuid::from_uuid(order.snapshot.customer_uuid),
                amount: requested,
                discount: repriced.discount,
                draft_digest: order.snapshot.digest(),
            })
            .await
            .map_err(PaymentsServiceError::OrderNotRecorded)?;

        info!(order = %created.order_id, amount = requested, "payment order created");

        Ok(PaymentOrder {
            order_id: created.order_id,
            amount_minor_units: created.amount_minor_units,
            currency: order.request.currency,
            receipt_ref: order.request.receipt_ref,
            key_id: self.key_id.clone(),
        })
    }

    async fn verify_payment(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Booking, PaymentsServiceError> {
        let PaymentConfirmation { payment, snapshot } = confirmation;

        if let Err(error) = signature::verify(
            self.key_secret.as_bytes(),
            &payment.order_id,
            &payment.payment_id,
            &payment.signature,
        ) {
            warn!(order = %payment.order_id, %error, "payment signature rejected");

            return Err(error.into());
        }

        let order = self
            .orders
            .find(&payment.order_id)
            .await
            .map_err(|error| match error {
                PaymentOrdersServiceError::NotFound => {
                    PaymentsServiceError::UnknownOrder(payment.order_id.clone())
                }
                other => PaymentsServiceError::OrderLookup(other),
            })?;

        if order.draft_digest != snapshot.digest() {
            warn!(
                order = %order.order_id,
                paid = order.amount,
                submitted = snapshot.final_price,
                "verified payment for a different draft"
            );

            return Err(PaymentsServiceError::DraftMismatch(order.order_id));
        }

        // Priced when the order was created; later catalog or coupon edits do not apply.
        let booking = self
            .bookings
            .finalize(NewBooking {
                uuid: BookingUuid::new(),
                customer_uuid: order.customer_uuid,
                theater_uuid: TheaterUuid::from_uuid(snapshot.theater_uuid),
                location_uuid: LocationUuid::from_uuid(snapshot.location_uuid),
                booked_date: snapshot.booked_date,
                booked_slot: snapshot.booked_slot,
                amount: order.amount,
                discount: order.discount,
                coupon_code: snapshot.coupon_code,
                gateway_order_id: payment.order_id,
                gateway_payment_id: payment.payment_id,
                booked_type: BookedType::Online,
            })
            .await
            .map_err(|error| match error {
                BookingsServiceError::AlreadyExists => PaymentsServiceError::AlreadyFinalized,
                other => PaymentsServiceError::Persistence(other),
            })?;

        Ok(booking)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Create a gateway order after checking the amount against server prices, and record what it
    /// pays for.
    async fn create_order(
        &self,
        order: NewPaymentOrder,
    ) -> Result<PaymentOrder, PaymentsServiceError>;

    /// Check the gateway signature and that the draft is the one the order was created for, then
    /// persist the paid booking at the order's amount.
    async fn verify_payment(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Booking, PaymentsServiceError>;
}
