//! Bookings Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{amount_param, try_get_amount},
    domain::{
        bookings::models::{Booking, BookingUuid, NewBooking},
        catalog::models::{LocationUuid, TheaterUuid},
        customers::models::CustomerUuid,
    },
};

const CREATE_BOOKING_SQL: &str = include_str!("sql/create_booking.sql");
const LIST_BOOKINGS_FOR_PHONE_SQL: &str = include_str!("sql/list_bookings_for_phone.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBookingsRepository;

impl PgBookingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a booking for an existing customer.
    ///
    /// Fails with `RowNotFound` when the customer does not exist.
    pub(crate) async fn create_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: NewBooking,
    ) -> Result<Booking, sqlx::Error> {
        query_as::<Postgres, Booking>(CREATE_BOOKING_SQL)
            .bind(booking.uuid.into_uuid())
            .bind(booking.customer_uuid.into_uuid())
            .bind(booking.theater_uuid.into_uuid())
            .bind(booking.location_uuid.into_uuid())
            .bind(SqlxDate::from(booking.booked_date))
            .bind(booking.booked_slot)
            .bind(amount_param(booking.amount, "amount")?)
            .bind(amount_param(booking.discount, "discount")?)
            .bind(booking.coupon_code)
            .bind(booking.gateway_order_id)
            .bind(booking.gateway_payment_id)
            .bind(booking.booked_type.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_for_phone(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        phone: &str,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        query_as::<Postgres, Booking>(LIST_BOOKINGS_FOR_PHONE_SQL)
            .bind(phone)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Booking {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let booked_type: String = row.try_get("booked_type")?;

        Ok(Self {
            uuid: BookingUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            theater_uuid: TheaterUuid::from_uuid(row.try_get("theater_uuid")?),
            location_uuid: LocationUuid::from_uuid(row.try_get("location_uuid")?),
            booking_name: row.try_get("booking_name")?,
            booked_date: row.try_get::<SqlxDate, _>("booked_date")?.to_jiff(),
            booked_slot: row.try_get("booked_slot")?,
            amount: try_get_amount(row, "amount")?,
            discount: try_get_amount(row, "discount")?,
            coupon_code: row.try_get("coupon_code")?,
            gateway_order_id: row.try_get("gateway_order_id")?,
            gateway_payment_id: row.try_get("gateway_payment_id")?,
            booked_type: booked_type
                .parse()
                .map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
