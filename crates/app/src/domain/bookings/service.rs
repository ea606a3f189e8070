//! Bookings service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::bookings::{
        errors::BookingsServiceError,
        models::{Booking, NewBooking},
        repository::PgBookingsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgBookingsService {
    db: Db,
    repository: PgBookingsRepository,
}

impl PgBookingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgBookingsRepository::new(),
        }
    }
}

#[async_trait]
impl BookingsService for PgBookingsService {
    async fn finalize(&self, booking: NewBooking) -> Result<Booking, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let booking = self
            .repository
            .create_booking(&mut tx, booking)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => BookingsServiceError::InvalidReference,
                other => other.into(),
            })?;

        tx.commit().await?;

        info!(
            booking = %booking.uuid,
            customer = %booking.customer_uuid,
            amount = booking.amount,
            "finalized booking"
        );

        Ok(booking)
    }

    async fn list_for_phone(&self, phone: &str) -> Result<Vec<Booking>, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let bookings = self.repository.list_for_phone(&mut tx, phone.trim()).await?;

        tx.commit().await?;

        Ok(bookings)
    }
}

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// Persist a paid booking. A gateway payment id finalizes at most one booking.
    async fn finalize(&self, booking: NewBooking) -> Result<Booking, BookingsServiceError>;

    /// Bookings whose customer used `phone` as primary or alternate number, newest first.
    async fn list_for_phone(&self, phone: &str) -> Result<Vec<Booking>, BookingsServiceError>;
}
