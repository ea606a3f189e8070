//! Slot reservation service.

use async_trait::async_trait;
use cinemates::slots::SlotKey;
use jiff::{Zoned, civil::Date};
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        catalog::models::{LocationUuid, TheaterUuid},
        slots::{
            errors::SlotsServiceError,
            models::{SlotReservation, SlotReservationUuid},
            repository::PgSlotsRepository,
        },
    },
};

fn local_today() -> Date {
    Zoned::now().date()
}

#[derive(Debug, Clone)]
pub struct PgSlotsService {
    db: Db,
    repository: PgSlotsRepository,
    today: fn() -> Date,
}

impl PgSlotsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::with_clock(db, local_today)
    }

    /// Service whose notion of "today" comes from `today`.
    #[must_use]
    pub fn with_clock(db: Db, today: fn() -> Date) -> Self {
        Self {
            db,
            repository: PgSlotsRepository::new(),
            today,
        }
    }
}

#[async_trait]
impl SlotsService for PgSlotsService {
    async fn check_and_reserve(&self, key: SlotKey) -> Result<SlotReservation, SlotsServiceError> {
        key.ensure_not_past((self.today)())?;

        let mut tx = self.db.begin().await?;

        let theater = self
            .repository
            .get_theater_slots(&mut tx, TheaterUuid::from_uuid(key.theater_uuid))
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => SlotsServiceError::InvalidReference,
                other => other.into(),
            })?;

        if theater.location_uuid != LocationUuid::from_uuid(key.location_uuid) {
            return Err(SlotsServiceError::InvalidReference);
        }

        key.ensure_offered(&theater.slots)?;

        // Fast path only: the unique constraint decides races, and maps to the
        // same Conflict below.
        if self.repository.find_reservation(&mut tx, &key).await?.is_some() {
            debug!(slot = %key.slot, date = %key.date, "slot already reserved");

            return Err(SlotsServiceError::Conflict);
        }

        let reservation = self
            .repository
            .create_reservation(&mut tx, SlotReservationUuid::new(), &key)
            .await?;

        tx.commit().await?;

        info!(
            reservation = %reservation.uuid,
            theater = %reservation.theater_uuid,
            date = %reservation.booked_date,
            slot = %reservation.booked_slot,
            "reserved slot"
        );

        Ok(reservation)
    }

    async fn list_reservations(
        &self,
        date: Date,
    ) -> Result<Vec<SlotReservation>, SlotsServiceError> {
        let mut tx = self.db.begin().await?;

        let reservations = self.repository.list_reservations(&mut tx, date).await?;

        tx.commit().await?;

        Ok(reservations)
    }

    async fn release(&self, reservation: SlotReservationUuid) -> Result<(), SlotsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_reservation(&mut tx, reservation)
            .await?;

        if rows_affected == 0 {
            return Err(SlotsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(reservation = %reservation, "released slot");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait SlotsService: Send + Sync {
    /// Reserve the natural key if nobody holds it.
    ///
    /// Both a reservation found up front and a concurrent insert losing on the
    /// unique constraint surface as [`SlotsServiceError::Conflict`].
    async fn check_and_reserve(&self, key: SlotKey) -> Result<SlotReservation, SlotsServiceError>;

    /// Reservations on `date`, across all theaters.
    async fn list_reservations(
        &self,
        date: Date,
    ) -> Result<Vec<SlotReservation>, SlotsServiceError>;

    /// Delete a reservation.
    async fn release(&self, reservation: SlotReservationUuid) -> Result<(), SlotsServiceError>;
}

#[cfg(test)]
mod tests {
    use cinemates::slots::SlotKeyError;
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers};

    use super::*;

    fn key(theater: TheaterUuid, location: LocationUuid, day: Date, slot: &str) -> SlotKey {
        SlotKey {
            theater_uuid: theater.into_uuid(),
            location_uuid: location.into_uuid(),
            date: day,
            slot: slot.to_string(),
        }
    }

    #[tokio::test]
    async fn reserves_then_conflicts_on_same_key() -> TestResult {
        let ctx = TestContext::new().await;

        let location = helpers::seed_location(&ctx, "Indiranagar", true).await?;
        let theater =
            helpers::seed_theater(&ctx, location, "Aurora", &["Morning", "Evening"]).await?;

        let first = ctx
            .slots
            .check_and_reserve(key(theater, location, date(2099, 3, 14), "Evening"))
            .await?;

        assert_eq!(first.booked_date, date(2099, 3, 14));
        assert_eq!(first.booked_slot, "Evening");

        let second = ctx
            .slots
            .check_and_reserve(key(theater, location, date(2099, 3, 14), "Evening"))
            .await;

        assert!(
            matches!(second, Err(SlotsServiceError::Conflict)),
            "expected Conflict, got {second:?}"
        );

        // A different window on the same day is still free.
        ctx.slots
            .check_and_reserve(key(theater, location, date(2099, 3, 14), "Morning"))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_reservations_have_exactly_one_winner() -> TestResult {
        let ctx = TestContext::new().await;

        let location = helpers::seed_location(&ctx, "Indiranagar", true).await?;
        let theater = helpers::seed_theater(&ctx, location, "Aurora", &["Evening"]).await?;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slots = ctx.slots.clone();
                let key = key(theater, location, date(2099, 6, 1), "Evening");

                tokio::spawn(async move { slots.check_and_reserve(key).await })
            })
            .collect();

        let mut reserved = 0;
        let mut conflicts = 0;

        for handle in handles {
            match handle.await? {
                Ok(_) => reserved += 1,
                Err(SlotsServiceError::Conflict) => conflicts += 1,
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(reserved, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(ctx.slots.list_reservations(date(2099, 6, 1)).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn constraint_conflict_without_pre_check_maps_to_conflict() -> TestResult {
        let ctx = TestContext::new().await;

        let location = helpers::seed_location(&ctx, "Indiranagar", true).await?;
        let theater = helpers::seed_theater(&ctx, location, "Aurora", &["Evening"]).await?;
        let key = key(theater, location, date(2099, 6, 2), "Evening");

        let repository = PgSlotsRepository::new();
        let mut tx = ctx.db.pool().begin().await?;

        repository
            .create_reservation(&mut tx, SlotReservationUuid::new(), &key)
            .await?;

        let error: SlotsServiceError = repository
            .create_reservation(&mut tx, SlotReservationUuid::new(), &key)
            .await
            .err()
            .ok_or("expected unique violation")?
            .into();

        assert!(
            matches!(error, SlotsServiceError::Conflict),
            "expected Conflict, got {error:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejects_slot_the_theater_does_not_offer() -> TestResult {
        let ctx = TestContext::new().await;

        let location = helpers::seed_location(&ctx, "Indiranagar", true).await?;
        let theater = helpers::seed_theater(&ctx, location, "Aurora", &["Evening"]).await?;

        let result = ctx
            .slots
            .check_and_reserve(key(theater, location, date(2099, 3, 14), "Midnight"))
            .await;

        assert!(
            matches!(
                result,
                Err(SlotsServiceError::Validation(SlotKeyError::NotOffered { .. }))
            ),
            "expected NotOffered, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejects_theater_at_another_location() -> TestResult {
        let ctx = TestContext::new().await;

        let indiranagar = helpers::seed_location(&ctx, "Indiranagar", true).await?;
        let koramangala = helpers::seed_location(&ctx, "Koramangala", true).await?;
        let theater = helpers::seed_theater(&ctx, indiranagar, "Aurora", &["Evening"]).await?;

        let result = ctx
            .slots
            .check_and_reserve(key(theater, koramangala, date(2099, 3, 14), "Evening"))
            .await;

        assert!(
            matches!(result, Err(SlotsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejects_past_dates() -> TestResult {
        let ctx = TestContext::new().await;

        let location = helpers::seed_location(&ctx, "Indiranagar", true).await?;
        let theater = helpers::seed_theater(&ctx, location, "Aurora", &["Evening"]).await?;

        let slots = PgSlotsService::with_clock(ctx.db(), || date(2026, 5, 10));

        let result = slots
            .check_and_reserve(key(theater, location, date(2026, 5, 9), "Evening"))
            .await;

        assert!(
            matches!(
                result,
                Err(SlotsServiceError::Validation(SlotKeyError::InPast { .. }))
            ),
            "expected InPast, got {result:?}"
        );

        slots
            .check_and_reserve(key(theater, location, date(2026, 5, 10), "Evening"))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn release_frees_the_slot() -> TestResult {
        let ctx = TestContext::new().await;

        let location = helpers::seed_location(&ctx, "Indiranagar", true).await?;
        let theater = helpers::seed_theater(&ctx, location, "Aurora", &["Evening"]).await?;

        let reservation = ctx
            .slots
            .check_and_reserve(key(theater, location, date(2099, 3, 14), "Evening"))
            .await?;

        ctx.slots.release(reservation.uuid).await?;

        let again = ctx.slots.release(reservation.uuid).await;

        assert!(
            matches!(again, Err(SlotsServiceError::NotFound)),
            "expected NotFound, got {again:?}"
        );

        ctx.slots
            .check_and_reserve(key(theater, location, date(2099, 3, 14), "Evening"))
            .await?;

        Ok(())
    }
}
