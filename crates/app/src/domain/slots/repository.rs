//! Slot Reservations Repository

use cinemates::slots::SlotKey;
use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    catalog::models::{LocationUuid, TheaterUuid},
    slots::models::{SlotReservation, SlotReservationUuid, TheaterSlots},
};

const GET_THEATER_SLOTS_SQL: &str = include_str!("sql/get_theater_slots.sql");
const FIND_RESERVATION_SQL: &str = include_str!("sql/find_reservation.sql");
const CREATE_RESERVATION_SQL: &str = include_str!("sql/create_reservation.sql");
const LIST_RESERVATIONS_SQL: &str = include_str!("sql/list_reservations.sql");
const DELETE_RESERVATION_SQL: &str = include_str!("sql/delete_reservation.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSlotsRepository;

impl PgSlotsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_theater_slots(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        theater: TheaterUuid,
    ) -> Result<TheaterSlots, sqlx::Error> {
        query_as::<Postgres, TheaterSlots>(GET_THEATER_SLOTS_SQL)
            .bind(theater.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &SlotKey,
    ) -> Result<Option<SlotReservation>, sqlx::Error> {
        query_as::<Postgres, SlotReservation>(FIND_RESERVATION_SQL)
            .bind(key.theater_uuid)
            .bind(key.location_uuid)
            .bind(SqlxDate::from(key.date))
            .bind(&key.slot)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: SlotReservationUuid,
        key: &SlotKey,
    ) -> Result<SlotReservation, sqlx::Error> {
        query_as::<Postgres, SlotReservation>(CREATE_RESERVATION_SQL)
            .bind(uuid.into_uuid())
            .bind(key.theater_uuid)
            .bind(key.location_uuid)
            .bind(SqlxDate::from(key.date))
            .bind(&key.slot)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_reservations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        date: Date,
    ) -> Result<Vec<SlotReservation>, sqlx::Error> {
        query_as::<Postgres, SlotReservation>(LIST_RESERVATIONS_SQL)
            .bind(SqlxDate::from(date))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: SlotReservationUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_RESERVATION_SQL)
            .bind(reservation.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for SlotReservation {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SlotReservationUuid::from_uuid(row.try_get("uuid")?),
            theater_uuid: TheaterUuid::from_uuid(row.try_get("theater_uuid")?),
            location_uuid: LocationUuid::from_uuid(row.try_get("location_uuid")?),
            booked_date: row.try_get::<SqlxDate, _>("booked_date")?.to_jiff(),
            booked_slot: row.try_get("booked_slot")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for TheaterSlots {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            location_uuid: LocationUuid::from_uuid(row.try_get("location_uuid")?),
            slots: row.try_get("slots")?,
        })
    }
}
