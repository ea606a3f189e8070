//! Slot Reservation Models

use jiff::{Timestamp, civil::Date};

use crate::{
    domain::catalog::models::{LocationUuid, TheaterUuid},
    uuids::TypedUuid,
};

/// Slot Reservation UUID
pub type SlotReservationUuid = TypedUuid<SlotReservation>;

/// A reserved (theater, location, date, slot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReservation {
    pub uuid: SlotReservationUuid,
    pub theater_uuid: TheaterUuid,
    pub location_uuid: LocationUuid,
    pub booked_date: Date,
    pub booked_slot: String,
    pub created_at: Timestamp,
}

/// Where a theater is and which windows it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TheaterSlots {
    pub(crate) location_uuid: LocationUuid,
    pub(crate) slots: Vec<String>,
}
