//! Booking Models

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::Date};

use crate::{
    domain::{
        catalog::models::{LocationUuid, TheaterUuid},
        customers::models::CustomerUuid,
    },
    uuids::TypedUuid,
};

/// Booking UUID
pub type BookingUuid = TypedUuid<Booking>;

/// How a booking was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookedType {
    /// Paid through the gateway.
    Online,
    /// Entered by staff.
    Offline,
}

impl BookedType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for BookedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(format!("unknown booking type {other:?}")),
        }
    }
}

/// Booking Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub uuid: BookingUuid,
    pub customer_uuid: CustomerUuid,
    pub theater_uuid: TheaterUuid,
    pub location_uuid: LocationUuid,
    pub booking_name: String,
    pub booked_date: Date,
    pub booked_slot: String,

    /// Amount charged, in minor units.
    pub amount: u64,

    /// Coupon discount included in `amount`, in minor units.
    pub discount: u64,

    pub coupon_code: Option<String>,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub booked_type: BookedType,
    pub created_at: Timestamp,
}

/// New Booking
///
/// The booking name is copied from the customer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub uuid: BookingUuid,
    pub customer_uuid: CustomerUuid,
    pub theater_uuid: TheaterUuid,
    pub location_uuid: LocationUuid,
    pub booked_date: Date,
    pub booked_slot: String,
    pub amount: u64,
    pub discount: u64,
    pub coupon_code: Option<String>,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub booked_type: BookedType,
}
