//! Slot natural keys

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Longest accepted slot name.
pub const MAX_SLOT_NAME_LEN: usize = 100;

/// Errors raised while validating a slot reservation request.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SlotKeyError {
    /// Dates must be ISO calendar dates (`YYYY-MM-DD`).
    #[error("{0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),

    /// Slot name was blank.
    #[error("slot must not be empty")]
    EmptySlot,

    /// Slot name exceeded [`MAX_SLOT_NAME_LEN`].
    #[error("slot name is longer than {MAX_SLOT_NAME_LEN} characters")]
    SlotTooLong,

    /// The date has already passed.
    #[error("{date} is in the past")]
    InPast {
        /// Requested day.
        date: Date,
    },

    /// The theater does not offer this window.
    #[error("theater does not offer slot {slot:?}")]
    NotOffered {
        /// Requested window.
        slot: String,
    },
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`SlotKeyError::InvalidDate`] for any other shape, or an impossible date such as
/// `2026-02-30`.
pub fn parse_date(raw: &str) -> Result<Date, SlotKeyError> {
    let raw = raw.trim();

    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(position, byte)| match position {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });

    if !shaped {
        return Err(SlotKeyError::InvalidDate(raw.to_string()));
    }

    raw.parse::<Date>()
        .map_err(|_parse_error| SlotKeyError::InvalidDate(raw.to_string()))
}

/// The (theater, location, date, slot) tuple that is unique among reservations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// Theater.
    pub theater_uuid: Uuid,
    /// Location the theater belongs to.
    pub location_uuid: Uuid,
    /// Booked day.
    pub date: Date,
    /// Named window.
    pub slot: String,
}

impl SlotKey {
    /// Validate raw request input into a key.
    ///
    /// # Errors
    ///
    /// Returns [`SlotKeyError`] for a malformed date or slot name.
    pub fn parse(
        theater_uuid: Uuid,
        location_uuid: Uuid,
        date: &str,
        slot: &str,
    ) -> Result<Self, SlotKeyError> {
        let date = parse_date(date)?;
        let slot = slot.trim();

        if slot.is_empty() {
            return Err(SlotKeyError::EmptySlot);
        }

        if slot.chars().count() > MAX_SLOT_NAME_LEN {
            return Err(SlotKeyError::SlotTooLong);
        }

        Ok(Self {
            theater_uuid,
            location_uuid,
            date,
            slot: slot.to_string(),
        })
    }

    /// Reject keys for days before `today`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotKeyError::InPast`].
    pub fn ensure_not_past(&self, today: Date) -> Result<(), SlotKeyError> {
        if self.date < today {
            return Err(SlotKeyError::InPast { date: self.date });
        }

        Ok(())
    }

    /// Reject windows the theater does not offer.
    ///
    /// # Errors
    ///
    /// Returns [`SlotKeyError::NotOffered`].
    pub fn ensure_offered<S: AsRef<str>>(&self, offered: &[S]) -> Result<(), SlotKeyError> {
        if offered.iter().any(|slot| slot.as_ref().trim() == self.slot) {
            return Ok(());
        }

        Err(SlotKeyError::NotOffered {
            slot: self.slot.clone(),
        })
    }
}
