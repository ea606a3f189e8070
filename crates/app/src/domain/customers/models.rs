//! Customer Models

use cinemates::cakes::Weight;
use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::catalog::models::{AddonUuid, CakeUuid, TheaterUuid},
    uuids::TypedUuid,
};

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;

/// Problems with the contact details submitted at the start of a booking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("booking name is required")]
    MissingName,

    #[error("email is required")]
    MissingEmail,

    #[error("email {0:?} is not an email address")]
    InvalidEmail(String),

    #[error("phone number is required")]
    MissingPhone,

    #[error("at least one person is required")]
    NoPersons,

    #[error("the theater holds at most {max_persons} people")]
    OverCapacity { max_persons: u32 },
}

impl ContactError {
    /// Request field the error belongs to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingName => "booking_name",
            Self::MissingEmail | Self::InvalidEmail(_) => "email",
            Self::MissingPhone => "phone",
            Self::NoPersons | Self::OverCapacity { .. } => "number_of_persons",
        }
    }
}

/// Customer Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub uuid: CustomerUuid,
    pub booking_name: String,
    pub number_of_persons: u32,
    pub email: String,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub decoration_needed: bool,
    pub created_at: Timestamp,
}

/// New Customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub uuid: CustomerUuid,
    pub booking_name: String,
    pub number_of_persons: u32,
    pub email: String,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub decoration_needed: bool,

    /// Theater already chosen, if any; its capacity bounds `number_of_persons`.
    pub theater_uuid: Option<TheaterUuid>,
}

impl NewCustomer {
    /// Check the contact details.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContactError`] found.
    pub fn validate(&self, max_persons: Option<u32>) -> Result<(), ContactError> {
        if self.booking_name.trim().is_empty() {
            return Err(ContactError::MissingName);
        }

        let email = self.email.trim();

        if email.is_empty() {
            return Err(ContactError::MissingEmail);
        }

        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));

        if !well_formed {
            return Err(ContactError::InvalidEmail(email.to_string()));
        }

        if self.phone.trim().is_empty() {
            return Err(ContactError::MissingPhone);
        }

        if self.number_of_persons == 0 {
            return Err(ContactError::NoPersons);
        }

        if let Some(max_persons) = max_persons
            && self.number_of_persons > max_persons
        {
            return Err(ContactError::OverCapacity { max_persons });
        }

        Ok(())
    }
}

/// Occasion chosen by a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccasionSelection {
    pub occasion_name: String,
    pub nickname: Option<String>,
    pub partner_nickname: Option<String>,
}

/// Cake line to save. Zero quantity removes the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCakeSelection {
    pub cake_uuid: CakeUuid,
    pub weight: Weight,
    pub quantity: u32,
}

/// Saved cake line, priced from the catalog at the reference weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CakeSelection {
    pub cake_uuid: CakeUuid,
    pub weight: Weight,
    pub quantity: u32,
    pub unit_price: u64,
}

/// Add-on line to save. Zero quantity removes the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddonSelection {
    pub addon_uuid: AddonUuid,
    pub quantity: u32,
}

/// Saved add-on line, priced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonSelection {
    pub addon_uuid: AddonUuid,
    pub quantity: u32,
    pub unit_price: u64,
}

/// Everything a customer has selected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerSelections {
    pub occasion: Option<OccasionSelection>,
    pub cakes: Vec<CakeSelection>,
    pub addons: Vec<AddonSelection>,
}
