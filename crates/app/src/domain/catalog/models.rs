//! Catalog Models

use cinemates::cakes::Weight;
use smallvec::SmallVec;

use crate::uuids::TypedUuid;

/// Location UUID
pub type LocationUuid = TypedUuid<Location>;

/// Theater UUID
pub type TheaterUuid = TypedUuid<Theater>;

/// Occasion UUID
pub type OccasionUuid = TypedUuid<Occasion>;

/// Cake UUID
pub type CakeUuid = TypedUuid<Cake>;

/// Addon UUID
pub type AddonUuid = TypedUuid<Addon>;

/// Location Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub uuid: LocationUuid,
    pub name: String,
    pub address: String,
    pub parking_available: bool,
}

/// Theater Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theater {
    pub uuid: TheaterUuid,
    pub location_uuid: LocationUuid,
    pub name: String,

    /// Rental for one slot, in minor units.
    pub cost: u64,

    /// Decoration charge, in minor units.
    pub decoration_price: u64,

    /// Guests included in the rental.
    pub base_persons: u32,

    /// Capacity.
    pub max_persons: u32,

    /// Named windows the theater can be booked for.
    pub slots: Vec<String>,
}

/// Occasion Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occasion {
    pub uuid: OccasionUuid,
    pub name: String,
    pub image_url: Option<String>,
}

/// Cake Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cake {
    pub uuid: CakeUuid,
    pub name: String,
    pub image_url: Option<String>,
    pub eggless: bool,

    /// Price of the 500 g reference weight, in minor units.
    pub reference_price: u64,

    /// Weights the cake is sold in.
    pub weight_tiers: SmallVec<[Weight; 4]>,
}

/// Addon Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addon {
    pub uuid: AddonUuid,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,

    /// Unit price in minor units.
    pub price: u64,
}
