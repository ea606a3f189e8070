//! Booking drafts
//!
//! A [`BookingDraft`] is the typed, in-progress booking accumulated across wizard steps. It is
//! persisted through a string-keyed [`DraftStorage`] (browser session storage in the web client,
//! [`MemoryStorage`] elsewhere), one key per field, so a refresh at any step can rebuild it.
//! Readers must tolerate missing or half-written keys: [`DraftSession::load`] skips anything it
//! cannot decode and recomputes every derived amount.

use std::{collections::BTreeMap, fmt};

use jiff::{Zoned, civil::Date};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cakes::CakeLineItem,
    coupons::{Coupon, CouponError},
    pricing::{self, CouponOutcome, PricingError, PricingInput, Quote},
    wizard::{DraftField, WizardStep},
};

/// Storage keys, one per draft field.
pub mod keys {
    /// Customer created at the contact step.
    pub const CUSTOMER: &str = "customer_uuid";
    /// Decoration requested at the contact step.
    pub const DECORATION: &str = "decoration";
    /// Selected location.
    pub const LOCATION: &str = "location";
    /// Selected theater.
    pub const THEATER: &str = "theater";
    /// Selected slot.
    pub const SLOT: &str = "slot";
    /// Selected occasion and nicknames.
    pub const OCCASION: &str = "occasion";
    /// Cake lines.
    pub const CAKES: &str = "cakes";
    /// Add-on lines keyed by add-on.
    pub const ADDONS: &str = "addons";
    /// Applied coupon.
    pub const COUPON: &str = "coupon";
    /// Derived cake subtotal.
    pub const CAKE_SUBTOTAL: &str = "cake_subtotal";
    /// Derived add-on subtotal.
    pub const ADDON_SUBTOTAL: &str = "addon_subtotal";
    /// Derived payable amount.
    pub const FINAL_PRICE: &str = "final_price";

    /// Every key a draft may write.
    pub const ALL: [&str; 12] = [
        CUSTOMER,
        DECORATION,
        LOCATION,
        THEATER,
        SLOT,
        OCCASION,
        CAKES,
        ADDONS,
        COUPON,
        CAKE_SUBTOTAL,
        ADDON_SUBTOTAL,
        FINAL_PRICE,
    ];
}

/// String-keyed storage a draft is persisted in.
pub trait DraftStorage {
    /// Raw value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String);

    /// Remove `key`.
    fn remove(&mut self, key: &str);
}

/// In-memory [`DraftStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DraftStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Errors raised while mutating a draft.
#[derive(Debug, Error)]
pub enum DraftError {
    /// Derived amounts could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The coupon could not be applied.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// A field could not be encoded for storage.
    #[error("failed to encode draft field {key}")]
    Encode {
        /// Storage key.
        key: &'static str,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Selected location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationChoice {
    /// Location identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
}

/// Selected theater with the prices the draft is quoted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterChoice {
    /// Theater identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Rental for one slot, in minor units.
    pub cost: u64,
    /// Decoration charge, in minor units.
    pub decoration_price: u64,
}

/// Selected slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChoice {
    /// Booked day.
    pub date: Date,
    /// Named time window.
    pub name: String,
}

/// Selected occasion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccasionChoice {
    /// Occasion name, e.g. "Birthday".
    pub name: String,
    /// Nickname of the person celebrated.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Partner nickname for couple occasions.
    #[serde(default)]
    pub partner_nickname: Option<String>,
}

/// One add-on selection within a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonLineItem {
    /// Catalog add-on.
    pub addon_uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Unit price in minor units.
    pub unit_price: u64,
    /// Quantity.
    pub quantity: u32,
}

impl AddonLineItem {
    /// Unit price multiplied by quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// The in-progress booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    /// Customer owning the draft.
    pub customer_uuid: Option<Uuid>,
    /// Decoration requested.
    pub decoration: bool,
    /// Selected location.
    pub location: Option<LocationChoice>,
    /// Selected theater.
    pub theater: Option<TheaterChoice>,
    /// Selected slot.
    pub slot: Option<SlotChoice>,
    /// Selected occasion.
    pub occasion: Option<OccasionChoice>,
    /// Cake lines in selection order.
    pub cakes: SmallVec<[CakeLineItem; 4]>,
    /// Add-on lines keyed by add-on.
    pub addons: BTreeMap<Uuid, AddonLineItem>,
    /// Applied coupon.
    pub coupon: Option<Coupon>,
    /// Cake subtotal as last stored.
    pub cake_subtotal: Option<u64>,
    /// Add-on subtotal as last stored.
    pub addon_subtotal: Option<u64>,
    /// Payable amount as last stored. Only trusted after [`DraftSession::load`] recomputed it.
    pub final_price: Option<u64>,
}

impl BookingDraft {
    /// Whether `field` is populated.
    pub fn has(&self, field: DraftField) -> bool {
        match field {
            DraftField::Customer => self.customer_uuid.is_some(),
            DraftField::Location => self.location.is_some(),
            DraftField::Theater => self.theater.is_some(),
            DraftField::Slot => self.slot.is_some(),
            DraftField::Occasion => self.occasion.is_some(),
            DraftField::FinalPrice => self.final_price.is_some(),
        }
    }

    /// Fields `step` needs that are not populated yet, in precondition order.
    pub fn missing_for(&self, step: WizardStep) -> Vec<DraftField> {
        step.preconditions()
            .iter()
            .copied()
            .filter(|field| !self.has(*field))
            .collect()
    }

    /// Pricing inputs for the current selection. Without a theater the rental is zero.
    fn with_pricing_input<T>(&self, f: impl FnOnce(&PricingInput<'_>) -> T) -> T {
        let addons: Vec<AddonLineItem> = self.addons.values().cloned().collect();

        let (theater_cost, decoration_cost) = match &self.theater {
            Some(theater) if self.decoration => (theater.cost, theater.decoration_price),
            Some(theater) => (theater.cost, 0),
            None => (0, 0),
        };

        f(&PricingInput {
            theater_cost,
            decoration_cost,
            cakes: &self.cakes,
            addons: &addons,
        })
    }

    /// Quote the draft as it stands on `today`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if any amount overflows.
    pub fn quote_on(&self, today: Date) -> Result<Quote, PricingError> {
        self.with_pricing_input(|input| pricing::compute_total(input, self.coupon.as_ref(), today))
    }

    /// Cake subtotal recomputed from the lines.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if any amount overflows.
    pub fn recompute_cake_subtotal(&self) -> Result<u64, PricingError> {
        pricing::subtotal_minor(&PricingInput {
            theater_cost: 0,
            decoration_cost: 0,
            cakes: &self.cakes,
            addons: &[],
        })
    }

    /// Add-on subtotal recomputed from the lines.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the sum overflows.
    pub fn recompute_addon_subtotal(&self) -> Result<u64, PricingError> {
        self.addons
            .values()
            .try_fold(0_u64, |acc, addon| {
                addon.line_total().and_then(|line| acc.checked_add(line))
            })
            .ok_or(PricingError::Overflow)
    }

    /// Render-ready summary built from whatever is populated.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if any amount overflows.
    pub fn summary(&self, today: Date) -> Result<DraftSummary, PricingError> {
        let cakes = self
            .cakes
            .iter()
            .map(|cake| -> Result<SummaryLine, PricingError> {
                Ok(SummaryLine {
                    label: format!("{} ({})", cake.name, cake.weight),
                    quantity: cake.quantity,
                    amount: cake.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        let addons = self
            .addons
            .values()
            .map(|addon| -> Result<SummaryLine, PricingError> {
                Ok(SummaryLine {
                    label: addon.name.clone(),
                    quantity: addon.quantity,
                    amount: addon.line_total().ok_or(PricingError::Overflow)?,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        let (coupon, total) = if self.theater.is_some() {
            let quote = self.quote_on(today)?;

            (quote.coupon().cloned(), Some(quote.total_minor()?))
        } else {
            (None, None)
        };

        Ok(DraftSummary {
            location: self.location.as_ref().map(|location| location.name.clone()),
            theater: self.theater.as_ref().map(|theater| theater.name.clone()),
            slot: self
                .slot
                .as_ref()
                .map(|slot| format!("{} {}", slot.date, slot.name)),
            occasion: self.occasion.as_ref().map(|occasion| {
                match (&occasion.nickname, &occasion.partner_nickname) {
                    (Some(nickname), Some(partner)) => {
                        format!("{} for {nickname} & {partner}", occasion.name)
                    }
                    (Some(nickname), None) => format!("{} for {nickname}", occasion.name),
                    _ => occasion.name.clone(),
                }
            }),
            cake_subtotal: self.recompute_cake_subtotal()?,
            addon_subtotal: self.recompute_addon_subtotal()?,
            cakes,
            addons,
            coupon,
            total,
        })
    }

    /// Snapshot submitted with payment order creation and verification.
    ///
    /// # Errors
    ///
    /// Returns the first missing payment precondition.
    pub fn snapshot(&self) -> Result<DraftSnapshot, DraftField> {
        let final_price = self.final_price.ok_or(DraftField::FinalPrice)?;
        let customer_uuid = self.customer_uuid.ok_or(DraftField::Customer)?;
        let theater = self.theater.as_ref().ok_or(DraftField::Theater)?;
        let location = self.location.as_ref().ok_or(DraftField::Location)?;
        let slot = self.slot.as_ref().ok_or(DraftField::Slot)?;

        Ok(DraftSnapshot {
            customer_uuid,
            location_uuid: location.uuid,
            theater_uuid: theater.uuid,
            booked_date: slot.date,
            booked_slot: slot.name.clone(),
            nickname: self
                .occasion
                .as_ref()
                .and_then(|occasion| occasion.nickname.clone()),
            decoration: self.decoration,
            cakes: self.cakes.to_vec(),
            addons: self.addons.values().cloned().collect(),
            coupon_code: self.coupon.as_ref().map(|coupon| coupon.code.clone()),
            final_price,
        })
    }
}

/// Complete draft as handed to the server at payment time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    /// Customer owning the draft.
    pub customer_uuid: Uuid,
    /// Selected location.
    pub location_uuid: Uuid,
    /// Selected theater.
    pub theater_uuid: Uuid,
    /// Booked day.
    pub booked_date: Date,
    /// Booked window.
    pub booked_slot: String,
    /// Nickname shown on the booking.
    pub nickname: Option<String>,
    /// Decoration requested.
    pub decoration: bool,
    /// Cake lines.
    pub cakes: Vec<CakeLineItem>,
    /// Add-on lines.
    pub addons: Vec<AddonLineItem>,
    /// Applied coupon code.
    pub coupon_code: Option<String>,
    /// Amount the client computed, in minor units.
    pub final_price: u64,
}

impl DraftSnapshot {
    /// Lowercase hex SHA-256 of what the snapshot books and the amount it pays.
    ///
    /// Client-side names and unit prices are left out, as is the order of cake and add-on lines.
    /// Two snapshots with equal digests book the same slot with the same extras and coupon for
    /// the same amount.
    pub fn digest(&self) -> String {
        let mut cakes: Vec<_> = self
            .cakes
            .iter()
            .map(|line| (line.cake_uuid, line.weight.grams(), line.quantity, line.eggless))
            .collect();
        cakes.sort_unstable();

        let mut addons: Vec<_> = self
            .addons
            .iter()
            .map(|line| (line.addon_uuid, line.quantity))
            .collect();
        addons.sort_unstable();

        let mut hasher = Sha256::new();

        hash_field(&mut hasher, self.customer_uuid.as_bytes());
        hash_field(&mut hasher, self.location_uuid.as_bytes());
        hash_field(&mut hasher, self.theater_uuid.as_bytes());
        hash_field(&mut hasher, self.booked_date.to_string().as_bytes());
        hash_field(&mut hasher, self.booked_slot.as_bytes());
        hash_field(&mut hasher, &[u8::from(self.decoration)]);

        hash_field(&mut hasher, &u64::try_from(cakes.len()).unwrap_or(u64::MAX).to_be_bytes());
        for (uuid, grams, quantity, eggless) in cakes {
            hash_field(&mut hasher, uuid.as_bytes());
            hash_field(&mut hasher, &grams.to_be_bytes());
            hash_field(&mut hasher, &quantity.to_be_bytes());
            hash_field(&mut hasher, &[u8::from(eggless)]);
        }

        hash_field(&mut hasher, &u64::try_from(addons.len()).unwrap_or(u64::MAX).to_be_bytes());
        for (uuid, quantity) in addons {
            hash_field(&mut hasher, uuid.as_bytes());
            hash_field(&mut hasher, &quantity.to_be_bytes());
        }

        match &self.coupon_code {
            Some(code) => {
                hash_field(&mut hasher, &[1]);
                hash_field(&mut hasher, code.as_bytes());
            }
            None => hash_field(&mut hasher, &[0]),
        }

        hash_field(&mut hasher, &self.final_price.to_be_bytes());

        hex::encode(hasher.finalize())
    }
}

fn hash_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update(u64::try_from(bytes.len()).unwrap_or(u64::MAX).to_be_bytes());
    hasher.update(bytes);
}

/// One priced line of a [`DraftSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    /// Display label.
    pub label: String,
    /// Quantity.
    pub quantity: u32,
    /// Line total in minor units.
    pub amount: u64,
}

/// Placeholder shown for fields that are not selected yet.
pub const NOT_SELECTED: &str = "Not selected";

/// What a wizard step renders as the booking recap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSummary {
    /// Location name.
    pub location: Option<String>,
    /// Theater name.
    pub theater: Option<String>,
    /// Day and window.
    pub slot: Option<String>,
    /// Occasion with nicknames.
    pub occasion: Option<String>,
    /// Cake lines.
    pub cakes: Vec<SummaryLine>,
    /// Add-on lines.
    pub addons: Vec<SummaryLine>,
    /// Recomputed cake subtotal.
    pub cake_subtotal: u64,
    /// Recomputed add-on subtotal.
    pub addon_subtotal: u64,
    /// Coupon outcome, once a theater is selected.
    pub coupon: Option<CouponOutcome>,
    /// Payable amount, once a theater is selected.
    pub total: Option<u64>,
}

fn rupees(minor: u64) -> Result<Money<'static, Currency>, fmt::Error> {
    pricing::to_money(minor).map_err(|_overflow| fmt::Error)
}

fn write_lines(f: &mut fmt::Formatter<'_>, heading: &str, lines: &[SummaryLine]) -> fmt::Result {
    if lines.is_empty() {
        return writeln!(f, "{heading}: none");
    }

    writeln!(f, "{heading}:")?;

    for line in lines {
        writeln!(
            f,
            "  {} x {} = {}",
            line.label,
            line.quantity,
            rupees(line.amount)?
        )?;
    }

    Ok(())
}

impl fmt::Display for DraftSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_placeholder(value: Option<&str>) -> &str {
            value.unwrap_or(NOT_SELECTED)
        }

        writeln!(f, "Location: {}", or_placeholder(self.location.as_deref()))?;
        writeln!(f, "Theater: {}", or_placeholder(self.theater.as_deref()))?;
        writeln!(f, "Slot: {}", or_placeholder(self.slot.as_deref()))?;
        writeln!(f, "Occasion: {}", or_placeholder(self.occasion.as_deref()))?;

        write_lines(f, "Cakes", &self.cakes)?;
        writeln!(f, "Cake subtotal: {}", rupees(self.cake_subtotal)?)?;

        write_lines(f, "Add-ons", &self.addons)?;
        writeln!(f, "Add-on subtotal: {}", rupees(self.addon_subtotal)?)?;

        match &self.coupon {
            Some(CouponOutcome::Applied { code, discount }) => {
                writeln!(f, "Coupon: {code} (-{})", rupees(*discount)?)?;
            }
            Some(CouponOutcome::Rejected { code, validity }) => {
                writeln!(f, "Coupon: {code} ({validity}, not applied)")?;
            }
            None => {}
        }

        match self.total {
            Some(total) => write!(f, "Total: {}", rupees(total)?),
            None => write!(f, "Total: {NOT_SELECTED}"),
        }
    }
}

/// A draft bound to its storage.
///
/// Every mutation writes the changed field and the recomputed derived amounts back before
/// returning, so storage never holds a stale total after a successful call.
#[derive(Debug)]
pub struct DraftSession<S> {
    storage: S,
    draft: BookingDraft,
    today: Date,
}

impl<S: DraftStorage> DraftSession<S> {
    /// Rebuild the draft from `storage`, pricing coupons against the current day.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the recomputed amounts cannot be stored.
    pub fn load(storage: S) -> Result<Self, DraftError> {
        Self::load_on(storage, Zoned::now().date())
    }

    /// Rebuild the draft from `storage`, pricing coupons against `today`.
    ///
    /// Keys that are absent or cannot be decoded are treated as not selected. Derived amounts are
    /// recomputed and rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the recomputed amounts cannot be stored.
    pub fn load_on(storage: S, today: Date) -> Result<Self, DraftError> {
        let draft = BookingDraft {
            customer_uuid: read(&storage, keys::CUSTOMER),
            decoration: read(&storage, keys::DECORATION).unwrap_or_default(),
            location: read(&storage, keys::LOCATION),
            theater: read(&storage, keys::THEATER),
            slot: read(&storage, keys::SLOT),
            occasion: read(&storage, keys::OCCASION),
            cakes: read(&storage, keys::CAKES).unwrap_or_default(),
            addons: read(&storage, keys::ADDONS).unwrap_or_default(),
            coupon: read(&storage, keys::COUPON),
            cake_subtotal: read(&storage, keys::CAKE_SUBTOTAL),
            addon_subtotal: read(&storage, keys::ADDON_SUBTOTAL),
            final_price: read(&storage, keys::FINAL_PRICE),
        };

        let mut session = Self {
            storage,
            draft,
            today,
        };

        session.recompute()?;

        Ok(session)
    }

    /// Current draft.
    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Record the customer created at the contact step.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the draft cannot be stored.
    pub fn set_customer(&mut self, customer_uuid: Uuid, decoration: bool) -> Result<(), DraftError> {
        self.draft.customer_uuid = Some(customer_uuid);
        self.draft.decoration = decoration;

        store(&mut self.storage, keys::CUSTOMER, &customer_uuid)?;
        store(&mut self.storage, keys::DECORATION, &decoration)?;

        self.recompute()
    }

    /// Select a location. Choosing a different location drops the theater and slot.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the draft cannot be stored.
    pub fn set_location(&mut self, location: LocationChoice) -> Result<(), DraftError> {
        let changed = self
            .draft
            .location
            .as_ref()
            .is_some_and(|current| current.uuid != location.uuid);

        if changed {
            self.draft.theater = None;
            self.draft.slot = None;
            self.storage.remove(keys::THEATER);
            self.storage.remove(keys::SLOT);
        }

        store(&mut self.storage, keys::LOCATION, &location)?;
        self.draft.location = Some(location);

        self.recompute()
    }

    /// Select a theater and one of its slots.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the draft cannot be stored.
    pub fn set_theater_slot(
        &mut self,
        theater: TheaterChoice,
        slot: SlotChoice,
    ) -> Result<(), DraftError> {
        store(&mut self.storage, keys::THEATER, &theater)?;
        store(&mut self.storage, keys::SLOT, &slot)?;

        self.draft.theater = Some(theater);
        self.draft.slot = Some(slot);

        self.recompute()
    }

    /// Select the occasion.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the draft cannot be stored.
    pub fn set_occasion(&mut self, occasion: OccasionChoice) -> Result<(), DraftError> {
        store(&mut self.storage, keys::OCCASION, &occasion)?;
        self.draft.occasion = Some(occasion);

        Ok(())
    }

    /// Replace all cake lines. Lines with zero quantity are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the lines cannot be priced or stored.
    pub fn set_cakes(
        &mut self,
        cakes: impl IntoIterator<Item = CakeLineItem>,
    ) -> Result<(), DraftError> {
        self.draft.cakes = cakes.into_iter().filter(|cake| cake.quantity > 0).collect();

        store(&mut self.storage, keys::CAKES, &self.draft.cakes)?;
        self.recompute()
    }

    /// Add or replace the line for a cake at a weight. A zero quantity removes it.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the lines cannot be priced or stored.
    pub fn upsert_cake(&mut self, cake: CakeLineItem) -> Result<(), DraftError> {
        let existing = self
            .draft
            .cakes
            .iter()
            .position(|line| line.same_selection(&cake));

        match (existing, cake.quantity) {
            (Some(index), 0) => {
                self.draft.cakes.remove(index);
            }
            (Some(index), _) => {
                if let Some(line) = self.draft.cakes.get_mut(index) {
                    *line = cake;
                }
            }
            (None, 0) => {}
            (None, _) => self.draft.cakes.push(cake),
        }

        store(&mut self.storage, keys::CAKES, &self.draft.cakes)?;
        self.recompute()
    }

    /// Add or replace an add-on line. A zero quantity removes it.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the lines cannot be priced or stored.
    pub fn set_addon(&mut self, addon: AddonLineItem) -> Result<(), DraftError> {
        if addon.quantity == 0 {
            self.draft.addons.remove(&addon.addon_uuid);
        } else {
            self.draft.addons.insert(addon.addon_uuid, addon);
        }

        store(&mut self.storage, keys::ADDONS, &self.draft.addons)?;
        self.recompute()
    }

    /// Remove an add-on line.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the lines cannot be priced or stored.
    pub fn remove_addon(&mut self, addon_uuid: Uuid) -> Result<(), DraftError> {
        self.draft.addons.remove(&addon_uuid);

        store(&mut self.storage, keys::ADDONS, &self.draft.addons)?;
        self.recompute()
    }

    /// Apply a coupon if it is valid today.
    ///
    /// An out-of-window coupon is refused and leaves any previously applied coupon in place.
    ///
    /// # Errors
    ///
    /// - [`DraftError::Coupon`]: the coupon is not valid today.
    /// - [`DraftError::Pricing`] / [`DraftError::Encode`]: the draft could not be repriced or
    ///   stored.
    pub fn apply_coupon(&mut self, coupon: Coupon) -> Result<Quote, DraftError> {
        let validity = coupon.validity_on(self.today);

        if !coupon.is_valid_on(self.today) {
            return Err(CouponError::NotApplicable {
                code: coupon.code,
                validity,
            }
            .into());
        }

        store(&mut self.storage, keys::COUPON, &coupon)?;
        self.draft.coupon = Some(coupon);

        self.recompute()?;

        Ok(self.quote()?)
    }

    /// Remove the applied coupon.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the draft cannot be repriced or stored.
    pub fn clear_coupon(&mut self) -> Result<(), DraftError> {
        self.draft.coupon = None;
        self.storage.remove(keys::COUPON);

        self.recompute()
    }

    /// Quote recomputed from the lines, never from stored totals.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if any amount overflows.
    pub fn quote(&self) -> Result<Quote, PricingError> {
        self.draft.quote_on(self.today)
    }

    /// Drop the draft and every stored key.
    pub fn clear(&mut self) {
        for key in keys::ALL {
            self.storage.remove(key);
        }

        self.draft = BookingDraft::default();
    }

    /// Consume the session, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn recompute(&mut self) -> Result<(), DraftError> {
        let cake_subtotal = self.draft.recompute_cake_subtotal()?;
        let addon_subtotal = self.draft.recompute_addon_subtotal()?;

        self.draft.cake_subtotal = Some(cake_subtotal);
        self.draft.addon_subtotal = Some(addon_subtotal);

        store(&mut self.storage, keys::CAKE_SUBTOTAL, &cake_subtotal)?;
        store(&mut self.storage, keys::ADDON_SUBTOTAL, &addon_subtotal)?;

        if self.draft.theater.is_some() {
            let final_price = self.quote()?.total_minor()?;

            self.draft.final_price = Some(final_price);
            store(&mut self.storage, keys::FINAL_PRICE, &final_price)?;
        } else {
            self.draft.final_price = None;
            self.storage.remove(keys::FINAL_PRICE);
        }

        Ok(())
    }
}

fn store<T: Serialize + ?Sized>(
    storage: &mut impl DraftStorage,
    key: &'static str,
    value: &T,
) -> Result<(), DraftError> {
    let encoded =
        serde_json::to_string(value).map_err(|source| DraftError::Encode { key, source })?;

    storage.set(key, encoded);

    Ok(())
}

fn read<T: DeserializeOwned>(storage: &impl DraftStorage, key: &str) -> Option<T> {
    storage
        .get(key)
        .and_then(|raw| serde_json::from_str(&raw).ok())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::{
        cakes::Weight,
        coupons::{CouponKind, CouponValidity},
    };

    use super::*;

    const TODAY: Date = date(2026, 10, 15);

    fn session(storage: MemoryStorage) -> Result<DraftSession<MemoryStorage>, DraftError> {
        DraftSession::load_on(storage, TODAY)
    }

    fn black_forest(grams: u32, quantity: u32) -> TestResult<CakeLineItem> {
        Ok(CakeLineItem {
            cake_uuid: Uuid::from_u128(1),
            name: "Black Forest".to_string(),
            weight: Weight::from_grams(grams)?,
            unit_price: 500_00,
            quantity,
            eggless: false,
        })
    }

    fn fog_entry(quantity: u32) -> AddonLineItem {
        AddonLineItem {
            addon_uuid: Uuid::from_u128(2),
            name: "Fog entry".to_string(),
            unit_price: 300_00,
            quantity,
        }
    }

    fn theater() -> TheaterChoice {
        TheaterChoice {
            uuid: Uuid::from_u128(3),
            name: "Aurora".to_string(),
            cost: 1999_00,
            decoration_price: 500_00,
        }
    }

    fn slot() -> SlotChoice {
        SlotChoice {
            date: date(2026, 10, 20),
            name: "6:00 PM - 9:00 PM".to_string(),
        }
    }

    fn location(uuid: u128) -> LocationChoice {
        LocationChoice {
            uuid: Uuid::from_u128(uuid),
            name: "Indiranagar".to_string(),
        }
    }

    #[test]
    fn empty_storage_loads_empty_draft() -> TestResult {
        let session = session(MemoryStorage::new())?;

        assert_eq!(session.draft().customer_uuid, None);
        assert!(session.draft().cakes.is_empty());
        assert_eq!(session.draft().final_price, None);

        Ok(())
    }

    #[test]
    fn malformed_keys_are_treated_as_not_selected() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.set(keys::THEATER, "{not json".to_string());
        storage.set(keys::CAKES, "\"Black Forest 1kg x2\"".to_string());
        storage.set(keys::LOCATION, serde_json::to_string(&location(9))?);

        let session = session(storage)?;

        assert_eq!(session.draft().theater, None);
        assert!(session.draft().cakes.is_empty());
        assert_eq!(session.draft().location, Some(location(9)));

        Ok(())
    }

    #[test]
    fn cakes_without_addons_render_cake_subtotal_and_empty_addons() -> TestResult {
        let mut first = session(MemoryStorage::new())?;
        first.upsert_cake(black_forest(1000, 2)?)?;

        // A refresh on the add-ons step rebuilds from storage alone.
        let reloaded = session(first.into_storage())?;
        let summary = reloaded.draft().summary(TODAY)?;

        assert_eq!(summary.cake_subtotal, 2000_00);
        assert_eq!(summary.addon_subtotal, 0);
        assert!(summary.addons.is_empty());

        let rendered = summary.to_string();
        let cake_subtotal = pricing::to_money(2000_00)?.to_string();

        assert!(cake_subtotal.starts_with('₹'), "got {cake_subtotal}");
        assert!(rendered.contains("Add-ons: none"));
        assert!(rendered.contains(&format!("Cake subtotal: {cake_subtotal}")));
        assert!(rendered.contains(&format!("Black Forest (1kg) x 2 = {cake_subtotal}")));
        assert!(rendered.contains("Theater: Not selected"));
        assert!(rendered.contains("Total: Not selected"));

        Ok(())
    }

    #[test]
    fn mutations_store_derived_totals_immediately() -> TestResult {
        let mut session = session(MemoryStorage::new())?;
        session.set_customer(Uuid::from_u128(7), true)?;
        session.set_location(location(1))?;
        session.set_theater_slot(theater(), slot())?;
        session.set_addon(fog_entry(2))?;

        // 1999 + 500 decoration + 600 add-ons
        assert_eq!(
            session.storage().get(keys::FINAL_PRICE).as_deref(),
            Some("309900")
        );
        assert_eq!(
            session.storage().get(keys::ADDON_SUBTOTAL).as_deref(),
            Some("60000")
        );

        session.remove_addon(Uuid::from_u128(2))?;

        assert_eq!(
            session.storage().get(keys::FINAL_PRICE).as_deref(),
            Some("249900")
        );

        Ok(())
    }

    #[test]
    fn stale_stored_total_is_recomputed_on_load() -> TestResult {
        let mut first = session(MemoryStorage::new())?;
        first.set_location(location(1))?;
        first.set_theater_slot(theater(), slot())?;
        first.upsert_cake(black_forest(500, 1)?)?;

        let mut storage = first.into_storage();
        storage.set(keys::FINAL_PRICE, "1".to_string());

        let reloaded = session(storage)?;

        assert_eq!(reloaded.draft().final_price, Some(2499_00));
        assert_eq!(
            reloaded.storage().get(keys::FINAL_PRICE).as_deref(),
            Some("249900")
        );

        Ok(())
    }

    #[test]
    fn upsert_cake_replaces_same_cake_and_weight() -> TestResult {
        let mut session = session(MemoryStorage::new())?;
        session.upsert_cake(black_forest(500, 1)?)?;
        session.upsert_cake(black_forest(500, 3)?)?;
        session.upsert_cake(black_forest(1000, 1)?)?;

        assert_eq!(session.draft().cakes.len(), 2);
        assert_eq!(session.draft().cake_subtotal, Some(2500_00));

        session.upsert_cake(black_forest(500, 0)?)?;

        assert_eq!(session.draft().cakes.len(), 1);
        assert_eq!(session.draft().cake_subtotal, Some(1000_00));

        Ok(())
    }

    #[test]
    fn changing_location_drops_theater_and_slot() -> TestResult {
        let mut session = session(MemoryStorage::new())?;
        session.set_location(location(1))?;
        session.set_theater_slot(theater(), slot())?;

        session.set_location(location(1))?;
        assert!(session.draft().theater.is_some());

        session.set_location(location(2))?;

        assert_eq!(session.draft().theater, None);
        assert_eq!(session.draft().slot, None);
        assert_eq!(session.draft().final_price, None);
        assert_eq!(session.storage().get(keys::THEATER), None);

        Ok(())
    }

    #[test]
    fn expired_coupon_is_refused_and_not_stored() -> TestResult {
        let mut session = session(MemoryStorage::new())?;
        let coupon = Coupon::new(
            "OLD",
            CouponKind::FlatAmount { amount: 100_00 },
            date(2026, 1, 1),
            TODAY.yesterday()?,
        )?;

        let result = session.apply_coupon(coupon);

        assert!(matches!(
            result,
            Err(DraftError::Coupon(CouponError::NotApplicable {
                validity: CouponValidity::Expired,
                ..
            }))
        ));
        assert_eq!(session.storage().get(keys::COUPON), None);

        Ok(())
    }

    #[test]
    fn valid_coupon_reprices_and_clears() -> TestResult {
        let mut session = session(MemoryStorage::new())?;
        session.set_location(location(1))?;
        session.set_theater_slot(theater(), slot())?;

        let coupon = Coupon::new(
            "TEN",
            CouponKind::Percentage { basis_points: 1000 },
            TODAY,
            TODAY,
        )?;

        let quote = session.apply_coupon(coupon)?;

        assert_eq!(quote.total_minor()?, 1799_10);
        assert_eq!(session.draft().final_price, Some(1799_10));

        session.clear_coupon()?;

        assert_eq!(session.draft().final_price, Some(1999_00));

        Ok(())
    }

    #[test]
    fn snapshot_reports_first_missing_payment_field() -> TestResult {
        let mut session = session(MemoryStorage::new())?;
        session.set_location(location(1))?;

        assert_eq!(session.draft().snapshot(), Err(DraftField::FinalPrice));

        session.set_theater_slot(theater(), slot())?;

        assert_eq!(session.draft().snapshot(), Err(DraftField::Customer));

        session.set_customer(Uuid::from_u128(7), false)?;
        session.set_occasion(OccasionChoice {
            name: "Birthday".to_string(),
            nickname: Some("Asha".to_string()),
            partner_nickname: None,
        })?;

        let snapshot = session.draft().snapshot()?;

        assert_eq!(snapshot.final_price, 1999_00);
        assert_eq!(snapshot.booked_slot, "6:00 PM - 9:00 PM");
        assert_eq!(snapshot.nickname.as_deref(), Some("Asha"));

        Ok(())
    }

    fn paid_snapshot() -> TestResult<DraftSnapshot> {
        Ok(DraftSnapshot {
            customer_uuid: Uuid::from_u128(7),
            location_uuid: Uuid::from_u128(1),
            theater_uuid: Uuid::from_u128(3),
            booked_date: date(2026, 10, 20),
            booked_slot: "6:00 PM - 9:00 PM".to_string(),
            nickname: None,
            decoration: true,
            cakes: vec![black_forest(1000, 1)?],
            addons: vec![
                fog_entry(2),
                AddonLineItem {
                    addon_uuid: Uuid::from_u128(4),
                    name: "Bubbles".to_string(),
                    unit_price: 150_00,
                    quantity: 1,
                },
            ],
            coupon_code: Some("DIWALI10".to_string()),
            final_price: 3_579_00,
        })
    }

    #[test]
    fn digest_ignores_client_labels_prices_and_line_order() -> TestResult {
        let paid = paid_snapshot()?;

        let mut relabelled = paid.clone();
        relabelled.addons.reverse();
        relabelled.nickname = Some("Asha".to_string());
        for cake in &mut relabelled.cakes {
            cake.name = "Anything".to_string();
            cake.unit_price = 1;
        }

        assert_eq!(paid.digest(), relabelled.digest());
        assert_eq!(paid.digest().len(), 64);

        Ok(())
    }

    #[test]
    fn digest_changes_with_what_is_booked_or_paid() -> TestResult {
        let paid = paid_snapshot()?;

        let mut cheaper = paid.clone();
        cheaper.final_price = 1_999_00;

        let mut other_theater = paid.clone();
        other_theater.theater_uuid = Uuid::from_u128(99);

        let mut more_addons = paid.clone();
        for addon in &mut more_addons.addons {
            addon.quantity += 1;
        }

        let mut no_coupon = paid.clone();
        no_coupon.coupon_code = None;

        for changed in [cheaper, other_theater, more_addons, no_coupon] {
            assert_ne!(paid.digest(), changed.digest(), "{changed:?}");
        }

        Ok(())
    }

    #[test]
    fn clear_removes_every_key() -> TestResult {
        let mut session = session(MemoryStorage::new())?;
        session.set_customer(Uuid::from_u128(7), false)?;
        session.set_location(location(1))?;
        session.set_theater_slot(theater(), slot())?;

        session.clear();

        assert!(session.storage().is_empty());
        assert_eq!(session.draft(), &BookingDraft::default());

        Ok(())
    }
}
