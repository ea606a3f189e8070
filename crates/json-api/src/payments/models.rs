//! Payment request models.

use cinemates::{
    cakes::{CakeLineItem, Weight},
    draft::{AddonLineItem, DraftSnapshot},
    errors::FlowError,
    slots::parse_date,
};
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{customers::cake::WeightInput, extensions::*};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CakeLineRequest {
    pub cake_uuid: Uuid,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub weight: Option<WeightInput>,

    /// Client-side reference price; the server reprices from the catalog
    #[serde(default)]
    pub unit_price: u64,

    pub quantity: u32,

    #[serde(default)]
    pub eggless: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddonLineRequest {
    pub addon_uuid: Uuid,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub unit_price: u64,

    pub quantity: u32,
}

/// The draft as the client holds it at the payment step.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct DraftRequest {
    pub customer_uuid: Uuid,
    pub location_uuid: Uuid,
    pub theater_uuid: Uuid,

    /// YYYY-MM-DD
    pub booked_date: String,
    pub booked_slot: String,

    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(default)]
    pub decoration: bool,

    #[serde(default)]
    pub cakes: Vec<CakeLineRequest>,

    #[serde(default)]
    pub addons: Vec<AddonLineRequest>,

    #[serde(default)]
    pub coupon_code: Option<String>,

    /// Total the client computed, in paise
    pub final_price: u64,
}

impl DraftRequest {
    pub(crate) fn into_snapshot(self) -> Result<DraftSnapshot, StatusError> {
        let booked_date = parse_date(&self.booked_date)
            .map_err(|error| FlowError::from(error).into_status_error(StatusError::bad_request()))?;

        let booked_slot = self.booked_slot.trim().to_string();

        if booked_slot.is_empty() {
            return Err(FlowError::Validation {
                field: "slot",
                message: "Please choose a slot.".to_string(),
            }
            .into_status_error(StatusError::bad_request()));
        }

        let cakes = self
            .cakes
            .into_iter()
            .map(|cake| {
                let weight = match &cake.weight {
                    Some(weight) => weight.parse()?,
                    None => Weight::default(),
                };

                Ok(CakeLineItem {
                    cake_uuid: cake.cake_uuid,
                    name: cake.name,
                    weight,
                    unit_price: cake.unit_price,
                    quantity: cake.quantity,
                    eggless: cake.eggless,
                })
            })
            .collect::<Result<Vec<_>, StatusError>>()?;

        let addons = self
            .addons
            .into_iter()
            .map(|addon| AddonLineItem {
                addon_uuid: addon.addon_uuid,
                name: addon.name,
                unit_price: addon.unit_price,
                quantity: addon.quantity,
            })
            .collect();

        Ok(DraftSnapshot {
            customer_uuid: self.customer_uuid,
            location_uuid: self.location_uuid,
            theater_uuid: self.theater_uuid,
            booked_date,
            booked_slot,
            nickname: self
                .nickname
                .map(|nickname| nickname.trim().to_string())
                .filter(|nickname| !nickname.is_empty()),
            decoration: self.decoration,
            cakes,
            addons,
            coupon_code: self
                .coupon_code
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty()),
            final_price: self.final_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn draft() -> DraftRequest {
        DraftRequest {
            customer_uuid: Uuid::now_v7(),
            location_uuid: Uuid::now_v7(),
            theater_uuid: Uuid::now_v7(),
            booked_date: "2026-12-24".to_string(),
            booked_slot: " Evening ".to_string(),
            nickname: Some("  ".to_string()),
            decoration: true,
            cakes: vec![CakeLineRequest {
                cake_uuid: Uuid::now_v7(),
                name: "Truffle".to_string(),
                weight: Some(WeightInput::Label("1kg".to_string())),
                unit_price: 600_00,
                quantity: 1,
                eggless: false,
            }],
            addons: Vec::new(),
            coupon_code: Some(" DIWALI10 ".to_string()),
            final_price: 3_000_00,
        }
    }

    #[test]
    fn snapshot_normalises_draft_fields() -> TestResult {
        let snapshot = draft().into_snapshot()?;

        assert_eq!(snapshot.booked_date, date(2026, 12, 24));
        assert_eq!(snapshot.booked_slot, "Evening");
        assert_eq!(snapshot.nickname, None);
        assert_eq!(snapshot.coupon_code.as_deref(), Some("DIWALI10"));
        assert_eq!(
            snapshot.cakes.first().map(|cake| cake.weight.grams()),
            Some(1000)
        );

        Ok(())
    }

    #[test]
    fn missing_cake_weight_defaults_to_reference() -> TestResult {
        let mut request = draft();

        if let Some(cake) = request.cakes.first_mut() {
            cake.weight = None;
        }

        let snapshot = request.into_snapshot()?;

        assert_eq!(
            snapshot.cakes.first().map(|cake| cake.weight),
            Some(Weight::default())
        );

        Ok(())
    }

    #[test]
    fn malformed_date_is_rejected_on_the_date_field() {
        let mut request = draft();
        request.booked_date = "24-12-2026".to_string();

        let result = request.into_snapshot();

        assert!(
            matches!(&result, Err(status) if status.detail.as_deref() == Some("field=date")),
            "expected date validation error, got {result:?}"
        );
    }

    #[test]
    fn blank_slot_is_rejected() {
        let mut request = draft();
        request.booked_slot = "   ".to_string();

        let result = request.into_snapshot();

        assert!(
            matches!(&result, Err(status) if status.detail.as_deref() == Some("field=slot")),
            "expected slot validation error, got {result:?}"
        );
    }
}
