//! Save Add-on Line Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::customers::models::{AddonSelection, NewAddonSelection};

use crate::{customers::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaveAddonRequest {
    pub customer_uuid: Uuid,
    pub addon_uuid: Uuid,

    /// Zero removes the line
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddonLineResponse {
    pub addon_uuid: Uuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub line_total: u64,
}

impl TryFrom<AddonSelection> for AddonLineResponse {
    type Error = StatusError;

    fn try_from(addon: AddonSelection) -> Result<Self, Self::Error> {
        let line_total = addon
            .unit_price
            .checked_mul(u64::from(addon.quantity))
            .ok_or("add-on line total overflows")
            .or_500("failed to total add-on line")?;

        Ok(Self {
            addon_uuid: addon.addon_uuid.into(),
            quantity: addon.quantity,
            unit_price: addon.unit_price,
            line_total,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaveAddonResponse {
    /// The saved line, or null when it was removed
    pub addon: Option<AddonLineResponse>,
}

/// Save Add-on Line Handler
#[endpoint(tags("bookings"), summary = "Save Add-on Line Item")]
pub(crate) async fn handler(
    json: JsonBody<SaveAddonRequest>,
    depot: &mut Depot,
) -> Result<Json<SaveAddonResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let saved = state
        .customers
        .save_addon(
            request.customer_uuid.into(),
            NewAddonSelection {
                addon_uuid: request.addon_uuid.into(),
                quantity: request.quantity,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(SaveAddonResponse {
        addon: saved.map(TryInto::try_into).transpose()?,
    }))
}
