//! Add-on Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::catalog::models::Addon;

use crate::{catalog::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddonResponse {
    pub uuid: Uuid,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,

    /// Unit price in paise
    pub price: u64,
}

impl From<Addon> for AddonResponse {
    fn from(addon: Addon) -> Self {
        Self {
            uuid: addon.uuid.into(),
            name: addon.name,
            category: addon.category,
            image_url: addon.image_url,
            price: addon.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddonsResponse {
    pub addons: Vec<AddonResponse>,
}

/// Add-on Index Handler
#[endpoint(tags("catalog"), summary = "List Add-ons")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AddonsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let addons = state
        .catalog
        .list_addons()
        .await
        .map_err(into_status_error)?;

    Ok(Json(AddonsResponse {
        addons: addons.into_iter().map(Into::into).collect(),
    }))
}
