//! Cake Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::catalog::models::Cake;

use crate::{catalog::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WeightTierResponse {
    pub grams: u32,

    /// Display label, e.g. "500g" or "1kg"
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CakeResponse {
    pub uuid: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub eggless: bool,

    /// Price of the 500g reference weight, in paise
    pub reference_price: u64,

    pub weight_tiers: Vec<WeightTierResponse>,
}

impl From<Cake> for CakeResponse {
    fn from(cake: Cake) -> Self {
        Self {
            uuid: cake.uuid.into(),
            name: cake.name,
            image_url: cake.image_url,
            eggless: cake.eggless,
            reference_price: cake.reference_price,
            weight_tiers: cake
                .weight_tiers
                .into_iter()
                .map(|weight| WeightTierResponse {
                    grams: weight.grams(),
                    label: weight.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CakesResponse {
    pub cakes: Vec<CakeResponse>,
}

/// Cake Index Handler
///
/// Returns the cake catalog, optionally only eggless or only regular cakes.
#[endpoint(tags("catalog"), summary = "List Cakes")]
pub(crate) async fn handler(
    eggless: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<CakesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cakes = state
        .catalog
        .list_cakes(eggless.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CakesResponse {
        cakes: cakes.into_iter().map(Into::into).collect(),
    }))
}
