//! Save Cake Line Handler

use std::sync::Arc;

use cinemates::cakes::{Weight, scaled_unit_price};
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::customers::models::{CakeSelection, NewCakeSelection};

use crate::{customers::errors::into_status_error, extensions::*, state::State};

/// A weight given in grams (`1000`) or as a label (`"1kg"`, `"1.5 kg"`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum WeightInput {
    Grams(u32),
    Label(String),
}

impl WeightInput {
    pub(crate) fn parse(&self) -> Result<Weight, StatusError> {
        let weight = match self {
            Self::Grams(grams) => Weight::from_grams(*grams),
            Self::Label(label) => label.parse(),
        };

        weight.or_400("invalid weight")
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaveCakeRequest {
    pub customer_uuid: Uuid,
    pub cake_uuid: Uuid,

    /// Defaults to the 500g reference weight
    #[serde(default)]
    pub weight: Option<WeightInput>,

    /// Zero removes the line
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CakeLineResponse {
    pub cake_uuid: Uuid,
    pub weight_grams: u32,
    pub weight_label: String,
    pub quantity: u32,

    /// Price at the chosen weight, in paise
    pub unit_price: u64,

    pub line_total: u64,
}

impl TryFrom<CakeSelection> for CakeLineResponse {
    type Error = StatusError;

    fn try_from(cake: CakeSelection) -> Result<Self, Self::Error> {
        let unit_price =
            scaled_unit_price(cake.unit_price, cake.weight).or_500("failed to scale cake price")?;

        let line_total = unit_price
            .checked_mul(u64::from(cake.quantity))
            .ok_or("cake line total overflows")
            .or_500("failed to total cake line")?;

        Ok(Self {
            cake_uuid: cake.cake_uuid.into(),
            weight_grams: cake.weight.grams(),
            weight_label: cake.weight.to_string(),
            quantity: cake.quantity,
            unit_price,
            line_total,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaveCakeResponse {
    /// The saved line, or null when it was removed
    pub cake: Option<CakeLineResponse>,
}

/// Save Cake Line Handler
///
/// Adds the cake at the chosen weight, replaces its quantity, or removes it at quantity zero.
#[endpoint(tags("bookings"), summary = "Save Cake Line Item")]
pub(crate) async fn handler(
    json: JsonBody<SaveCakeRequest>,
    depot: &mut Depot,
) -> Result<Json<SaveCakeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let weight = match &request.weight {
        Some(weight) => weight.parse()?,
        None => Weight::REFERENCE,
    };

    let saved = state
        .customers
        .save_cake(
            request.customer_uuid.into(),
            NewCakeSelection {
                cake_uuid: request.cake_uuid.into(),
                weight,
                quantity: request.quantity,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(SaveCakeResponse {
        cake: saved.map(TryInto::try_into).transpose()?,
    }))
}
