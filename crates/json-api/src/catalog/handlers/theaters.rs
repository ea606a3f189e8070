//! Theater Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinemates_app::domain::catalog::models::Theater;

use crate::{catalog::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TheaterResponse {
    pub uuid: Uuid,
    pub location_uuid: Uuid,
    pub name: String,

    /// Rental for one slot, in paise
    pub cost: u64,

    /// Decoration charge, in paise
    pub decoration_price: u64,

    pub base_persons: u32,
    pub max_persons: u32,

    /// Named windows the theater can be booked for
    pub slots: Vec<String>,
}

impl From<Theater> for TheaterResponse {
    fn from(theater: Theater) -> Self {
        Self {
            uuid: theater.uuid.into(),
            location_uuid: theater.location_uuid.into(),
            name: theater.name,
            cost: theater.cost,
            decoration_price: theater.decoration_price,
            base_persons: theater.base_persons,
            max_persons: theater.max_persons,
            slots: theater.slots,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TheatersResponse {
    pub theaters: Vec<TheaterResponse>,
}

/// Theater Index Handler
///
/// Returns the theaters at a location.
#[endpoint(tags("catalog"), summary = "List Theaters")]
pub(crate) async fn handler(
    location_uuid: QueryParam<Uuid, true>,
    depot: &mut Depot,
) -> Result<Json<TheatersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let theaters = state
        .catalog
        .list_theaters(location_uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(TheatersResponse {
        theaters: theaters.into_iter().map(Into::into).collect(),
    }))
}
