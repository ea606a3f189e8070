//! Coupon Types Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponTypesResponse {
    /// Categories that currently have active coupons
    pub types: Vec<String>,
}

/// Coupon Types Handler
#[endpoint(tags("coupons"), summary = "List Coupon Types")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CouponTypesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let types = state
        .coupons
        .list_coupon_types()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CouponTypesResponse { types }))
}
