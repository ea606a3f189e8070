//! Coupon Errors

use cinemates::errors::FlowError;
use salvo::http::StatusError;
use tracing::error;

use cinemates_app::domain::coupons::CouponsServiceError;

use crate::extensions::*;

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::NotFound => StatusError::not_found().brief("Coupon not found"),
        CouponsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Coupon already exists")
        }
        CouponsServiceError::InvalidCoupon(source) => {
            FlowError::from(source).into_status_error(StatusError::bad_request())
        }
        CouponsServiceError::InvalidReference
        | CouponsServiceError::MissingRequiredData
        | CouponsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid coupon request")
        }
        CouponsServiceError::Sql(source) => {
            error!("failed to load coupons: {source}");

            FlowError::UpstreamUnavailable.into_status_error(StatusError::service_unavailable())
        }
    }
}
