//! Catalog Errors

use cinemates::errors::FlowError;
use salvo::http::StatusError;
use tracing::error;

use cinemates_app::domain::catalog::CatalogServiceError;

use crate::extensions::*;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::NotFound => StatusError::not_found().brief("Catalog entry not found"),
        CatalogServiceError::AlreadyExists
        | CatalogServiceError::InvalidReference
        | CatalogServiceError::MissingRequiredData
        | CatalogServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid catalog request")
        }
        CatalogServiceError::Sql(source) => {
            error!("failed to load catalog: {source}");

            FlowError::UpstreamUnavailable.into_status_error(StatusError::service_unavailable())
        }
    }
}
