//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use tracing::error;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>().map_err(|_missing| {
            error!(
                "{} was not injected into the depot",
                std::any::type_name::<T>()
            );

            StatusError::internal_server_error()
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn missing_state_is_an_internal_error() {
        let depot = Depot::new();

        let result = depot.obtain_or_500::<String>();

        assert_eq!(
            result.err().map(|s| s.code),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[test]
    fn injected_state_is_returned() {
        let mut depot = Depot::new();
        depot.inject("cinemates".to_string());

        assert_eq!(
            depot.obtain_or_500::<String>().ok().map(String::as_str),
            Some("cinemates")
        );
    }
}
