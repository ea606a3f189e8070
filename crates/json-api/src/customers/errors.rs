//! Customer Errors

use cinemates::errors::FlowError;
use salvo::http::StatusError;
use tracing::error;

use cinemates_app::domain::customers::CustomersServiceError;

use crate::extensions::*;

pub(crate) fn into_status_error(error: CustomersServiceError) -> StatusError {
    match error {
        CustomersServiceError::InvalidContact(contact) => FlowError::Validation {
            field: contact.field(),
            message: contact.to_string(),
        }
        .into_status_error(StatusError::bad_request()),
        CustomersServiceError::NotFound => {
            StatusError::not_found().brief("Customer or catalog entry not found")
        }
        CustomersServiceError::AlreadyExists => {
            StatusError::conflict().brief("Customer already exists")
        }
        CustomersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown customer or theater")
        }
        CustomersServiceError::MissingRequiredData | CustomersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid customer payload")
        }
        CustomersServiceError::Sql(source) => {
            error!("failed to save customer data: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use cinemates_app::domain::customers::models::ContactError;

    use super::*;

    #[test]
    fn contact_errors_name_their_field() {
        let status = into_status_error(CustomersServiceError::InvalidContact(
            ContactError::OverCapacity { max_persons: 6 },
        ));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.brief, "the theater holds at most 6 people");
        assert_eq!(status.detail.as_deref(), Some("field=number_of_persons"));
    }
}
