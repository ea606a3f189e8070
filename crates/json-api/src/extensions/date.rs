//! Calendar date query parsing helpers.

use cinemates::{errors::FlowError, slots::parse_date};
use jiff::civil::Date;
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

pub(crate) trait DateParamExt {
    fn into_date(self) -> Result<Date, StatusError>;
}

impl DateParamExt for QueryParam<String, true> {
    fn into_date(self) -> Result<Date, StatusError> {
        parse_date(&self.into_inner())
            .map_err(|error| FlowError::from(error).into_status_error(StatusError::bad_request()))
    }
}
