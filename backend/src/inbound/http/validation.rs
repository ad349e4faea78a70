//! Shared request validation helpers for inbound HTTP adapters.

use actix_web::{HttpRequest, web};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::Error;
use crate::domain::catalogue::{CatalogueValidationError, Quantity};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidBody,
    InvalidPath,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidBody => "invalid_body",
            ErrorCode::InvalidPath => "invalid_path",
        }
    }
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

/// Unwrap a required body field.
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Quantity from an optional JSON number.
pub(crate) fn quantity(
    field: &'static str,
    value: Option<i64>,
) -> Result<Option<Quantity>, CatalogueValidationError> {
    value.map(|raw| Quantity::from_i64(field, raw)).transpose()
}

/// Quantity patch from a field that may be omitted, `null` or a number.
pub(crate) fn quantity_patch(
    field: &'static str,
    value: Option<Option<i64>>,
) -> Result<Option<Option<Quantity>>, CatalogueValidationError> {
    value.map(|inner| quantity(field, inner)).transpose()
}

/// Deserialise a present field (including `null`) as `Some`, leaving absent
/// fields to `#[serde(default)]`.
///
/// Pair with `#[serde(default)]` so `{}` yields `None`, `{"x": null}` yields
/// `Some(None)` and `{"x": 1}` yields `Some(Some(1))`.
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// JSON extractor configuration returning the domain error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        Error::invalid_request(format!("invalid JSON body: {err}"))
            .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
            .into()
    })
}

/// Path extractor configuration returning the domain error envelope.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        Error::invalid_request(format!("invalid path parameter: {err}"))
            .with_details(json!({ "code": ErrorCode::InvalidPath.as_str() }))
            .into()
    })
}
