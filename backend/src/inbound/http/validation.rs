//! Shared validation helpers for inbound HTTP adapters.

use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, HistoryDate, OrderIndex, RouteId, StoreKey};

/// Validation error codes carried in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidRouteId,
    InvalidOrderIndex,
    InvalidDate,
    InvalidKey,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidRouteId => "invalid_route_id",
            ErrorCode::InvalidOrderIndex => "invalid_order_index",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidKey => "invalid_key",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const ROUTE_ID: FieldName = FieldName::new("routeId");
pub(crate) const ORDER_INDEX: FieldName = FieldName::new("orderIndex");
pub(crate) const DATE: FieldName = FieldName::new("date");
pub(crate) const IMAGE: FieldName = FieldName::new("image");
pub(crate) const KEY: FieldName = FieldName::new("key");

fn invalid(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

/// Unwrap an optional field, treating blank strings as missing.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_route_id(value: &str, field: FieldName) -> Result<RouteId, Error> {
    RouteId::new(value.trim()).map_err(|err| {
        invalid(
            field,
            format!("{}: {err}", field.as_str()),
            ErrorCode::InvalidRouteId,
            value,
        )
    })
}

pub(crate) fn parse_order_index(value: &str, field: FieldName) -> Result<OrderIndex, Error> {
    value.parse::<OrderIndex>().map_err(|err| {
        invalid(
            field,
            format!("{}: {err}", field.as_str()),
            ErrorCode::InvalidOrderIndex,
            value,
        )
    })
}

pub(crate) fn parse_history_date(value: &str, field: FieldName) -> Result<HistoryDate, Error> {
    value.trim().parse::<HistoryDate>().map_err(|err| {
        invalid(
            field,
            format!("{}: {err}", field.as_str()),
            ErrorCode::InvalidDate,
            value,
        )
    })
}

/// Decode a percent-encoded key from a path segment.
pub(crate) fn parse_store_key(raw: &str, field: FieldName) -> Result<StoreKey, Error> {
    let decoded = urlencoding::decode(raw).map_err(|_| {
        invalid(
            field,
            format!("{} must be valid UTF-8 once decoded", field.as_str()),
            ErrorCode::InvalidKey,
            raw,
        )
    })?;
    StoreKey::new(decoded.into_owned()).map_err(|err| {
        invalid(
            field,
            format!("{}: {err}", field.as_str()),
            ErrorCode::InvalidKey,
            raw,
        )
    })
}

/// Order index as sent in JSON bodies: clients send either a number or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OrderIndexInput {
    Number(u64),
    Text(String),
}

impl OrderIndexInput {
    pub(crate) fn resolve(self, field: FieldName) -> Result<OrderIndex, Error> {
        match self {
            Self::Number(raw) => usize::try_from(raw)
                .map(OrderIndex::new)
                .map_err(|_| {
                    invalid(
                        field,
                        format!("{} is out of range", field.as_str()),
                        ErrorCode::InvalidOrderIndex,
                        &raw.to_string(),
                    )
                }),
            Self::Text(text) => parse_order_index(&text, field),
        }
    }
}
