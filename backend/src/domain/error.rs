//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! status codes and JSON envelopes; services build them from adapter errors
//! at the boundary of each operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Maximum number of characters of upstream output echoed back to clients.
pub const DIAGNOSTIC_EXCERPT_LIMIT: usize = 500;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing or malformed request fields.
    InvalidRequest,
    /// The shared history secret did not match.
    Unauthorized,
    /// The route, image or photo key does not exist.
    NotFound,
    /// An order already holds the maximum number of delivery photos.
    PhotoLimitReached,
    /// The extraction service replied with something other than the
    /// expected order schema.
    UpstreamFormat,
    /// A required server-side setting is absent.
    Misconfigured,
    /// An unexpected store or parsing failure.
    InternalError,
}

/// Domain error payload.
///
/// # Examples
/// ```
/// use routeslip::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("route abc123 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "route abc123 not found");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

impl Error {
    /// Create a new error, capturing the current trace identifier when one is
    /// in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier, if captured.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary structured details.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier explicitly.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details.
    ///
    /// # Examples
    /// ```
    /// use routeslip::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("orderIndex must be a number")
    ///     .with_details(json!({ "field": "orderIndex" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::PhotoLimitReached`].
    pub fn photo_limit_reached(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PhotoLimitReached, message)
    }

    /// Convenience constructor for [`ErrorCode::UpstreamFormat`].
    pub fn upstream_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamFormat, message)
    }

    /// Convenience constructor for [`ErrorCode::Misconfigured`].
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Misconfigured, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

/// Cut `text` down to [`DIAGNOSTIC_EXCERPT_LIMIT`] characters.
///
/// Counts characters rather than bytes so multi-byte text is never split.
///
/// # Examples
/// ```
/// use routeslip::domain::truncate_excerpt;
///
/// let long = "x".repeat(900);
/// assert_eq!(truncate_excerpt(&long).chars().count(), 500);
/// assert_eq!(truncate_excerpt("short"), "short");
/// ```
#[must_use]
pub fn truncate_excerpt(text: &str) -> String {
    text.chars().take(DIAGNOSTIC_EXCERPT_LIMIT).collect()
}

#[cfg(test)]
mod tests;
