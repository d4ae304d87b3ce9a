//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Missing or malformed request fields.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The history password did not match.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The route, order, image or photo does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The order already holds 16 delivery photos.
    #[schema(rename = "photo_limit_reached")]
    PhotoLimitReached,
    /// The extraction service reply did not match the order schema.
    #[schema(rename = "upstream_format")]
    UpstreamFormat,
    /// A required server setting is absent.
    #[schema(rename = "misconfigured")]
    Misconfigured,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for the JSON error envelope.
#[derive(ToSchema)]
#[schema(as = crate::inbound::http::error::ErrorEnvelope, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false`.
    success: bool,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "No image uploaded")]
    error: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field or an upstream
    /// excerpt.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::OrderStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::OrderStatus)]
pub enum OrderStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "done")]
    Done,
}

/// OpenAPI schema for [`crate::domain::Order`].
///
/// Orders may carry further fields produced by the extraction service; they
/// are preserved verbatim.
#[derive(ToSchema)]
#[schema(as = crate::domain::Order, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct OrderSchema {
    #[schema(example = "Chen Ya-ting")]
    customer: String,
    #[schema(example = "0912-345-678")]
    phone: String,
    #[schema(example = "No. 12, Zhongshan Rd, Taichung")]
    address: String,
    #[schema(example = "Refrigerator x1")]
    items: String,
    order_number: String,
    invoice_number: String,
    note: String,
    /// `draft_{uuid}` before route creation, `img_{routeId}_{index}` after.
    image_key: Option<String>,
    delivery_photo_count: u32,
    status: OrderStatusSchema,
}

/// OpenAPI schema for [`crate::domain::RouteDocument`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RouteDocument, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RouteDocumentSchema {
    #[schema(example = "ab12cd34")]
    route_id: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    orders: Vec<OrderSchema>,
}

/// OpenAPI schema for [`crate::domain::HistoryEntry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::HistoryEntry, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct HistoryEntrySchema {
    #[schema(example = "ab12cd34")]
    route_id: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    order_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "not_found",
            "photo_limit_reached",
            "upstream_format",
            "misconfigured",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_camel_case_fields() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("\"error\""));
    }

    #[test]
    fn order_schema_uses_wire_names() {
        assert_eq!(OrderSchema::name(), "crate.domain.Order");
        let schema_json = schema_to_json::<OrderSchema>();
        for field in ["orderNumber", "imageKey", "deliveryPhotoCount", "status"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn history_entry_schema_has_expected_name() {
        assert_eq!(HistoryEntrySchema::name(), "crate.domain.HistoryEntry");
        assert!(schema_to_json::<HistoryEntrySchema>().contains("orderCount"));
    }
}
