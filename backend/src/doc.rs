//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` handler, the health probes and the
//! schema wrappers from [`crate::inbound::http::schemas`]. Swagger UI serves
//! it in debug builds and `openapi-dump` prints it for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, HistoryEntrySchema, OrderSchema, OrderStatusSchema,
    RouteDocumentSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "routeslip API",
        description = "Receipt analysis, shared delivery routes, history and proof-of-delivery photos."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::analyze::analyze,
        crate::inbound::http::routes::create_route,
        crate::inbound::http::routes::get_route,
        crate::inbound::http::images::get_image,
        crate::inbound::http::images::get_delivery_photo,
        crate::inbound::http::history::verify,
        crate::inbound::http::history::list,
        crate::inbound::http::history::detail,
        crate::inbound::http::history::delete,
        crate::inbound::http::delivery::upload_delivery_photo,
        crate::inbound::http::delivery::list_delivery_photos,
        crate::inbound::http::delivery::complete_order,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        OrderSchema,
        OrderStatusSchema,
        RouteDocumentSchema,
        HistoryEntrySchema
    )),
    tags(
        (name = "analysis", description = "Receipt photo extraction"),
        (name = "routes", description = "Shared route documents"),
        (name = "images", description = "Stored receipt images"),
        (name = "history", description = "Password-gated route history"),
        (name = "delivery", description = "Delivery photos and completion"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
