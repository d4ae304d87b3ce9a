//! Route document handlers.
//!
//! ```text
//! POST /api/create-route  Persist a route from draft orders
//! GET  /api/route/{id}    Read a route document
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use super::schemas::{OrderSchema, RouteDocumentSchema};
use super::state::HttpState;
use super::validation::{ROUTE_ID, parse_route_id};
use super::ApiResult;
use crate::domain::{Error, NewOrder, Order, RouteDocument};

/// One order as submitted for route creation.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteOrder {
    #[serde(flatten)]
    #[schema(value_type = OrderSchema)]
    pub order: Order,
    /// Inline data URL used when the draft image is gone.
    #[serde(default)]
    pub source_image_data: Option<String>,
}

impl From<CreateRouteOrder> for NewOrder {
    fn from(value: CreateRouteOrder) -> Self {
        Self {
            order: value.order,
            source_image_data: value.source_image_data.filter(|data| !data.is_empty()),
        }
    }
}

/// Route creation request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateRouteRequest {
    pub orders: Option<Vec<CreateRouteOrder>>,
}

/// Route creation response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteResponse {
    pub success: bool,
    #[schema(example = "ab12cd34")]
    pub route_id: String,
}

/// Persist a route, promoting each order's image to permanent storage.
#[utoipa::path(
    post,
    path = "/api/create-route",
    request_body = CreateRouteRequest,
    responses(
        (status = 200, description = "Route created", body = CreateRouteResponse),
        (status = 400, description = "Invalid request", body = super::schemas::ErrorSchema),
        (status = 500, description = "Store failure", body = super::schemas::ErrorSchema)
    ),
    tags = ["routes"],
    operation_id = "createRoute"
)]
#[post("/create-route")]
pub async fn create_route(
    state: web::Data<HttpState>,
    payload: web::Json<CreateRouteRequest>,
) -> ApiResult<web::Json<CreateRouteResponse>> {
    let orders = payload
        .into_inner()
        .orders
        .ok_or_else(|| Error::invalid_request("orders must be an array"))?;
    let route_id = state
        .routes
        .create(orders.into_iter().map(NewOrder::from).collect())
        .await?;
    Ok(web::Json(CreateRouteResponse {
        success: true,
        route_id: route_id.into(),
    }))
}

/// Read a route document exactly as stored.
#[utoipa::path(
    get,
    path = "/api/route/{id}",
    params(("id" = String, Path, description = "Route identifier")),
    responses(
        (status = 200, description = "Route document", body = RouteDocumentSchema),
        (status = 404, description = "Route not found", body = super::schemas::ErrorSchema)
    ),
    tags = ["routes"],
    operation_id = "getRoute"
)]
#[get("/route/{id}")]
pub async fn get_route(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RouteDocument>> {
    let route_id = parse_route_id(&path.into_inner(), ROUTE_ID)?;
    let document = state.routes.read(&route_id).await?;
    Ok(web::Json(document))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
