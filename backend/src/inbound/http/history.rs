//! History handlers, all gated by the shared history password.
//!
//! ```text
//! POST /api/history/verify  Check the password
//! POST /api/history/list    Routes created on one day, newest first
//! POST /api/history/detail  Full route document
//! POST /api/history/delete  Remove a route and everything it owns
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::schemas::{HistoryEntrySchema, RouteDocumentSchema};
use super::state::HttpState;
use super::validation::{DATE, ROUTE_ID, parse_history_date, parse_route_id, require_text};
use super::ApiResult;
use crate::domain::{HistoryEntry, RouteDocument};

/// Password-only request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct VerifyRequest {
    pub password: Option<String>,
}

/// Body for listing one day of history.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct HistoryListRequest {
    pub password: Option<String>,
    /// Calendar day as `YYYY-MM-DD`.
    #[schema(example = "2025-12-11")]
    pub date: Option<String>,
}

/// Body naming a single route.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetailRequest {
    pub password: Option<String>,
    pub route_id: Option<String>,
}

/// Body for deleting a route.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDeleteRequest {
    pub password: Option<String>,
    pub route_id: Option<String>,
    /// Day the route is indexed under.
    pub date: Option<String>,
}

/// Bare success acknowledgement.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub(crate) const fn ok() -> Self {
        Self { success: true }
    }
}

/// One day of history.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HistoryListResponse {
    pub success: bool,
    #[schema(value_type = Vec<HistoryEntrySchema>)]
    pub records: Vec<HistoryEntry>,
}

/// Route document returned by the history view.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HistoryDetailResponse {
    pub success: bool,
    #[schema(value_type = RouteDocumentSchema)]
    pub data: RouteDocument,
}

fn check_password(state: &HttpState, password: Option<String>) -> ApiResult<()> {
    // Missing passwords still reach the gate so an unset secret reports 500.
    let password = password.unwrap_or_default();
    state.access.verify(&password)
}

/// Check the history password.
#[utoipa::path(
    post,
    path = "/api/history/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Password accepted", body = SuccessResponse),
        (status = 401, description = "Password rejected", body = super::schemas::ErrorSchema),
        (status = 500, description = "No history password configured", body = super::schemas::ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "verifyHistoryPassword"
)]
#[post("/history/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    check_password(&state, payload.into_inner().password)?;
    Ok(web::Json(SuccessResponse::ok()))
}

/// List the routes created on one day, newest first.
#[utoipa::path(
    post,
    path = "/api/history/list",
    request_body = HistoryListRequest,
    responses(
        (status = 200, description = "History entries", body = HistoryListResponse),
        (status = 400, description = "Missing or malformed date", body = super::schemas::ErrorSchema),
        (status = 401, description = "Password rejected", body = super::schemas::ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "listHistory"
)]
#[post("/history/list")]
pub async fn list(
    state: web::Data<HttpState>,
    payload: web::Json<HistoryListRequest>,
) -> ApiResult<web::Json<HistoryListResponse>> {
    let HistoryListRequest { password, date } = payload.into_inner();
    check_password(&state, password)?;
    let date = parse_history_date(&require_text(date, DATE)?, DATE)?;

    let records = state.history.list(&date).await?;
    Ok(web::Json(HistoryListResponse {
        success: true,
        records,
    }))
}

/// Fetch the full document of a route from the history view.
#[utoipa::path(
    post,
    path = "/api/history/detail",
    request_body = HistoryDetailRequest,
    responses(
        (status = 200, description = "Route document", body = HistoryDetailResponse),
        (status = 401, description = "Password rejected", body = super::schemas::ErrorSchema),
        (status = 404, description = "Route not found", body = super::schemas::ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "historyDetail"
)]
#[post("/history/detail")]
pub async fn detail(
    state: web::Data<HttpState>,
    payload: web::Json<HistoryDetailRequest>,
) -> ApiResult<web::Json<HistoryDetailResponse>> {
    let HistoryDetailRequest { password, route_id } = payload.into_inner();
    check_password(&state, password)?;
    let route_id = parse_route_id(&require_text(route_id, ROUTE_ID)?, ROUTE_ID)?;

    let data = state.history.detail(&route_id).await?;
    Ok(web::Json(HistoryDetailResponse {
        success: true,
        data,
    }))
}

/// Delete a route, its history entry, its images and its delivery photos.
///
/// Deleting an already deleted route succeeds.
#[utoipa::path(
    post,
    path = "/api/history/delete",
    request_body = HistoryDeleteRequest,
    responses(
        (status = 200, description = "Route removed", body = SuccessResponse),
        (status = 400, description = "Missing routeId or date", body = super::schemas::ErrorSchema),
        (status = 401, description = "Password rejected", body = super::schemas::ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "deleteHistoryRoute"
)]
#[post("/history/delete")]
pub async fn delete(
    state: web::Data<HttpState>,
    payload: web::Json<HistoryDeleteRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let HistoryDeleteRequest {
        password,
        route_id,
        date,
    } = payload.into_inner();
    check_password(&state, password)?;
    let route_id = parse_route_id(&require_text(route_id, ROUTE_ID)?, ROUTE_ID)?;
    let date = parse_history_date(&require_text(date, DATE)?, DATE)?;

    state.routes.delete(&route_id, &date).await?;
    info!(route_id = %route_id, date = %date, "route deleted from history");
    Ok(web::Json(SuccessResponse::ok()))
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
