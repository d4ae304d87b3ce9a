//! Delivery photo and completion handlers.
//!
//! ```text
//! POST /api/upload-delivery-photo                    multipart: image, routeId, orderIndex
//! GET  /api/delivery-photos/{routeId}/{orderIndex}   Photo references for one order
//! POST /api/complete-order                           Mark an order done
//! ```

use actix_multipart::Multipart;
use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::history::SuccessResponse;
use super::multipart::UploadForm;
use super::state::HttpState;
use super::validation::{
    ORDER_INDEX, OrderIndexInput, ROUTE_ID, missing_field_error, parse_order_index,
    parse_route_id, require_text,
};
use super::ApiResult;
use crate::domain::DeliveryPhotoRef;

/// Acknowledgement for a stored delivery photo.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDeliveryPhotoResponse {
    pub success: bool,
    /// Sequence number assigned to the new photo.
    pub photo_index: usize,
    /// Photos now stored for the order.
    pub total_photos: usize,
}

/// Reference to one stored delivery photo.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DeliveryPhotoLink {
    #[schema(example = "delivery_photo:ab12cd34:0:0")]
    pub key: String,
    #[schema(example = "/api/delivery-photo/delivery_photo%3Aab12cd34%3A0%3A0")]
    pub url: String,
}

impl From<DeliveryPhotoRef> for DeliveryPhotoLink {
    fn from(value: DeliveryPhotoRef) -> Self {
        Self {
            key: value.key,
            url: value.url,
        }
    }
}

/// Photos for one order, in upload order.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DeliveryPhotoListResponse {
    pub success: bool,
    pub photos: Vec<DeliveryPhotoLink>,
}

/// Completion request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOrderRequest {
    pub route_id: Option<String>,
    /// A number or a numeric string.
    #[schema(value_type = Option<u32>)]
    pub order_index: Option<OrderIndexInput>,
}

/// Store a proof-of-delivery photo for an order.
#[utoipa::path(
    post,
    path = "/api/upload-delivery-photo",
    request_body(content_type = "multipart/form-data", description = "`image` file plus `routeId` and `orderIndex` text fields"),
    responses(
        (status = 200, description = "Photo stored", body = UploadDeliveryPhotoResponse),
        (status = 400, description = "Missing fields or photo limit reached", body = super::schemas::ErrorSchema),
        (status = 404, description = "Route or order not found", body = super::schemas::ErrorSchema)
    ),
    tags = ["delivery"],
    operation_id = "uploadDeliveryPhoto"
)]
#[post("/upload-delivery-photo")]
pub async fn upload_delivery_photo(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<web::Json<UploadDeliveryPhotoResponse>> {
    let mut form = UploadForm::read(payload, state.upload_limit).await?;
    let image = form.take_image()?;
    let route_id = parse_route_id(
        &require_text(form.take_text(ROUTE_ID.as_str()), ROUTE_ID)?,
        ROUTE_ID,
    )?;
    let index = parse_order_index(
        &require_text(form.take_text(ORDER_INDEX.as_str()), ORDER_INDEX)?,
        ORDER_INDEX,
    )?;

    let receipt = state.photos.append(&route_id, index, image).await?;
    Ok(web::Json(UploadDeliveryPhotoResponse {
        success: true,
        photo_index: receipt.sequence,
        total_photos: receipt.total,
    }))
}

/// List the delivery photos of one order.
#[utoipa::path(
    get,
    path = "/api/delivery-photos/{routeId}/{orderIndex}",
    params(
        ("routeId" = String, Path, description = "Route identifier"),
        ("orderIndex" = u32, Path, description = "Zero-based order position")
    ),
    responses(
        (status = 200, description = "Photo references", body = DeliveryPhotoListResponse),
        (status = 400, description = "Malformed path", body = super::schemas::ErrorSchema)
    ),
    tags = ["delivery"],
    operation_id = "listDeliveryPhotos"
)]
#[get("/delivery-photos/{route_id}/{order_index}")]
pub async fn list_delivery_photos(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<DeliveryPhotoListResponse>> {
    let (route_id, order_index) = path.into_inner();
    let route_id = parse_route_id(&route_id, ROUTE_ID)?;
    let index = parse_order_index(&order_index, ORDER_INDEX)?;

    let photos = state.photos.list(&route_id, index).await?;
    Ok(web::Json(DeliveryPhotoListResponse {
        success: true,
        photos: photos.into_iter().map(DeliveryPhotoLink::from).collect(),
    }))
}

/// Mark an order as delivered.
#[utoipa::path(
    post,
    path = "/api/complete-order",
    request_body = CompleteOrderRequest,
    responses(
        (status = 200, description = "Order marked done", body = SuccessResponse),
        (status = 400, description = "Missing routeId or orderIndex", body = super::schemas::ErrorSchema),
        (status = 404, description = "Route or order not found", body = super::schemas::ErrorSchema)
    ),
    tags = ["delivery"],
    operation_id = "completeOrder"
)]
#[post("/complete-order")]
pub async fn complete_order(
    state: web::Data<HttpState>,
    payload: web::Json<CompleteOrderRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let CompleteOrderRequest {
        route_id,
        order_index,
    } = payload.into_inner();
    let route_id = parse_route_id(&require_text(route_id, ROUTE_ID)?, ROUTE_ID)?;
    let index = order_index
        .ok_or_else(|| missing_field_error(ORDER_INDEX))?
        .resolve(ORDER_INDEX)?;

    state.photos.mark_complete(&route_id, index).await?;
    info!(route_id = %route_id, order_index = %index, "order completed");
    Ok(web::Json(SuccessResponse::ok()))
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
