//! Stored image handlers.
//!
//! ```text
//! GET /api/image/{key}           Receipt image (draft or permanent)
//! GET /api/delivery-photo/{key}  Delivery photo
//! ```

use actix_web::{HttpResponse, get, web};

use super::cache_control::public_image_header;
use super::state::HttpState;
use super::validation::{KEY, parse_store_key};
use super::ApiResult;
use crate::domain::ImagePayload;

fn image_response(payload: ImagePayload) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(payload.mime_type)
        .insert_header(public_image_header())
        .body(payload.bytes)
}

/// Serve a receipt image by key.
#[utoipa::path(
    get,
    path = "/api/image/{key}",
    params(("key" = String, Path, description = "`draft_{uuid}` or `img_{routeId}_{index}`")),
    responses(
        (status = 200, description = "Image bytes with their stored content type", content_type = "image/*"),
        (status = 404, description = "Image not found", body = super::schemas::ErrorSchema),
        (status = 500, description = "Stored value is not an image", body = super::schemas::ErrorSchema)
    ),
    tags = ["images"],
    operation_id = "getImage"
)]
#[get("/image/{key}")]
pub async fn get_image(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let key = parse_store_key(&path.into_inner(), KEY)?;
    let payload = state.images.serve(&key).await?;
    Ok(image_response(payload))
}

/// Serve a delivery photo by its percent-encoded key.
#[utoipa::path(
    get,
    path = "/api/delivery-photo/{key}",
    params(("key" = String, Path, description = "Percent-encoded `delivery_photo:{routeId}:{orderIndex}:{sequence}`")),
    responses(
        (status = 200, description = "Photo bytes with their stored content type", content_type = "image/*"),
        (status = 404, description = "Photo not found", body = super::schemas::ErrorSchema)
    ),
    tags = ["delivery"],
    operation_id = "getDeliveryPhoto"
)]
#[get("/delivery-photo/{key}")]
pub async fn get_delivery_photo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let key = parse_store_key(&path.into_inner(), KEY)?;
    let payload = state.photos.serve(&key).await?;
    Ok(image_response(payload))
}
