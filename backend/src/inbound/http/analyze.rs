//! Receipt analysis handler.
//!
//! ```text
//! POST /api/analyze  multipart: image, optional prompt
//! ```

use actix_multipart::Multipart;
use actix_web::{post, web};
use serde::Serialize;
use tracing::info;

use super::multipart::UploadForm;
use super::schemas::OrderSchema;
use super::state::HttpState;
use super::ApiResult;
use crate::domain::Order;
use crate::domain::ports::ReceiptUpload;

/// Orders recovered from the receipt.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AnalyzedOrders {
    #[schema(value_type = Vec<OrderSchema>)]
    pub orders: Vec<Order>,
}

/// Successful analysis response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub data: AnalyzedOrders,
}

/// Read a receipt photo into draft orders.
///
/// Every returned order carries the same `imageKey`, a draft copy of the
/// uploaded photo that expires unless a route is created from it.
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body(content_type = "multipart/form-data", description = "`image` file and optional `prompt` text"),
    responses(
        (status = 200, description = "Draft orders", body = AnalyzeResponse),
        (status = 400, description = "No image uploaded", body = super::schemas::ErrorSchema),
        (status = 500, description = "Extraction failed or returned an unusable reply", body = super::schemas::ErrorSchema)
    ),
    tags = ["analysis"],
    operation_id = "analyzeReceipt"
)]
#[post("/analyze")]
pub async fn analyze(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<web::Json<AnalyzeResponse>> {
    let mut form = UploadForm::read(payload, state.upload_limit).await?;
    let image = form.take_image()?;
    info!(bytes = image.bytes.len(), mime_type = %image.mime_type, "receipt received");
    let upload = ReceiptUpload {
        image,
        prompt: form.take_text("prompt"),
    };

    let extracted = state.analysis.analyze(upload).await?;
    Ok(web::Json(AnalyzeResponse {
        success: true,
        data: AnalyzedOrders {
            orders: extracted.orders,
        },
    }))
}
