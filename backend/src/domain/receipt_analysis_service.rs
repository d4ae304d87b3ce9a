//! Receipt photo to draft orders.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::extraction::{DEFAULT_EXTRACTION_PROMPT, parse_extracted_orders};
use super::image_lifecycle_service::ImageLifecycleService;
use super::ports::{ReceiptAnalysis, ReceiptExtractor, ReceiptExtractorError, ReceiptUpload};
use super::{DataUrl, Error, ExtractedOrders};

fn map_extractor_error(err: ReceiptExtractorError) -> Error {
    match err {
        ReceiptExtractorError::Unconfigured => {
            Error::misconfigured("receipt extraction service is not configured")
        }
        ReceiptExtractorError::Decode { message } => {
            warn!(error = %message, "extraction service returned an unreadable envelope");
            Error::upstream_format("receipt extraction service returned an unreadable response")
        }
        other => {
            error!(error = %other, "receipt extraction failed");
            Error::internal(other.to_string())
        }
    }
}

/// Calls the extractor, validates its reply, and stores the receipt as a
/// draft image referenced by every returned order.
#[derive(Clone)]
pub struct ReceiptAnalysisService {
    extractor: Arc<dyn ReceiptExtractor>,
    images: ImageLifecycleService,
}

impl ReceiptAnalysisService {
    pub fn new(extractor: Arc<dyn ReceiptExtractor>, images: ImageLifecycleService) -> Self {
        Self { extractor, images }
    }
}

#[async_trait]
impl ReceiptAnalysis for ReceiptAnalysisService {
    async fn analyze(&self, upload: ReceiptUpload) -> Result<ExtractedOrders, Error> {
        if upload.image.bytes.is_empty() {
            return Err(Error::invalid_request("image must not be empty"));
        }
        let image = DataUrl::from_bytes(upload.image.mime_type, &upload.image.bytes);
        let prompt = upload
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
            .unwrap_or(DEFAULT_EXTRACTION_PROMPT);

        let raw = self
            .extractor
            .extract(&image, prompt)
            .await
            .map_err(map_extractor_error)?;
        let mut extracted = parse_extracted_orders(&raw)?;

        let draft = self.images.stash_draft(&image).await?;
        for order in &mut extracted.orders {
            order.image_key = Some(draft.as_str().to_owned());
        }

        info!(orders = extracted.orders.len(), draft_key = %draft, "receipt analysed");
        Ok(extracted)
    }
}
