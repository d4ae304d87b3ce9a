//! Driving port for turning a receipt photo into draft orders.

use async_trait::async_trait;

use crate::domain::{Error, ExtractedOrders, ImagePayload};

/// Uploaded receipt awaiting analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptUpload {
    pub image: ImagePayload,
    /// Overrides the built-in extraction prompt when non-blank.
    pub prompt: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptAnalysis: Send + Sync {
    /// Extract orders from the receipt and stash the image as a draft.
    ///
    /// Every returned order carries the draft key in `image_key`.
    async fn analyze(&self, upload: ReceiptUpload) -> Result<ExtractedOrders, Error>;
}
