//! Driven port for the external receipt vision service.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::DataUrl;

define_port_error! {
    /// Errors surfaced by receipt extraction adapters.
    pub enum ReceiptExtractorError {
        /// Network failure before a response arrived.
        Transport { message: String } => "receipt extraction transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } => "receipt extraction timed out: {message}",
        /// The service answered with a non-success status.
        Status { status: u16, message: String } => "receipt extraction returned status {status}: {message}",
        /// The service envelope could not be decoded or held no text.
        Decode { message: String } => "receipt extraction response was malformed: {message}",
        /// No service credential is configured.
        Unconfigured => "receipt extraction is not configured",
    }
}

/// Sends one receipt image with an instruction prompt and returns the raw
/// text the service produced.
///
/// Adapters do not interpret the text; schema checks happen in the domain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    async fn extract(&self, image: &DataUrl, prompt: &str) -> Result<String, ReceiptExtractorError>;
}
