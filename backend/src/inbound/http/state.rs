//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AccessGate;
use crate::domain::ports::{
    DeliveryPhotos, HistoryIndex, ImageLibrary, ReceiptAnalysis, RouteDocuments,
};

/// Largest multipart body accepted by the upload endpoints.
pub const DEFAULT_UPLOAD_LIMIT: usize = 20 * 1024 * 1024;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub routes: Arc<dyn RouteDocuments>,
    pub images: Arc<dyn ImageLibrary>,
    pub history: Arc<dyn HistoryIndex>,
    pub photos: Arc<dyn DeliveryPhotos>,
    pub analysis: Arc<dyn ReceiptAnalysis>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub routes: Arc<dyn RouteDocuments>,
    pub images: Arc<dyn ImageLibrary>,
    pub history: Arc<dyn HistoryIndex>,
    pub photos: Arc<dyn DeliveryPhotos>,
    pub analysis: Arc<dyn ReceiptAnalysis>,
    pub access: AccessGate,
    pub upload_limit: usize,
}

impl HttpState {
    /// Construct state from the ports bundle and the history gate.
    pub fn new(ports: HttpStatePorts, access: AccessGate) -> Self {
        let HttpStatePorts {
            routes,
            images,
            history,
            photos,
            analysis,
        } = ports;
        Self {
            routes,
            images,
            history,
            photos,
            analysis,
            access,
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    /// Override the multipart body limit.
    #[must_use]
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }
}
