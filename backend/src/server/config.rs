//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use routeslip::domain::ports::{KeyValueStore, ReceiptExtractor};
use routeslip::domain::{AccessGate, DEFAULT_DRAFT_TTL};
use routeslip::inbound::http::state::DEFAULT_UPLOAD_LIMIT;

/// Everything the server needs to assemble its services.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn KeyValueStore>,
    pub(crate) extractor: Arc<dyn ReceiptExtractor>,
    pub(crate) access: AccessGate,
    pub(crate) draft_ttl: Duration,
    pub(crate) upload_limit: usize,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        store: Arc<dyn KeyValueStore>,
        extractor: Arc<dyn ReceiptExtractor>,
        access: AccessGate,
    ) -> Self {
        Self {
            bind_addr,
            store,
            extractor,
            access,
            draft_ttl: DEFAULT_DRAFT_TTL,
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    /// Override how long draft receipt images live.
    #[must_use]
    pub fn with_draft_ttl(mut self, ttl: Duration) -> Self {
        self.draft_ttl = ttl;
        self
    }

    /// Override the multipart body limit.
    #[must_use]
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }
}
