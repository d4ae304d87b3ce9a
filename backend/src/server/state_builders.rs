//! Builders wiring outbound adapters into the HTTP state ports.

use std::sync::Arc;

use mockable::DefaultClock;
use routeslip::domain::ports::HistoryIndex;
use routeslip::domain::{
    DeliveryPhotoService, HistoryIndexService, ImageLifecycleService, ReceiptAnalysisService,
    RouteDocumentService, RouteWriteLocks,
};
use routeslip::inbound::http::state::{HttpState, HttpStatePorts};

use super::ServerConfig;

/// Assemble domain services over the configured store and extractor.
///
/// Route deletion and photo updates share one [`RouteWriteLocks`] so writes
/// to the same route never interleave.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let store = config.store.clone();
    let locks = RouteWriteLocks::new();
    let images = ImageLifecycleService::new(store.clone(), config.draft_ttl);
    let history: Arc<dyn HistoryIndex> = Arc::new(HistoryIndexService::new(store.clone()));
    let routes = RouteDocumentService::new(
        store.clone(),
        images.clone(),
        history.clone(),
        locks.clone(),
        Arc::new(DefaultClock),
    );
    let photos = DeliveryPhotoService::new(store, locks);
    let analysis = ReceiptAnalysisService::new(config.extractor.clone(), images.clone());

    HttpState::new(
        HttpStatePorts {
            routes: Arc::new(routes),
            images: Arc::new(images),
            history,
            photos: Arc::new(photos),
            analysis: Arc::new(analysis),
        },
        config.access.clone(),
    )
    .with_upload_limit(config.upload_limit)
}
