//! Shared read and write of route documents against the store.

use std::sync::Arc;

use tracing::{error, warn};

use super::ports::{KeyValueStore, KeyValueStoreError};
use super::{Error, RouteDocument, RouteId, StoreKey};

/// Convert an adapter failure into a redacted internal error, logging the
/// underlying cause.
pub(crate) fn map_store_error(err: KeyValueStoreError) -> Error {
    error!(error = %err, "key-value store operation failed");
    Error::internal(format!("key-value store failure: {err}"))
}

/// Typed access to route documents stored under their route id.
#[derive(Clone)]
pub(crate) struct RouteRecords {
    store: Arc<dyn KeyValueStore>,
}

impl RouteRecords {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn raw(&self, route_id: &RouteId) -> Result<Option<String>, Error> {
        self.store
            .get(&StoreKey::route(route_id))
            .await
            .map_err(map_store_error)
    }

    pub(crate) async fn find(&self, route_id: &RouteId) -> Result<Option<RouteDocument>, Error> {
        let Some(raw) = self.raw(route_id).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|err| {
            error!(route_id = %route_id, error = %err, "stored route document is corrupt");
            Error::internal(format!("route document {route_id} could not be decoded"))
        })
    }

    /// Like [`Self::find`], but an undecodable document counts as absent.
    pub(crate) async fn find_for_removal(
        &self,
        route_id: &RouteId,
    ) -> Result<Option<RouteDocument>, Error> {
        let Some(raw) = self.raw(route_id).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(document) => Ok(Some(document)),
            Err(err) => {
                warn!(route_id = %route_id, error = %err, "removing corrupt route document");
                Ok(None)
            }
        }
    }

    pub(crate) async fn load(&self, route_id: &RouteId) -> Result<RouteDocument, Error> {
        self.find(route_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("route {route_id} not found")))
    }

    pub(crate) async fn save(&self, document: &RouteDocument) -> Result<(), Error> {
        let raw = serde_json::to_string(document)
            .map_err(|err| Error::internal(format!("route document encoding failed: {err}")))?;
        self.store
            .put(&StoreKey::route(&document.route_id), &raw, None)
            .await
            .map_err(map_store_error)
    }
}
