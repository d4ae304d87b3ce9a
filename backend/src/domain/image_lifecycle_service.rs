//! Draft and permanent receipt images.
//!
//! Analysis stores each uploaded receipt as a draft with a TTL. Route creation
//! copies the draft (or an inline data URL supplied by the client) to the
//! permanent key for its order. Drafts are never deleted here; they expire.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::ports::{ImageLibrary, KeyValueStore};
use super::route_records::map_store_error;
use super::{DataUrl, Error, ImagePayload, OrderIndex, RouteId, StoreKey};

/// Default lifetime of a draft image.
pub const DEFAULT_DRAFT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Where a promoted image comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageSource<'a> {
    /// Draft (or already permanent) key carried on the order.
    pub image_key: Option<&'a str>,
    /// Inline data URL used when the key yields nothing.
    pub inline_data: Option<&'a str>,
}

/// Stores, promotes, and serves receipt images.
#[derive(Clone)]
pub struct ImageLifecycleService {
    store: Arc<dyn KeyValueStore>,
    draft_ttl: Duration,
}

impl ImageLifecycleService {
    pub fn new(store: Arc<dyn KeyValueStore>, draft_ttl: Duration) -> Self {
        Self { store, draft_ttl }
    }

    /// Store `image` under a fresh draft key that expires after the
    /// configured TTL.
    pub async fn stash_draft(&self, image: &DataUrl) -> Result<StoreKey, Error> {
        let key = StoreKey::draft_image(Uuid::new_v4());
        self.store
            .put(&key, &image.to_string(), Some(self.draft_ttl))
            .await
            .map_err(map_store_error)?;
        debug!(key = %key, ttl_secs = self.draft_ttl.as_secs(), "draft image stored");
        Ok(key)
    }

    /// Copy an order's image to `img_{route}_{index}`.
    ///
    /// Returns `None` when neither the key nor the inline payload yields an
    /// image; the order is then persisted without one. An inline payload
    /// that is present but malformed fails with `InvalidRequest`.
    pub async fn promote(
        &self,
        source: ImageSource<'_>,
        route_id: &RouteId,
        index: OrderIndex,
    ) -> Result<Option<StoreKey>, Error> {
        let mut payload = match source.image_key.and_then(promotable_key) {
            Some(key) => self.store.get(&key).await.map_err(map_store_error)?,
            None => None,
        };

        if payload.is_none() {
            if let Some(inline) = source.inline_data {
                let url: DataUrl = inline.parse().map_err(|err| {
                    Error::invalid_request(format!(
                        "orders[{index}].sourceImageData is not a base64 data URL: {err}"
                    ))
                })?;
                payload = Some(url.to_string());
            }
        }

        let Some(payload) = payload else {
            if source.image_key.is_some() {
                warn!(
                    route_id = %route_id,
                    order_index = %index,
                    image_key = source.image_key,
                    "draft image missing and no inline fallback; order kept without image"
                );
            }
            return Ok(None);
        };

        let permanent = StoreKey::permanent_image(route_id, index);
        self.store
            .put(&permanent, &payload, None)
            .await
            .map_err(map_store_error)?;
        Ok(Some(permanent))
    }
}

/// Only draft and permanent image keys may be copied or served as images.
fn promotable_key(raw: &str) -> Option<StoreKey> {
    StoreKey::new(raw)
        .ok()
        .filter(|key| key.is_draft_image() || key.is_permanent_image())
}

/// Read and decode a stored data URL.
pub(crate) async fn load_stored_image(
    store: &dyn KeyValueStore,
    key: &StoreKey,
) -> Result<ImagePayload, Error> {
    let Some(raw) = store.get(key).await.map_err(map_store_error)? else {
        return Err(Error::not_found(format!("image {key} not found")));
    };
    raw.parse::<DataUrl>()
        .and_then(|url| url.decode())
        .map_err(|err| {
            error!(key = %key, error = %err, "stored image is not a base64 data URL");
            Error::internal(format!("stored image {key} is malformed: {err}"))
        })
}

#[async_trait]
impl ImageLibrary for ImageLifecycleService {
    async fn serve(&self, key: &StoreKey) -> Result<ImagePayload, Error> {
        if !(key.is_draft_image() || key.is_permanent_image()) {
            return Err(Error::not_found(format!("image {key} not found")));
        }
        load_stored_image(self.store.as_ref(), key).await
    }
}

#[cfg(test)]
#[path = "image_lifecycle_service_tests.rs"]
mod tests;
