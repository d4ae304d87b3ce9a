//! Proof-of-delivery photos and order completion.
//!
//! Photos are append-only and keyed by capture sequence. Every mutation that
//! touches the route document runs under the route's write lock, and the
//! stored `deliveryPhotoCount` is recomputed from the key listing each time.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::image_lifecycle_service::load_stored_image;
use super::ports::{DeliveryPhotos, KeyValueStore};
use super::route_records::{RouteRecords, map_store_error};
use super::{
    DataUrl, DeliveryPhotoReceipt, DeliveryPhotoRef, Error, ImagePayload, KeyPrefix,
    MAX_DELIVERY_PHOTOS, OrderIndex, OrderStatus, RouteDocument, RouteId, RouteWriteLocks,
    StoreKey,
};

#[derive(Clone)]
pub struct DeliveryPhotoService {
    store: Arc<dyn KeyValueStore>,
    routes: RouteRecords,
    locks: RouteWriteLocks,
}

impl DeliveryPhotoService {
    pub fn new(store: Arc<dyn KeyValueStore>, locks: RouteWriteLocks) -> Self {
        Self {
            routes: RouteRecords::new(store.clone()),
            store,
            locks,
        }
    }

    async fn photo_keys(
        &self,
        route_id: &RouteId,
        index: OrderIndex,
    ) -> Result<Vec<StoreKey>, Error> {
        let mut keys = self
            .store
            .list(&KeyPrefix::order_delivery_photos(route_id, index))
            .await
            .map_err(map_store_error)?;
        keys.sort_by_key(|key| key.delivery_photo_sequence().unwrap_or(usize::MAX));
        Ok(keys)
    }
}

fn missing_order(route_id: &RouteId, index: OrderIndex) -> Error {
    Error::not_found(format!("route {route_id} has no order {index}"))
}

fn require_order(
    document: &RouteDocument,
    route_id: &RouteId,
    index: OrderIndex,
) -> Result<(), Error> {
    document
        .order(index)
        .map(|_| ())
        .ok_or_else(|| missing_order(route_id, index))
}

#[async_trait]
impl DeliveryPhotos for DeliveryPhotoService {
    async fn count(&self, route_id: &RouteId, index: OrderIndex) -> Result<usize, Error> {
        Ok(self.photo_keys(route_id, index).await?.len())
    }

    async fn append(
        &self,
        route_id: &RouteId,
        index: OrderIndex,
        photo: ImagePayload,
    ) -> Result<DeliveryPhotoReceipt, Error> {
        let _guard = self.locks.acquire(route_id).await;
        let mut document = self.routes.load(route_id).await?;
        require_order(&document, route_id, index)?;

        let keys = self.photo_keys(route_id, index).await?;
        let count = keys.len();
        if count >= MAX_DELIVERY_PHOTOS {
            return Err(Error::photo_limit_reached(format!(
                "order {index} already has the maximum of {MAX_DELIVERY_PHOTOS} delivery photos"
            )));
        }
        // Skip past any stray higher sequence so an existing photo is never overwritten.
        let sequence = keys
            .iter()
            .filter_map(StoreKey::delivery_photo_sequence)
            .max()
            .map_or(count, |highest| (highest + 1).max(count));

        let key = StoreKey::delivery_photo(route_id, index, sequence);
        let encoded = DataUrl::from_bytes(photo.mime_type, &photo.bytes).to_string();
        self.store
            .put(&key, &encoded, None)
            .await
            .map_err(map_store_error)?;

        let total = count + 1;
        if let Some(order) = document.order_mut(index) {
            order.delivery_photo_count = total;
        }
        self.routes.save(&document).await?;

        info!(route_id = %route_id, order_index = %index, sequence, total, "delivery photo stored");
        Ok(DeliveryPhotoReceipt { sequence, total })
    }

    async fn list(
        &self,
        route_id: &RouteId,
        index: OrderIndex,
    ) -> Result<Vec<DeliveryPhotoRef>, Error> {
        Ok(self
            .photo_keys(route_id, index)
            .await?
            .into_iter()
            .map(DeliveryPhotoRef::new)
            .collect())
    }

    async fn mark_complete(&self, route_id: &RouteId, index: OrderIndex) -> Result<(), Error> {
        let _guard = self.locks.acquire(route_id).await;
        let mut document = self.routes.load(route_id).await?;
        let order = document
            .order_mut(index)
            .ok_or_else(|| missing_order(route_id, index))?;
        order.status = OrderStatus::Done;
        self.routes.save(&document).await?;
        info!(route_id = %route_id, order_index = %index, "order marked done");
        Ok(())
    }

    async fn serve(&self, key: &StoreKey) -> Result<ImagePayload, Error> {
        if !key.is_delivery_photo() {
            return Err(Error::not_found(format!("delivery photo {key} not found")));
        }
        load_stored_image(self.store.as_ref(), key).await
    }
}

#[cfg(test)]
#[path = "delivery_photo_service_tests.rs"]
mod tests;
