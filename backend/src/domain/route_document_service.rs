//! Route document lifecycle: create, read, and cascading delete.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::image_lifecycle_service::{ImageLifecycleService, ImageSource};
use super::ports::{HistoryIndex, KeyValueStore, RouteDocuments};
use super::route_records::{RouteRecords, map_store_error};
use super::{
    Error, HistoryDate, HistoryEntry, KeyPrefix, NewOrder, OrderIndex, OrderStatus, RouteDocument,
    RouteId, RouteWriteLocks, StoreKey,
};

/// Owns the canonical route record and the cascade that removes it.
#[derive(Clone)]
pub struct RouteDocumentService {
    store: Arc<dyn KeyValueStore>,
    routes: RouteRecords,
    images: ImageLifecycleService,
    history: Arc<dyn HistoryIndex>,
    locks: RouteWriteLocks,
    clock: Arc<dyn Clock>,
}

impl RouteDocumentService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        images: ImageLifecycleService,
        history: Arc<dyn HistoryIndex>,
        locks: RouteWriteLocks,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            routes: RouteRecords::new(store.clone()),
            store,
            images,
            history,
            locks,
            clock,
        }
    }

    async fn delete_prefix(&self, prefix: &KeyPrefix) -> Result<usize, Error> {
        let keys = self.store.list(prefix).await.map_err(map_store_error)?;
        for key in &keys {
            self.store.delete(key).await.map_err(map_store_error)?;
        }
        Ok(keys.len())
    }
}

#[async_trait]
impl RouteDocuments for RouteDocumentService {
    async fn create(&self, orders: Vec<NewOrder>) -> Result<RouteId, Error> {
        let route_id = RouteId::generate();
        let created_at = self.clock.utc();

        let mut persisted = Vec::with_capacity(orders.len());
        for (position, submitted) in orders.into_iter().enumerate() {
            let index = OrderIndex::new(position);
            let mut order = submitted.order;
            let source = ImageSource {
                image_key: order.image_key.as_deref(),
                inline_data: submitted.source_image_data.as_deref(),
            };
            let permanent = self.images.promote(source, &route_id, index).await?;
            order.image_key = permanent.map(StoreKey::into_inner);
            order.delivery_photo_count = 0;
            order.status = OrderStatus::Pending;
            persisted.push(order);
        }

        let document = RouteDocument {
            route_id: route_id.clone(),
            created_at,
            orders: persisted,
        };
        self.routes.save(&document).await?;
        self.history
            .record(&HistoryEntry {
                route_id: route_id.clone(),
                created_at,
                order_count: document.orders.len(),
            })
            .await?;

        info!(route_id = %route_id, orders = document.orders.len(), "route created");
        Ok(route_id)
    }

    async fn read(&self, route_id: &RouteId) -> Result<RouteDocument, Error> {
        self.routes.load(route_id).await
    }

    async fn delete(&self, route_id: &RouteId, date: &HistoryDate) -> Result<(), Error> {
        let _guard = self.locks.acquire(route_id).await;
        let existing = self.routes.find_for_removal(route_id).await?;

        self.store
            .delete(&StoreKey::route(route_id))
            .await
            .map_err(map_store_error)?;
        self.store
            .delete(&StoreKey::history(date, route_id))
            .await
            .map_err(map_store_error)?;
        if let Some(document) = existing.as_ref() {
            let created_on = HistoryDate::of(document.created_at);
            if &created_on != date {
                self.store
                    .delete(&StoreKey::history(&created_on, route_id))
                    .await
                    .map_err(map_store_error)?;
            }
        }

        let images = self
            .delete_prefix(&KeyPrefix::permanent_images(route_id))
            .await?;
        let photos = self
            .delete_prefix(&KeyPrefix::route_delivery_photos(route_id))
            .await?;

        if existing.is_some() {
            info!(route_id = %route_id, images, photos, "route deleted");
        } else {
            debug!(route_id = %route_id, images, photos, "route already absent; cascade re-run");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "route_document_service_tests.rs"]
mod tests;
