//! Driving port for proof-of-delivery photos.

use async_trait::async_trait;

use crate::domain::{
    DeliveryPhotoReceipt, DeliveryPhotoRef, Error, ImagePayload, OrderIndex, RouteId, StoreKey,
};

/// Append-only photo sequences per order, plus the explicit completion
/// transition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryPhotos: Send + Sync {
    /// Number of photos stored for one order.
    async fn count(&self, route_id: &RouteId, index: OrderIndex) -> Result<usize, Error>;

    /// Store `photo` as the next photo of the order and update its count.
    ///
    /// Fails with `PhotoLimitReached` once the order holds the maximum, and
    /// with `NotFound` when the route or order does not exist.
    async fn append(
        &self,
        route_id: &RouteId,
        index: OrderIndex,
        photo: ImagePayload,
    ) -> Result<DeliveryPhotoReceipt, Error>;

    /// Keys and URLs of the order's photos in capture order.
    async fn list(&self, route_id: &RouteId, index: OrderIndex)
    -> Result<Vec<DeliveryPhotoRef>, Error>;

    /// Mark the order delivered.
    async fn mark_complete(&self, route_id: &RouteId, index: OrderIndex) -> Result<(), Error>;

    /// Decode one stored delivery photo.
    async fn serve(&self, key: &StoreKey) -> Result<ImagePayload, Error>;
}
