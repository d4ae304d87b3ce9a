//! Delivery photo constants and view types.

use serde::Serialize;

use super::keys::StoreKey;

/// Maximum number of delivery photos attached to one order.
pub const MAX_DELIVERY_PHOTOS: usize = 16;

/// Path prefix under which a delivery photo is served.
pub const DELIVERY_PHOTO_URL_PREFIX: &str = "/api/delivery-photo/";

/// Reference to one stored delivery photo.
///
/// # Examples
/// ```
/// use routeslip::domain::{DeliveryPhotoRef, OrderIndex, RouteId, StoreKey};
///
/// let route = RouteId::new("ab12").expect("route id");
/// let photo = DeliveryPhotoRef::new(StoreKey::delivery_photo(&route, OrderIndex::new(0), 1));
/// assert_eq!(photo.url, "/api/delivery-photo/delivery_photo%3Aab12%3A0%3A1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryPhotoRef {
    pub key: String,
    pub url: String,
}

impl DeliveryPhotoRef {
    #[must_use]
    pub fn new(key: StoreKey) -> Self {
        let url = format!(
            "{DELIVERY_PHOTO_URL_PREFIX}{}",
            urlencoding::encode(key.as_str())
        );
        Self {
            key: key.into_inner(),
            url,
        }
    }
}

/// Result of appending a delivery photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPhotoReceipt {
    /// Sequence number assigned to the new photo.
    pub sequence: usize,
    /// Photo count recorded on the order after the append.
    pub total: usize,
}
