//! Key layout of the flat key-value store.
//!
//! Every record lives in a single namespace and the key shape carries the
//! record family:
//!
//! | Family          | Shape                                   |
//! |-----------------|-----------------------------------------|
//! | route document  | `{routeId}`                             |
//! | draft image     | `draft_{uuid}`                          |
//! | permanent image | `img_{routeId}_{orderIndex}`            |
//! | history entry   | `history:{YYYY-MM-DD}:{routeId}`        |
//! | delivery photo  | `delivery_photo:{routeId}:{index}:{seq}` |
//!
//! Route ids are alphanumeric, so a trailing separator on a prefix keeps one
//! route's records apart from another route whose id merely starts the same.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use super::history::HistoryDate;
use super::route::{OrderIndex, RouteId};

const DRAFT_IMAGE_PREFIX: &str = "draft_";
const PERMANENT_IMAGE_PREFIX: &str = "img_";
const HISTORY_PREFIX: &str = "history:";
const DELIVERY_PHOTO_PREFIX: &str = "delivery_photo:";

/// Validated key into the key-value store.
///
/// ## Invariants
/// - Non-empty and free of leading or trailing whitespace.
///
/// # Examples
/// ```
/// use routeslip::domain::{OrderIndex, RouteId, StoreKey};
///
/// let route = RouteId::new("ab12cd34").expect("route id");
/// let key = StoreKey::permanent_image(&route, OrderIndex::new(2));
/// assert_eq!(key.as_str(), "img_ab12cd34_2");
/// assert!(key.is_permanent_image());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey(String);

/// Validation errors returned by [`StoreKey::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreKeyValidationError {
    #[error("store key must not be empty")]
    Empty,
    #[error("store key must not contain surrounding whitespace")]
    ContainsWhitespace,
}

impl StoreKey {
    /// Validate and wrap an arbitrary key string.
    pub fn new(value: impl Into<String>) -> Result<Self, StoreKeyValidationError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(StoreKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(StoreKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key of a route document.
    #[must_use]
    pub fn route(route_id: &RouteId) -> Self {
        Self(route_id.as_str().to_owned())
    }

    /// Key of a short-lived draft image produced by receipt analysis.
    #[must_use]
    pub fn draft_image(id: Uuid) -> Self {
        Self(format!("{DRAFT_IMAGE_PREFIX}{id}"))
    }

    /// Key of the permanent receipt image for one order.
    #[must_use]
    pub fn permanent_image(route_id: &RouteId, index: OrderIndex) -> Self {
        Self(format!("{PERMANENT_IMAGE_PREFIX}{route_id}_{index}"))
    }

    /// Key of the history entry listing `route_id` under `date`.
    #[must_use]
    pub fn history(date: &HistoryDate, route_id: &RouteId) -> Self {
        Self(format!("{HISTORY_PREFIX}{date}:{route_id}"))
    }

    /// Key of the `sequence`-th delivery photo for one order.
    #[must_use]
    pub fn delivery_photo(route_id: &RouteId, index: OrderIndex, sequence: usize) -> Self {
        Self(format!(
            "{DELIVERY_PHOTO_PREFIX}{route_id}:{index}:{sequence}"
        ))
    }

    /// Borrow the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the key, returning the raw string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    #[must_use]
    pub fn is_draft_image(&self) -> bool {
        self.0.starts_with(DRAFT_IMAGE_PREFIX)
    }

    #[must_use]
    pub fn is_permanent_image(&self) -> bool {
        self.0.starts_with(PERMANENT_IMAGE_PREFIX)
    }

    #[must_use]
    pub fn is_delivery_photo(&self) -> bool {
        self.0.starts_with(DELIVERY_PHOTO_PREFIX)
    }

    /// Photo sequence number encoded in a delivery photo key.
    ///
    /// Returns `None` for keys outside the delivery photo family or with a
    /// non-numeric trailing segment.
    #[must_use]
    pub fn delivery_photo_sequence(&self) -> Option<usize> {
        if !self.is_delivery_photo() {
            return None;
        }
        self.0.rsplit(':').next()?.parse().ok()
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Prefix used to enumerate one family of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    /// All permanent images belonging to one route.
    #[must_use]
    pub fn permanent_images(route_id: &RouteId) -> Self {
        Self(format!("{PERMANENT_IMAGE_PREFIX}{route_id}_"))
    }

    /// All history entries written on one day.
    #[must_use]
    pub fn history_day(date: &HistoryDate) -> Self {
        Self(format!("{HISTORY_PREFIX}{date}:"))
    }

    /// All delivery photos of every order in one route.
    #[must_use]
    pub fn route_delivery_photos(route_id: &RouteId) -> Self {
        Self(format!("{DELIVERY_PHOTO_PREFIX}{route_id}:"))
    }

    /// All delivery photos of one order.
    #[must_use]
    pub fn order_delivery_photos(route_id: &RouteId, index: OrderIndex) -> Self {
        Self(format!("{DELIVERY_PHOTO_PREFIX}{route_id}:{index}:"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `key` belongs to this family.
    #[must_use]
    pub fn matches(&self, key: &StoreKey) -> bool {
        key.as_str().starts_with(self.as_str())
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
