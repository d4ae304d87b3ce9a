//! Route documents and the orders they carry.
//!
//! A route is persisted as one JSON document under its [`RouteId`]. The
//! position of an order inside [`RouteDocument::orders`] is its
//! [`OrderIndex`]; permanent images and delivery photos are keyed by that
//! position, so the array must not be reordered once the route exists.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

const GENERATED_ROUTE_ID_LEN: usize = 8;
const MAX_ROUTE_ID_LEN: usize = 32;

/// Short route token shared with the driver.
///
/// ## Invariants
/// - 1 to 32 ASCII alphanumeric characters, so a route key can never collide
///   with the `img_`, `draft_`, `history:` or `delivery_photo:` families.
///
/// # Examples
/// ```
/// use routeslip::domain::RouteId;
///
/// let id = RouteId::new("3fa85f64").expect("valid route id");
/// assert_eq!(id.as_str(), "3fa85f64");
/// assert!(RouteId::new("img_3fa85f64_0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteId(String);

/// Validation errors returned when constructing [`RouteId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteIdValidationError {
    /// The identifier was empty.
    #[error("route id must not be empty")]
    Empty,
    /// The identifier exceeded the maximum length.
    #[error("route id must be at most {max} characters")]
    TooLong { max: usize },
    /// The identifier contained a character outside `[A-Za-z0-9]`.
    #[error("route id must contain only ASCII letters and digits")]
    InvalidCharacter,
}

impl RouteId {
    /// Validate and wrap an existing route identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, RouteIdValidationError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(RouteIdValidationError::Empty);
        }
        if raw.len() > MAX_ROUTE_ID_LEN {
            return Err(RouteIdValidationError::TooLong {
                max: MAX_ROUTE_ID_LEN,
            });
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RouteIdValidationError::InvalidCharacter);
        }
        Ok(Self(raw))
    }

    /// Generate a fresh token from the leading hex digits of a v4 UUID.
    ///
    /// Collisions are not checked; eight hex digits give 2^32 possibilities.
    #[must_use]
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(simple.chars().take(GENERATED_ROUTE_ID_LEN).collect())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RouteId {
    type Error = RouteIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RouteId> for String {
    fn from(value: RouteId) -> Self {
        value.0
    }
}

/// Zero-based position of an order inside its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderIndex(usize);

/// Error returned when an order index cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("order index must be a non-negative integer, got '{value}'")]
pub struct OrderIndexParseError {
    value: String,
}

impl OrderIndex {
    /// Wrap a raw position.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Raw position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for OrderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderIndex {
    type Err = OrderIndexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map(Self)
            .map_err(|_| OrderIndexParseError {
                value: s.to_owned(),
            })
    }
}

/// Delivery state of a single order. `Done` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Not yet delivered.
    #[default]
    Pending,
    /// Marked delivered by the driver.
    Done,
}

/// One delivery stop as stored inside a [`RouteDocument`].
///
/// Fields the extraction service adds beyond the named ones (tags, install
/// estimates and so on) are kept in `extra` and survive every rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub items: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub note: String,
    /// Draft key on the way in, permanent `img_` key once persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_key: Option<String>,
    #[serde(default)]
    pub delivery_photo_count: usize,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order submitted for route creation, before image promotion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewOrder {
    /// Order content; `image_key` may reference a draft image.
    pub order: Order,
    /// Inline data URL used when the draft has expired or was never stored.
    pub source_image_data: Option<String>,
}

impl From<Order> for NewOrder {
    fn from(order: Order) -> Self {
        Self {
            order,
            source_image_data: None,
        }
    }
}

/// Canonical route record stored under the route id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDocument {
    pub route_id: RouteId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl RouteDocument {
    /// Borrow the order at `index`, if the route has one there.
    #[must_use]
    pub fn order(&self, index: OrderIndex) -> Option<&Order> {
        self.orders.get(index.get())
    }

    /// Mutably borrow the order at `index`.
    pub fn order_mut(&mut self, index: OrderIndex) -> Option<&mut Order> {
        self.orders.get_mut(index.get())
    }
}
