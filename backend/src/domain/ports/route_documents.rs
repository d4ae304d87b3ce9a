//! Driving port for route document lifecycle operations.

use async_trait::async_trait;

use crate::domain::{Error, HistoryDate, NewOrder, RouteDocument, RouteId};

/// Create, read, and cascade-delete route documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteDocuments: Send + Sync {
    /// Persist a new route, promoting each order's image and recording a
    /// history entry for the current UTC day.
    async fn create(&self, orders: Vec<NewOrder>) -> Result<RouteId, Error>;

    /// Fetch a route, failing with `NotFound` when it does not exist.
    async fn read(&self, route_id: &RouteId) -> Result<RouteDocument, Error>;

    /// Remove a route together with its history entry, images, and
    /// delivery photos. Repeating the call is harmless.
    async fn delete(&self, route_id: &RouteId, date: &HistoryDate) -> Result<(), Error>;
}
