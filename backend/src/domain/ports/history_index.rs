//! Driving port for the day-bucketed route history.

use async_trait::async_trait;

use crate::domain::{Error, HistoryDate, HistoryEntry, RouteDocument, RouteId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryIndex: Send + Sync {
    /// Write the summary for a newly created route.
    async fn record(&self, entry: &HistoryEntry) -> Result<(), Error>;

    /// Entries recorded on `date`, most recent first.
    async fn list(&self, date: &HistoryDate) -> Result<Vec<HistoryEntry>, Error>;

    /// Full document behind a history entry.
    async fn detail(&self, route_id: &RouteId) -> Result<RouteDocument, Error>;
}
