//! Day-bucketed index of created routes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::route::RouteId;

const HISTORY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar day (UTC) used to bucket history entries.
///
/// # Examples
/// ```
/// use routeslip::domain::HistoryDate;
///
/// let date: HistoryDate = "2025-12-11".parse().expect("valid date");
/// assert_eq!(date.to_string(), "2025-12-11");
/// assert!("2025-13-01".parse::<HistoryDate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryDate(NaiveDate);

/// Error returned when a history date is not `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("date must be formatted as YYYY-MM-DD, got '{value}'")]
pub struct HistoryDateParseError {
    value: String,
}

impl HistoryDate {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// UTC calendar day of `instant`.
    #[must_use]
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for HistoryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(HISTORY_DATE_FORMAT))
    }
}

impl FromStr for HistoryDate {
    type Err = HistoryDateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts single-digit months; the key layout needs exactly ten characters.
        if s.len() != 10 {
            return Err(HistoryDateParseError {
                value: s.to_owned(),
            });
        }
        NaiveDate::parse_from_str(s, HISTORY_DATE_FORMAT)
            .map(Self)
            .map_err(|_| HistoryDateParseError {
                value: s.to_owned(),
            })
    }
}

/// Summary of one route as stored under its history key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub route_id: RouteId,
    pub created_at: DateTime<Utc>,
    pub order_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("2025-1-01")]
    #[case("2025/12/11")]
    #[case("yesterday")]
    #[case("2025-02-30")]
    fn rejects_malformed_dates(#[case] raw: &str) {
        assert!(raw.parse::<HistoryDate>().is_err());
    }

    #[rstest]
    fn day_of_instant_uses_utc() {
        let instant = DateTime::parse_from_rfc3339("2025-12-11T23:30:00-02:00")
            .expect("timestamp")
            .with_timezone(&Utc);
        assert_eq!(HistoryDate::of(instant).to_string(), "2025-12-12");
    }

    #[rstest]
    fn entry_serialises_camel_case() {
        let entry = HistoryEntry {
            route_id: RouteId::new("abc").expect("route id"),
            created_at: DateTime::parse_from_rfc3339("2025-12-11T08:00:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
            order_count: 3,
        };
        let value = serde_json::to_value(&entry).expect("entry encodes");
        assert_eq!(value["routeId"], json!("abc"));
        assert_eq!(value["orderCount"], json!(3));
        assert_eq!(value["createdAt"], json!("2025-12-11T08:00:00Z"));
    }
}
