//! Database row types. These map directly to SQLite rows.

use chrono::{DateTime, NaiveDateTime, Utc};
use quotebot_types::models::QuoteState;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRow {
    pub id: i64,
    pub channel: String,
    pub author: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub content: String,
    pub state: QuoteState,
}

/// Outcome of a count-then-fetch read: `quote` is the `nth` of `total`
/// live matches, or `None` when `nth` is out of range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub total: u64,
    pub nth: u64,
    pub quote: Option<QuoteRow>,
}

/// Row ordering for single-row fetches. `Latest` walks ids descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Oldest,
    Latest,
}

impl Order {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Oldest => "ASC",
            Self::Latest => "DESC",
        }
    }
}

/// SQLite's `CURRENT_TIMESTAMP` is "YYYY-MM-DD HH:MM:SS" in UTC without a zone.
pub(crate) fn parse_timestamp(id: i64, raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| warn!("Corrupt timestamp '{}' on quote {}: {}", raw, id, e))
        .ok()
}
