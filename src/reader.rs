//! Event readers
//!
//! The engine reads activity through the [`EventReader`] trait and never touches
//! storage itself. Implementations return raw records; validation happens later
//! at ingestion so malformed rows can be counted rather than lost.

use crate::error::AnalyticsError;
use crate::schema::{EventIngestor, RawActivityEvent};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Source of raw activity records for a user
pub trait EventReader {
    /// Fetch a user's records, optionally only those at or after `since`
    fn fetch_events(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawActivityEvent>, AnalyticsError>;
}

/// Keep records at or after `since`.
///
/// Records whose timestamp cannot be parsed are kept so ingestion can report them.
fn since_filter(record: &RawActivityEvent, since: Option<DateTime<Utc>>) -> bool {
    match (since, record.parsed_timestamp()) {
        (Some(since), Some(ts)) => ts >= since,
        _ => true,
    }
}

/// Reader over per-user records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventReader {
    by_user: HashMap<String, Vec<RawActivityEvent>>,
}

impl InMemoryEventReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: impl Into<String>, record: RawActivityEvent) {
        self.by_user.entry(user_id.into()).or_default().push(record);
    }

    pub fn with_events(
        mut self,
        user_id: impl Into<String>,
        records: impl IntoIterator<Item = RawActivityEvent>,
    ) -> Self {
        self.by_user
            .entry(user_id.into())
            .or_default()
            .extend(records);
        self
    }
}

impl EventReader for InMemoryEventReader {
    fn fetch_events(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawActivityEvent>, AnalyticsError> {
        Ok(self
            .by_user
            .get(user_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| since_filter(r, since))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Reader over an exported JSON array or NDJSON payload.
///
/// Records that carry a `user_id` are filtered to the requested user; records
/// without one are assumed to belong to whoever asks.
#[derive(Debug, Clone)]
pub struct JsonEventReader {
    records: Vec<RawActivityEvent>,
}

impl JsonEventReader {
    pub fn from_json_array(json: &str) -> Result<Self, AnalyticsError> {
        Ok(Self {
            records: EventIngestor::parse_array(json)?,
        })
    }

    pub fn from_ndjson(ndjson: &str) -> Result<Self, AnalyticsError> {
        Ok(Self {
            records: EventIngestor::parse_ndjson(ndjson)?,
        })
    }
}

impl EventReader for JsonEventReader {
    fn fetch_events(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawActivityEvent>, AnalyticsError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.user_id.as_deref().map_or(true, |owner| owner == user_id))
            .filter(|r| since_filter(r, since))
            .cloned()
            .collect())
    }
}

/// Reader that always fails, for exercising degraded reports
#[derive(Debug, Clone)]
pub struct FailingEventReader {
    reason: String,
}

impl FailingEventReader {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl EventReader for FailingEventReader {
    fn fetch_events(
        &self,
        _user_id: &str,
        _since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawActivityEvent>, AnalyticsError> {
        Err(AnalyticsError::Read(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_in_memory_reader_by_user() {
        let reader = InMemoryEventReader::new()
            .with_events(
                "alice",
                vec![
                    RawActivityEvent::new("newsletter", "2024-01-01T10:00:00Z"),
                    RawActivityEvent::new("announcement", "2024-02-01T10:00:00Z"),
                ],
            )
            .with_events(
                "bob",
                vec![RawActivityEvent::new("newsletter", "2024-01-05T10:00:00Z")],
            );

        assert_eq!(reader.fetch_events("alice", None).unwrap().len(), 2);
        assert_eq!(reader.fetch_events("bob", None).unwrap().len(), 1);
        assert!(reader.fetch_events("carol", None).unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_reader_since_keeps_unparseable() {
        let mut reader = InMemoryEventReader::new();
        reader.insert("alice", RawActivityEvent::new("newsletter", "2024-01-01T10:00:00Z"));
        reader.insert("alice", RawActivityEvent::new("newsletter", "2024-03-01T10:00:00Z"));
        reader.insert("alice", RawActivityEvent::new("newsletter", "garbage"));

        let since = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let records = reader.fetch_events("alice", Some(since)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp.as_deref(), Some("2024-03-01T10:00:00Z"));
        assert_eq!(records[1].timestamp.as_deref(), Some("garbage"));
    }

    #[test]
    fn test_json_reader_filters_owner() {
        let json = r#"[
            {"user_id": "alice", "activity_type": "newsletter", "timestamp": "2024-01-01T10:00:00Z"},
            {"user_id": "bob", "activity_type": "newsletter", "timestamp": "2024-01-01T10:00:00Z"},
            {"activity_type": "announcement", "timestamp": "2024-01-02T10:00:00Z"}
        ]"#;
        let reader = JsonEventReader::from_json_array(json).unwrap();
        let records = reader.fetch_events("alice", None).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.user_id.as_deref() != Some("bob")));
    }

    #[test]
    fn test_json_reader_from_ndjson() {
        let ndjson = "{\"activity_type\": \"meeting_minutes\", \"timestamp\": \"2024-01-01T10:00:00Z\"}\n";
        let reader = JsonEventReader::from_ndjson(ndjson).unwrap();
        assert_eq!(reader.fetch_events("anyone", None).unwrap().len(), 1);
    }

    #[test]
    fn test_failing_reader() {
        let reader = FailingEventReader::new("store unavailable");
        match reader.fetch_events("alice", None) {
            Err(AnalyticsError::Read(reason)) => assert_eq!(reason, "store unavailable"),
            other => panic!("expected read error, got {:?}", other),
        }
    }
}
