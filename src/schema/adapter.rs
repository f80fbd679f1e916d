//! Ingestion of raw activity records
//!
//! Converts raw store records into validated [`ActivityEvent`]s. Bad records are
//! dropped one at a time so a single malformed row never blanks a report.

use crate::error::AnalyticsError;
use crate::schema::raw_event::{RawActivityEvent, ValidationError};
use crate::types::ActivityEvent;
use tracing::warn;

/// Result of ingesting a batch of raw records
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub events: Vec<ActivityEvent>,
    pub skipped: Vec<SkippedEvent>,
}

impl IngestOutcome {
    pub fn skipped_count(&self) -> u32 {
        self.skipped.len() as u32
    }
}

/// A raw record that failed validation
#[derive(Debug, Clone)]
pub struct SkippedEvent {
    pub index: usize,
    pub event_id: Option<String>,
    pub reason: ValidationError,
}

/// Adapter from raw store records to typed events
pub struct EventIngestor;

impl EventIngestor {
    /// Parse a JSON string containing an array of raw records
    pub fn parse_array(json: &str) -> Result<Vec<RawActivityEvent>, AnalyticsError> {
        let events: Vec<RawActivityEvent> = serde_json::from_str(json)?;
        Ok(events)
    }

    /// Parse NDJSON (newline-delimited JSON) containing raw records
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<RawActivityEvent>, AnalyticsError> {
        let mut events = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawActivityEvent>(trimmed) {
                Ok(event) => events.push(event),
                Err(e) => {
                    return Err(AnalyticsError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(events)
    }

    /// Validate every record, keeping the good ones and reporting the rest
    pub fn ingest(raw: &[RawActivityEvent]) -> IngestOutcome {
        let mut outcome = IngestOutcome {
            events: Vec::with_capacity(raw.len()),
            skipped: Vec::new(),
        };

        for (index, record) in raw.iter().enumerate() {
            match record.validate() {
                Ok(event) => outcome.events.push(event),
                Err(reason) => {
                    warn!(
                        index,
                        event_id = record.event_id.as_deref().unwrap_or("-"),
                        %reason,
                        "skipping malformed activity event"
                    );
                    outcome.skipped.push(SkippedEvent {
                        index,
                        event_id: record.event_id.clone(),
                        reason,
                    });
                }
            }
        }

        outcome
    }
}
