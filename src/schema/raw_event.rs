//! Raw activity event wire shape
//!
//! Records arrive from the event store loosely typed: the activity type is a
//! free string and the timestamp may be missing or malformed. Validation turns a
//! record into an [`ActivityEvent`] or explains why it was rejected.

use crate::types::{ActivityEvent, ActivityType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An activity record as stored upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActivityEvent {
    /// Store-assigned identifier, used only in diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub activity_type: String,
    /// RFC 3339 instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RawActivityEvent {
    pub fn new(activity_type: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            event_id: None,
            user_id: None,
            activity_type: activity_type.into(),
            timestamp: Some(timestamp.into()),
        }
    }

    /// Attach an owning user
    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Parsed timestamp, if present and well formed
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Validate the record and convert it to a typed event
    pub fn validate(&self) -> Result<ActivityEvent, ValidationError> {
        let activity_type = ActivityType::from_wire(&self.activity_type).ok_or_else(|| {
            ValidationError::UnknownActivityType(self.activity_type.clone())
        })?;

        let raw_ts = self
            .timestamp
            .as_deref()
            .filter(|ts| !ts.trim().is_empty())
            .ok_or(ValidationError::MissingTimestamp)?;

        let timestamp = DateTime::parse_from_rfc3339(raw_ts.trim())
            .map_err(|e| ValidationError::InvalidTimestamp {
                value: raw_ts.to_string(),
                reason: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(ActivityEvent::new(activity_type, timestamp))
    }
}

/// Reasons a raw record is rejected at ingestion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown activity type: {0}")]
    UnknownActivityType(String),

    #[error("Missing timestamp")]
    MissingTimestamp,

    #[error("Invalid timestamp {value}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}
