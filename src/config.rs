//! Engine configuration
//!
//! Holds the reference timezone, window sizes and the static time-value table.
//! Configuration is plain data: build it with the `with_*` methods or load it
//! from JSON, then hand it to [`crate::pipeline::AnalyticsEngine`].

use crate::clock::parse_offset;
use crate::error::AnalyticsError;
use crate::types::{ActivityType, Granularity};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default trend window in days
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 30;

/// Default feature comparison window in days
pub const DEFAULT_COMPARE_WINDOW_DAYS: u32 = 30;

/// Largest accepted trend or comparison window (roughly a century)
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Manual versus AI-assisted minutes for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskMinutes {
    /// Minutes a person needs without the tool
    pub manual: f64,
    /// Minutes the tool needs
    pub ai: f64,
}

impl TaskMinutes {
    pub const fn new(manual: f64, ai: f64) -> Self {
        Self { manual, ai }
    }

    /// Minutes saved per task
    pub fn saved(&self) -> f64 {
        self.manual - self.ai
    }
}

/// Fixed per-category time estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<ActivityType, TaskMinutes>")]
#[serde(into = "BTreeMap<ActivityType, TaskMinutes>")]
pub struct TimeValueTable {
    entries: BTreeMap<ActivityType, TaskMinutes>,
}

impl Default for TimeValueTable {
    fn default() -> Self {
        Self {
            entries: BTreeMap::from([
                (ActivityType::ViolationLetter, TaskMinutes::new(45.0, 3.0)),
                (ActivityType::MeetingMinutes, TaskMinutes::new(60.0, 5.0)),
                (ActivityType::Newsletter, TaskMinutes::new(90.0, 8.0)),
                (ActivityType::Announcement, TaskMinutes::new(30.0, 2.0)),
            ]),
        }
    }
}

impl TimeValueTable {
    /// Build a table; every category must be present
    pub fn new(entries: BTreeMap<ActivityType, TaskMinutes>) -> Result<Self, AnalyticsError> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    pub fn minutes(&self, activity_type: ActivityType) -> TaskMinutes {
        self.entries
            .get(&activity_type)
            .copied()
            .unwrap_or(TaskMinutes::new(0.0, 0.0))
    }

    fn validate(&self) -> Result<(), AnalyticsError> {
        for activity_type in ActivityType::ALL {
            let minutes = self.entries.get(&activity_type).ok_or_else(|| {
                AnalyticsError::InvalidConfig(format!(
                    "time value missing for {}",
                    activity_type.as_str()
                ))
            })?;
            if !(minutes.manual.is_finite() && minutes.ai.is_finite())
                || minutes.ai < 0.0
                || minutes.manual < minutes.ai
            {
                return Err(AnalyticsError::InvalidConfig(format!(
                    "time value for {} must satisfy 0 <= ai <= manual (got manual={}, ai={})",
                    activity_type.as_str(),
                    minutes.manual,
                    minutes.ai
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<ActivityType, TaskMinutes>> for TimeValueTable {
    type Error = AnalyticsError;

    fn try_from(entries: BTreeMap<ActivityType, TaskMinutes>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<TimeValueTable> for BTreeMap<ActivityType, TaskMinutes> {
    fn from(table: TimeValueTable) -> Self {
        table.entries
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reference timezone: `UTC` or a fixed `±HH:MM` offset
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Days covered by the trend series
    #[serde(default = "default_trend_window_days")]
    pub trend_window_days: u32,

    #[serde(default)]
    pub granularity: Granularity,

    /// Length of the current and previous feature windows
    #[serde(default = "default_compare_window_days")]
    pub compare_window_days: u32,

    #[serde(default)]
    pub time_values: TimeValueTable,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_trend_window_days() -> u32 {
    DEFAULT_TREND_WINDOW_DAYS
}

fn default_compare_window_days() -> u32 {
    DEFAULT_COMPARE_WINDOW_DAYS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            granularity: Granularity::Daily,
            compare_window_days: DEFAULT_COMPARE_WINDOW_DAYS,
            time_values: TimeValueTable::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, AnalyticsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_trend_window(mut self, days: u32, granularity: Granularity) -> Self {
        self.trend_window_days = days;
        self.granularity = granularity;
        self
    }

    pub fn with_compare_window(mut self, days: u32) -> Self {
        self.compare_window_days = days;
        self
    }

    pub fn with_time_values(mut self, table: TimeValueTable) -> Self {
        self.time_values = table;
        self
    }

    /// Resolved reference offset
    pub fn offset(&self) -> Result<FixedOffset, AnalyticsError> {
        parse_offset(&self.timezone)
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.offset()?;
        if self.compare_window_days == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "compare_window_days must be at least 1".to_string(),
            ));
        }
        for (name, days) in [
            ("trend_window_days", self.trend_window_days),
            ("compare_window_days", self.compare_window_days),
        ] {
            if days > MAX_WINDOW_DAYS {
                return Err(AnalyticsError::InvalidConfig(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_WINDOW_DAYS, days
                )));
            }
        }
        self.time_values.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_table_values() {
        let table = TimeValueTable::default();
        let letter = table.minutes(ActivityType::ViolationLetter);
        assert_eq!(letter, TaskMinutes::new(45.0, 3.0));
        assert_eq!(letter.saved(), 42.0);
    }

    #[test]
    fn test_table_requires_every_category() {
        let partial = BTreeMap::from([(ActivityType::Newsletter, TaskMinutes::new(10.0, 1.0))]);
        assert!(matches!(
            TimeValueTable::new(partial),
            Err(AnalyticsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_table_rejects_ai_slower_than_manual() {
        let mut entries: BTreeMap<_, _> = TimeValueTable::default().into();
        entries.insert(ActivityType::Announcement, TaskMinutes::new(5.0, 10.0));
        assert!(TimeValueTable::new(entries).is_err());
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_from_json_overrides() {
        let json = r#"{
            "timezone": "+02:00",
            "trend_window_days": 90,
            "granularity": "weekly",
            "time_values": {
                "violation_letter": {"manual": 20.0, "ai": 2.0},
                "meeting_minutes": {"manual": 30.0, "ai": 3.0},
                "newsletter": {"manual": 40.0, "ai": 4.0},
                "announcement": {"manual": 10.0, "ai": 1.0}
            }
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.trend_window_days, 90);
        assert_eq!(config.granularity, Granularity::Weekly);
        assert_eq!(config.compare_window_days, DEFAULT_COMPARE_WINDOW_DAYS);
        assert_eq!(config.offset().unwrap().local_minus_utc(), 7200);
        assert_eq!(
            config.time_values.minutes(ActivityType::Newsletter),
            TaskMinutes::new(40.0, 4.0)
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::default()
            .with_timezone("Mars/Olympus")
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_compare_window(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_rejects_oversized_windows() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"compare_window_days": 200000000}"#),
            Err(AnalyticsError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"trend_window_days": 4000000000}"#),
            Err(AnalyticsError::InvalidConfig(_))
        ));
        assert!(EngineConfig::default()
            .with_trend_window(MAX_WINDOW_DAYS, Granularity::Monthly)
            .with_compare_window(MAX_WINDOW_DAYS)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_config_rejects_incomplete_table_json() {
        let json = r#"{"time_values": {"newsletter": {"manual": 40.0, "ai": 4.0}}}"#;
        assert!(EngineConfig::from_json(json).is_err());
    }
}
