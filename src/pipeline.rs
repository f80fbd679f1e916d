//! Pipeline orchestration
//!
//! This module provides the public entry points of the engine. It reads events
//! through an [`EventReader`], validates them, runs the five independent stages
//! over the same immutable snapshot and merges the results into one report.

use crate::clock::ReferenceFrame;
use crate::comparison::compare_periods;
use crate::config::EngineConfig;
use crate::encoder::ReportEncoder;
use crate::error::AnalyticsError;
use crate::insights::analyze_behavior;
use crate::ranking::rank_features;
use crate::reader::EventReader;
use crate::schema::EventIngestor;
use crate::time_value::estimate_time_saved;
use crate::trends::bucket_trends;
use crate::types::{ActivityEvent, AnalyticsReport};
use tracing::{debug, warn};

/// User id stamped on one-shot exports
const ANONYMOUS_USER: &str = "anonymous";

/// Convert a JSON array of raw activity records into an exported report
/// (stateless, one-shot, evaluated at the current instant).
///
/// # Arguments
/// * `events_json` - JSON array of raw activity records
/// * `timezone` - Reference timezone (`UTC` or `±HH:MM`)
///
/// # Returns
/// Report export JSON string
///
/// # Example
/// ```ignore
/// let export = events_to_report_json(events_json, "+01:00")?;
/// ```
pub fn events_to_report_json(events_json: &str, timezone: &str) -> Result<String, AnalyticsError> {
    let config = EngineConfig::default().with_timezone(timezone);
    config.validate()?;
    let frame = ReferenceFrame::current(config.offset()?);

    // Stage 1: Parse raw records
    let raw = EventIngestor::parse_array(events_json)?;

    // Stage 2: Validate, skipping malformed records
    let outcome = EventIngestor::ingest(&raw);

    // Stage 3: Aggregate
    let engine = AnalyticsEngine::new(config);
    let mut report = engine.analyze(&outcome.events, &frame);
    report.skipped_events = outcome.skipped_count();

    // Stage 4: Encode
    ReportEncoder::new().encode_to_json(ANONYMOUS_USER, report)
}

/// Aggregation engine configured once and reused across users.
///
/// The engine holds no per-user state; every call recomputes from the event
/// snapshot it is given.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: EngineConfig,
}

impl AnalyticsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Build an engine from JSON configuration
    pub fn from_config_json(json: &str) -> Result<Self, AnalyticsError> {
        Ok(Self::new(EngineConfig::from_json(json)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reference frame at the current instant in the configured timezone
    pub fn current_frame(&self) -> Result<ReferenceFrame, AnalyticsError> {
        Ok(ReferenceFrame::current(self.config.offset()?))
    }

    /// Run every stage over a validated event snapshot
    pub fn analyze(&self, events: &[ActivityEvent], frame: &ReferenceFrame) -> AnalyticsReport {
        let config = &self.config;

        let report = AnalyticsReport {
            trends: bucket_trends(events, config.trend_window_days, config.granularity, frame),
            features: rank_features(events, config.compare_window_days, frame),
            time_saved: estimate_time_saved(events, &config.time_values, frame),
            insights: analyze_behavior(events, frame),
            comparison: compare_periods(events, &config.time_values, frame),
            skipped_events: 0,
            degraded: false,
        };

        debug!(
            events = events.len(),
            buckets = report.trends.len(),
            tasks = report.time_saved.tasks_completed,
            streak = report.insights.streak_days,
            "analytics report assembled"
        );

        report
    }

    /// Every section at its empty value, flagged as degraded
    pub fn degraded_report(&self, frame: &ReferenceFrame) -> AnalyticsReport {
        let mut report = self.analyze(&[], frame);
        report.degraded = true;
        report
    }

    /// Fetch, validate and analyze a user's activity.
    ///
    /// A failed fetch never escapes: it is logged and the degraded report is
    /// returned instead.
    pub fn report(
        &self,
        reader: &dyn EventReader,
        user_id: &str,
        frame: &ReferenceFrame,
    ) -> AnalyticsReport {
        let raw = match reader.fetch_events(user_id, None) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(user_id, error = %e, "event fetch failed, returning default analytics");
                return self.degraded_report(frame);
            }
        };

        let outcome = EventIngestor::ingest(&raw);
        let mut report = self.analyze(&outcome.events, frame);
        report.skipped_events = outcome.skipped_count();
        report
    }

    /// Fetch and analyze, then wrap the result in an export envelope
    pub fn export_json(
        &self,
        reader: &dyn EventReader,
        user_id: &str,
        frame: &ReferenceFrame,
        encoder: &ReportEncoder,
    ) -> Result<String, AnalyticsError> {
        let report = self.report(reader, user_id, frame);
        encoder.encode_to_json(user_id, report)
    }
}
