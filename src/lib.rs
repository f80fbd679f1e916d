//! Usage Analytics - aggregation engine for document-generation activity logs
//!
//! Turns an unordered log of `(activity_type, timestamp)` events into dashboard
//! analytics through independent, pure stages over one event snapshot:
//! event reading → ingestion → trend bucketing, feature ranking, time-value
//! estimation, behavior analysis and period comparison → report export.
//!
//! ## Modules
//!
//! - **Ingestion**: [`reader`] fetches raw records, [`schema`] validates them
//! - **Stages**: [`trends`], [`ranking`], [`time_value`], [`insights`], [`comparison`]
//! - **Orchestration**: [`pipeline`] merges the stages, [`encoder`] wraps exports

pub mod clock;
pub mod comparison;
pub mod config;
pub mod encoder;
pub mod error;
pub mod insights;
pub mod logging;
pub mod pipeline;
pub mod ranking;
pub mod reader;
pub mod schema;
pub mod stats;
pub mod time_value;
pub mod trends;
pub mod types;

pub use clock::ReferenceFrame;
pub use config::{EngineConfig, TaskMinutes, TimeValueTable};
pub use encoder::ReportEncoder;
pub use error::AnalyticsError;
pub use pipeline::{events_to_report_json, AnalyticsEngine};
pub use reader::{EventReader, FailingEventReader, InMemoryEventReader, JsonEventReader};
pub use schema::{EventIngestor, RawActivityEvent};
pub use types::{
    ActivityEvent, ActivityType, AnalyticsReport, ComparisonMetrics, FeatureStat, Granularity,
    ProductivityInsights, TimeSavedMetrics, TrendBucket,
};

// Stage entry points
pub use comparison::compare_periods;
pub use insights::analyze_behavior;
pub use ranking::rank_features;
pub use time_value::estimate_time_saved;
pub use trends::bucket_trends;

/// Engine version embedded in all exports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for exports
pub const PRODUCER_NAME: &str = "usage-analytics";
