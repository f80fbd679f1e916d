//! Core types for the usage-analytics engine
//!
//! This module defines the data structures that flow through each stage of the
//! engine: validated activity events in, and the five result groups out (trends,
//! feature stats, time saved, productivity insights and period comparisons).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document categories tracked by the dashboard
///
/// The declaration order is the canonical order used for stable tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    ViolationLetter,
    MeetingMinutes,
    Newsletter,
    Announcement,
}

impl ActivityType {
    /// All tracked categories in canonical order
    pub const ALL: [ActivityType; 4] = [
        ActivityType::ViolationLetter,
        ActivityType::MeetingMinutes,
        ActivityType::Newsletter,
        ActivityType::Announcement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::ViolationLetter => "violation_letter",
            ActivityType::MeetingMinutes => "meeting_minutes",
            ActivityType::Newsletter => "newsletter",
            ActivityType::Announcement => "announcement",
        }
    }

    /// Parse a wire name into a category, `None` for anything unknown
    pub fn from_wire(name: &str) -> Option<Self> {
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str() == name.trim())
    }
}

/// A single validated activity event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub activity_type: ActivityType,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn new(activity_type: ActivityType, timestamp: DateTime<Utc>) -> Self {
        Self {
            activity_type,
            timestamp,
        }
    }
}

/// Per-category counter with every tracked category present
pub type TypeCounts = BTreeMap<ActivityType, u32>;

/// Build a counter map holding a zero for every category
pub fn zeroed_counts() -> TypeCounts {
    ActivityType::ALL.into_iter().map(|t| (t, 0)).collect()
}

/// Bucketing granularity for trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// One calendar period of the trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// `YYYY-MM-DD` for daily/weekly (week start Sunday), `YYYY-MM` for monthly
    pub period_key: String,
    pub counts_by_type: TypeCounts,
    /// Always equal to the sum of `counts_by_type`
    pub total: u32,
}

impl TrendBucket {
    /// An all-zero bucket for a period without activity
    pub fn empty(period_key: String) -> Self {
        Self {
            period_key,
            counts_by_type: zeroed_counts(),
            total: 0,
        }
    }

    pub(crate) fn record(&mut self, activity_type: ActivityType) {
        *self.counts_by_type.entry(activity_type).or_insert(0) += 1;
        self.total += 1;
    }
}

/// Popularity of one category in the comparison window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStat {
    pub activity_type: ActivityType,
    pub count: u32,
    /// Share of the current window's total, 0-100
    pub percentage_of_total: f64,
    /// Change versus the preceding window of equal length
    pub growth_percent: f64,
}

/// Time saved for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub count: u32,
    /// Minutes saved across all tasks of this category
    pub time_saved: f64,
    /// Minutes saved per task of this category
    pub avg_time: f64,
}

impl Default for TypeBreakdown {
    fn default() -> Self {
        Self {
            count: 0,
            time_saved: 0.0,
            avg_time: 0.0,
        }
    }
}

/// Estimated time value of the tool (all durations in minutes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSavedMetrics {
    pub total_time_saved: f64,
    pub time_saved_this_month: f64,
    pub average_time_per_task: f64,
    pub tasks_completed: u32,
    pub efficiency_percent: f64,
    pub breakdown: BTreeMap<ActivityType, TypeBreakdown>,
}

impl TimeSavedMetrics {
    /// Metrics for a user with no recorded activity
    pub fn empty() -> Self {
        Self {
            total_time_saved: 0.0,
            time_saved_this_month: 0.0,
            average_time_per_task: 0.0,
            tasks_completed: 0,
            efficiency_percent: 0.0,
            breakdown: ActivityType::ALL
                .into_iter()
                .map(|t| (t, TypeBreakdown::default()))
                .collect(),
        }
    }
}

/// Behavioral insights derived from the event set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityInsights {
    /// Local hour 0-23 with the most activity
    pub peak_usage_hour: u32,
    /// Weekday name with the most activity
    pub peak_usage_day: String,
    /// `year-W<n>` key of the busiest week, if any
    pub most_productive_week: Option<String>,
    pub average_tasks_per_week: f64,
    /// Evenness of usage across weekdays, 0-100
    pub consistency_score: f64,
    pub streak_days: u32,
    pub recommendations: Vec<String>,
}

/// Month-over-month deltas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOverMonth {
    pub usage_percent: f64,
    pub time_saved_percent: f64,
    pub efficiency_percent: f64,
}

/// Where the current month stands in the user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllTimeStanding {
    /// 1-based rank of the current month by event count
    pub this_month_rank: u32,
    /// `YYYY-MM` of the busiest month
    pub best_month_key: Option<String>,
    pub average_monthly_count: f64,
}

/// Period-over-period comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub vs_last_month: MonthOverMonth,
    pub vs_all_time: AllTimeStanding,
}

impl ComparisonMetrics {
    /// Comparison for a user with no history
    pub fn empty() -> Self {
        Self {
            vs_last_month: MonthOverMonth {
                usage_percent: 0.0,
                time_saved_percent: 0.0,
                efficiency_percent: 0.0,
            },
            vs_all_time: AllTimeStanding {
                this_month_rank: 1,
                best_month_key: None,
                average_monthly_count: 0.0,
            },
        }
    }
}

/// The full analytics payload consumed by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub trends: Vec<TrendBucket>,
    pub features: Vec<FeatureStat>,
    pub time_saved: TimeSavedMetrics,
    pub insights: ProductivityInsights,
    pub comparison: ComparisonMetrics,
    /// Raw records dropped at ingestion
    pub skipped_events: u32,
    /// True when the event fetch failed and every section holds its default
    pub degraded: bool,
}
