//! Period comparison
//!
//! Compares the current calendar month against the previous one and ranks the
//! current month within the user's full history.
//!
//! Months here are calendar slices starting on the 1st, unlike the rolling
//! N-day windows of [`crate::ranking`]. The two conventions are kept apart on
//! purpose; see DESIGN.md.

use crate::clock::ReferenceFrame;
use crate::config::TimeValueTable;
use crate::stats::{percent_change, round1, safe_div};
use crate::time_value::efficiency_percent;
use crate::types::{ActivityEvent, AllTimeStanding, ComparisonMetrics, MonthOverMonth};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Usage and time-value totals for one slice of events
#[derive(Debug, Default, Clone, Copy)]
struct SliceTotals {
    count: u32,
    manual: f64,
    ai: f64,
}

impl SliceTotals {
    fn add(&mut self, event: &ActivityEvent, table: &TimeValueTable) {
        let minutes = table.minutes(event.activity_type);
        self.count += 1;
        self.manual += minutes.manual;
        self.ai += minutes.ai;
    }

    fn time_saved(&self) -> f64 {
        self.manual - self.ai
    }

    fn efficiency(&self) -> f64 {
        efficiency_percent(self.manual, self.ai)
    }
}

/// Compare this calendar month to last month and to all months on record
pub fn compare_periods(
    events: &[ActivityEvent],
    table: &TimeValueTable,
    frame: &ReferenceFrame,
) -> ComparisonMetrics {
    let this_month_start = frame.month_start();
    let last_month_start = frame.previous_month_start();

    let mut this_month = SliceTotals::default();
    let mut last_month = SliceTotals::default();
    let mut monthly: BTreeMap<String, u32> = BTreeMap::new();

    for event in events {
        let ts = event.timestamp;
        if in_range(ts, this_month_start, frame.now, true) {
            this_month.add(event, table);
        } else if in_range(ts, last_month_start, this_month_start, false) {
            last_month.add(event, table);
        }

        *monthly.entry(month_key(frame, ts)).or_insert(0) += 1;
    }

    let vs_last_month = MonthOverMonth {
        usage_percent: percent_change(last_month.count as f64, this_month.count as f64),
        time_saved_percent: percent_change(last_month.time_saved(), this_month.time_saved()),
        efficiency_percent: percent_change(last_month.efficiency(), this_month.efficiency()),
    };

    ComparisonMetrics {
        vs_last_month,
        vs_all_time: all_time_standing(&monthly, &month_key(frame, frame.now)),
    }
}

fn in_range(
    ts: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    end_inclusive: bool,
) -> bool {
    ts >= start && (ts < end || (end_inclusive && ts == end))
}

/// `YYYY-MM` of an instant in the reference timezone
fn month_key(frame: &ReferenceFrame, ts: DateTime<Utc>) -> String {
    frame.local_date(ts).format("%Y-%m").to_string()
}

fn all_time_standing(monthly: &BTreeMap<String, u32>, current_key: &str) -> AllTimeStanding {
    // BTreeMap order is chronological; the stable sort keeps earlier months first on ties
    let mut ranking: Vec<(&String, u32)> = monthly.iter().map(|(k, &v)| (k, v)).collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));

    let this_month_rank = ranking
        .iter()
        .position(|(key, _)| key.as_str() == current_key)
        .map_or(1, |idx| idx as u32 + 1);

    let total: u32 = monthly.values().sum();

    AllTimeStanding {
        this_month_rank,
        best_month_key: ranking.first().map(|(key, _)| (*key).clone()),
        average_monthly_count: round1(safe_div(total as f64, monthly.len() as f64)),
    }
}
