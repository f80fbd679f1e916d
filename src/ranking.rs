//! Feature ranking
//!
//! Counts activity per category over a rolling window, with each category's share
//! of the window and its growth against the window immediately before it.

use crate::clock::ReferenceFrame;
use crate::stats::{percent_change, share_percent};
use crate::types::{zeroed_counts, ActivityEvent, ActivityType, FeatureStat, TypeCounts};
use chrono::{DateTime, Duration, Utc};

/// Rank all tracked categories by activity in the last `compare_window_days`.
///
/// The current window is `(now - N days, now]`, the previous window is the N
/// days before it, both clamped at the earliest representable instant. Every
/// category is always present. Sorting is by count,
/// descending, with ties kept in canonical category order.
pub fn rank_features(
    events: &[ActivityEvent],
    compare_window_days: u32,
    frame: &ReferenceFrame,
) -> Vec<FeatureStat> {
    let window = Duration::days(compare_window_days as i64);
    let current_start = frame
        .now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let previous_start = current_start
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut current = zeroed_counts();
    let mut previous = zeroed_counts();

    for event in events {
        let ts = event.timestamp;
        if ts > current_start && ts <= frame.now {
            *current.entry(event.activity_type).or_insert(0) += 1;
        } else if ts > previous_start && ts <= current_start {
            *previous.entry(event.activity_type).or_insert(0) += 1;
        }
    }

    let current_total: u32 = current.values().sum();

    // BTreeMap iteration is canonical order; sort_by is stable
    let mut stats: Vec<FeatureStat> = current
        .iter()
        .map(|(&activity_type, &count)| FeatureStat {
            activity_type,
            count,
            percentage_of_total: share_percent(count as f64, current_total as f64),
            growth_percent: percent_change(count_of(&previous, activity_type), count as f64),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));

    stats
}

fn count_of(counts: &TypeCounts, activity_type: ActivityType) -> f64 {
    counts.get(&activity_type).copied().unwrap_or(0) as f64
}
