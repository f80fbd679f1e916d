//! Time-value estimation
//!
//! Converts activity counts into estimated minutes saved using the static
//! manual-versus-AI table from [`TimeValueTable`].

use crate::clock::ReferenceFrame;
use crate::config::TimeValueTable;
use crate::stats::{round1, safe_div, share_percent};
use crate::types::{ActivityEvent, TimeSavedMetrics};

/// Estimate the time the tool saved across `events`.
///
/// Events at or after the start of the current local calendar month also count
/// toward `time_saved_this_month`.
pub fn estimate_time_saved(
    events: &[ActivityEvent],
    table: &TimeValueTable,
    frame: &ReferenceFrame,
) -> TimeSavedMetrics {
    let month_start = frame.month_start();

    let mut metrics = TimeSavedMetrics::empty();
    let mut total_manual = 0.0;
    let mut total_ai = 0.0;

    for event in events {
        let minutes = table.minutes(event.activity_type);
        let saved = minutes.saved();

        total_manual += minutes.manual;
        total_ai += minutes.ai;
        metrics.total_time_saved += saved;
        metrics.tasks_completed += 1;
        if event.timestamp >= month_start {
            metrics.time_saved_this_month += saved;
        }

        let entry = metrics.breakdown.entry(event.activity_type).or_default();
        entry.count += 1;
        entry.time_saved += saved;
    }

    for entry in metrics.breakdown.values_mut() {
        entry.avg_time = round1(safe_div(entry.time_saved, entry.count as f64));
    }

    metrics.average_time_per_task = round1(safe_div(
        metrics.total_time_saved,
        metrics.tasks_completed as f64,
    ));
    metrics.efficiency_percent = efficiency_percent(total_manual, total_ai);

    metrics
}

/// Share of manual minutes eliminated, 0-100
pub fn efficiency_percent(total_manual: f64, total_ai: f64) -> f64 {
    share_percent(total_manual - total_ai, total_manual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskMinutes;
    use crate::types::{ActivityType, TypeBreakdown};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn frame() -> ReferenceFrame {
        ReferenceFrame::utc(Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap())
    }

    fn event(activity_type: ActivityType, m: u32, d: u32) -> ActivityEvent {
        ActivityEvent::new(activity_type, Utc.with_ymd_and_hms(2024, m, d, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_single_violation_letter() {
        let events = vec![event(ActivityType::ViolationLetter, 5, 2)];
        let metrics = estimate_time_saved(&events, &TimeValueTable::default(), &frame());

        assert_eq!(metrics.total_time_saved, 42.0);
        assert_eq!(metrics.time_saved_this_month, 42.0);
        assert_eq!(metrics.tasks_completed, 1);
        assert_eq!(metrics.average_time_per_task, 42.0);
        assert_eq!(metrics.efficiency_percent, 93.3);
        assert_eq!(
            metrics.breakdown[&ActivityType::ViolationLetter],
            TypeBreakdown {
                count: 1,
                time_saved: 42.0,
                avg_time: 42.0,
            }
        );
    }

    #[test]
    fn test_empty_events_are_zero_not_nan() {
        let metrics = estimate_time_saved(&[], &TimeValueTable::default(), &frame());
        assert_eq!(metrics, TimeSavedMetrics::empty());
        assert!(metrics.efficiency_percent.is_finite());
        assert!(metrics.average_time_per_task.is_finite());
        assert_eq!(metrics.breakdown.len(), 4);
    }

    #[test]
    fn test_this_month_slice() {
        let events = vec![
            event(ActivityType::Announcement, 4, 30),
            event(ActivityType::Announcement, 5, 1),
            event(ActivityType::Newsletter, 5, 19),
        ];
        let metrics = estimate_time_saved(&events, &TimeValueTable::default(), &frame());

        // announcement saves 28, newsletter saves 82
        assert_eq!(metrics.total_time_saved, 28.0 + 28.0 + 82.0);
        assert_eq!(metrics.time_saved_this_month, 28.0 + 82.0);
        assert_eq!(metrics.tasks_completed, 3);
        assert_eq!(metrics.average_time_per_task, 46.0);
    }

    #[test]
    fn test_mixed_efficiency() {
        let events = vec![
            event(ActivityType::MeetingMinutes, 5, 3),
            event(ActivityType::Newsletter, 5, 4),
        ];
        let metrics = estimate_time_saved(&events, &TimeValueTable::default(), &frame());
        // manual 150, ai 13
        assert_eq!(metrics.efficiency_percent, round1(137.0 / 150.0 * 100.0));
        assert_eq!(metrics.breakdown[&ActivityType::ViolationLetter].count, 0);
        assert_eq!(metrics.breakdown[&ActivityType::ViolationLetter].avg_time, 0.0);
    }

    #[test]
    fn test_alternate_table() {
        let table = TimeValueTable::new(BTreeMap::from([
            (ActivityType::ViolationLetter, TaskMinutes::new(10.0, 10.0)),
            (ActivityType::MeetingMinutes, TaskMinutes::new(0.0, 0.0)),
            (ActivityType::Newsletter, TaskMinutes::new(20.0, 5.0)),
            (ActivityType::Announcement, TaskMinutes::new(8.0, 4.0)),
        ]))
        .unwrap();

        let events = vec![
            event(ActivityType::ViolationLetter, 5, 3),
            event(ActivityType::MeetingMinutes, 5, 3),
        ];
        let metrics = estimate_time_saved(&events, &table, &frame());

        assert_eq!(metrics.total_time_saved, 0.0);
        assert_eq!(metrics.efficiency_percent, 0.0);

        let only_zero_manual = vec![event(ActivityType::MeetingMinutes, 5, 3)];
        let metrics = estimate_time_saved(&only_zero_manual, &table, &frame());
        assert_eq!(metrics.efficiency_percent, 0.0);
        assert_eq!(metrics.tasks_completed, 1);
    }
}
