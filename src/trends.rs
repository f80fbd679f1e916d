//! Trend bucketing
//!
//! Buckets events into daily, weekly or monthly periods and gap-fills the
//! series so every period in the window is present, oldest first.

use crate::clock::{first_of_month, week_start_sunday, ReferenceFrame};
use crate::config::MAX_WINDOW_DAYS;
use crate::types::{ActivityEvent, Granularity, TrendBucket};
use chrono::{Duration, Months, NaiveDate};
use std::collections::HashMap;

/// Bucket events into a contiguous, ascending series of periods.
///
/// The window covers `window_days` local calendar days ending today, inclusive
/// (a window of 0 is treated as 1, anything above [`MAX_WINDOW_DAYS`] is capped).
/// Events dated before the window or stamped after `frame.now` are not counted,
/// so today's bucket only holds what has already happened. The series runs from
/// the period containing the first day of the window to the period containing
/// today.
pub fn bucket_trends(
    events: &[ActivityEvent],
    window_days: u32,
    granularity: Granularity,
    frame: &ReferenceFrame,
) -> Vec<TrendBucket> {
    let today = frame.today();
    let span = Duration::days(window_days.clamp(1, MAX_WINDOW_DAYS) as i64 - 1);
    let start_date = today.checked_sub_signed(span).unwrap_or(NaiveDate::MIN);

    // Pass 1: bucket by period start
    let mut buckets: HashMap<NaiveDate, TrendBucket> = HashMap::new();
    for event in events {
        if event.timestamp > frame.now {
            continue;
        }
        let date = frame.local_date(event.timestamp);
        if date < start_date {
            continue;
        }
        let period = period_start(date, granularity);
        buckets
            .entry(period)
            .or_insert_with(|| TrendBucket::empty(period_key(period, granularity)))
            .record(event.activity_type);
    }

    // Pass 2: walk every period in range, filling gaps with empty buckets
    let last = period_start(today, granularity);
    let mut cursor = period_start(start_date, granularity);
    let mut series = Vec::new();
    while cursor <= last {
        let bucket = buckets
            .remove(&cursor)
            .unwrap_or_else(|| TrendBucket::empty(period_key(cursor, granularity)));
        series.push(bucket);

        match next_period(cursor, granularity) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    series
}

/// First day of the period containing `date`
fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date,
        Granularity::Weekly => week_start_sunday(date),
        Granularity::Monthly => first_of_month(date),
    }
}

fn period_key(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily | Granularity::Weekly => start.format("%Y-%m-%d").to_string(),
        Granularity::Monthly => start.format("%Y-%m").to_string(),
    }
}

fn next_period(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Daily => start.succ_opt(),
        Granularity::Weekly => start.checked_add_signed(Duration::days(7)),
        Granularity::Monthly => start.checked_add_months(Months::new(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_offset;
    use crate::types::ActivityType;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn event(activity_type: ActivityType, y: i32, m: u32, d: u32, h: u32) -> ActivityEvent {
        ActivityEvent::new(activity_type, Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    fn frame_at(y: i32, m: u32, d: u32) -> ReferenceFrame {
        ReferenceFrame::utc(Utc.with_ymd_and_hms(y, m, d, 18, 0, 0).unwrap())
    }

    fn keys_and_totals(series: &[TrendBucket]) -> Vec<(String, u32)> {
        series
            .iter()
            .map(|b| (b.period_key.clone(), b.total))
            .collect()
    }

    #[test]
    fn test_daily_scenario_with_gaps() {
        let events = vec![
            event(ActivityType::ViolationLetter, 2024, 1, 1, 9),
            event(ActivityType::Newsletter, 2024, 1, 1, 15),
            event(ActivityType::ViolationLetter, 2024, 1, 3, 11),
        ];
        let series = bucket_trends(&events, 5, Granularity::Daily, &frame_at(2024, 1, 5));

        assert_eq!(
            keys_and_totals(&series),
            vec![
                ("2024-01-01".to_string(), 2),
                ("2024-01-02".to_string(), 0),
                ("2024-01-03".to_string(), 1),
                ("2024-01-04".to_string(), 0),
                ("2024-01-05".to_string(), 0),
            ]
        );
        assert_eq!(series[0].counts_by_type[&ActivityType::ViolationLetter], 1);
        assert_eq!(series[0].counts_by_type[&ActivityType::Newsletter], 1);
        assert_eq!(series[0].counts_by_type[&ActivityType::Announcement], 0);
        assert_eq!(series.iter().map(|b| b.total).sum::<u32>(), 3);
    }

    #[test]
    fn test_empty_input_still_fills_series() {
        let series = bucket_trends(&[], 30, Granularity::Daily, &frame_at(2024, 3, 10));
        assert_eq!(series.len(), 30);
        assert!(series.iter().all(|b| b.total == 0));
        assert!(series.iter().all(|b| b.counts_by_type.len() == 4));
        assert_eq!(series[0].period_key, "2024-02-10");
        assert_eq!(series[29].period_key, "2024-03-10");
    }

    #[test]
    fn test_zero_window_is_today_only() {
        let series = bucket_trends(&[], 0, Granularity::Daily, &frame_at(2024, 3, 10));
        assert_eq!(keys_and_totals(&series), vec![("2024-03-10".to_string(), 0)]);
    }

    #[test]
    fn test_events_outside_window_ignored() {
        let events = vec![
            event(ActivityType::Announcement, 2023, 12, 31, 12),
            event(ActivityType::Announcement, 2024, 1, 2, 12),
            // After "now" on a later day
            event(ActivityType::Announcement, 2024, 1, 9, 12),
        ];
        let series = bucket_trends(&events, 5, Granularity::Daily, &frame_at(2024, 1, 5));
        assert_eq!(series.iter().map(|b| b.total).sum::<u32>(), 1);
    }

    #[test]
    fn test_weekly_keys_are_sundays() {
        // 2024-01-17 is a Wednesday; week starts Sunday 2024-01-14
        let events = vec![
            event(ActivityType::MeetingMinutes, 2024, 1, 14, 0),
            event(ActivityType::MeetingMinutes, 2024, 1, 13, 23),
            event(ActivityType::Newsletter, 2024, 1, 17, 10),
        ];
        let series = bucket_trends(&events, 14, Granularity::Weekly, &frame_at(2024, 1, 17));

        // Window 2024-01-04..=2024-01-17 spans the weeks of 12-31, 01-07 and 01-14
        assert_eq!(
            keys_and_totals(&series),
            vec![
                ("2023-12-31".to_string(), 0),
                ("2024-01-07".to_string(), 1),
                ("2024-01-14".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_monthly_series_crosses_year() {
        let events = vec![
            event(ActivityType::ViolationLetter, 2023, 12, 31, 23),
            event(ActivityType::ViolationLetter, 2024, 1, 1, 0),
            event(ActivityType::Newsletter, 2024, 2, 29, 12),
        ];
        let series = bucket_trends(&events, 90, Granularity::Monthly, &frame_at(2024, 3, 1));

        assert_eq!(
            keys_and_totals(&series),
            vec![
                ("2023-12".to_string(), 1),
                ("2024-01".to_string(), 1),
                ("2024-02".to_string(), 1),
                ("2024-03".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_bucket_count_matches_window_length() {
        let frame = frame_at(2024, 6, 15);
        for days in [1u32, 6, 7, 8, 30, 31, 365] {
            let daily = bucket_trends(&[], days, Granularity::Daily, &frame);
            assert_eq!(daily.len() as u32, days);

            let weekly = bucket_trends(&[], days, Granularity::Weekly, &frame);
            let expected = days.div_ceil(7);
            assert!(
                weekly.len() as u32 >= expected && weekly.len() as u32 <= expected + 1,
                "weekly buckets for {} days: {}",
                days,
                weekly.len()
            );

            let monthly = bucket_trends(&[], days, Granularity::Monthly, &frame);
            let expected = days.div_ceil(30);
            assert!(
                monthly.len() as u32 + 1 >= expected && monthly.len() as u32 <= expected + 1,
                "monthly buckets for {} days: {}",
                days,
                monthly.len()
            );
        }
    }

    #[test]
    fn test_bucket_totals_conserve_events() {
        let mut events = Vec::new();
        for day in 1..=28 {
            for (i, activity_type) in ActivityType::ALL.iter().enumerate() {
                if (day as usize + i) % 3 == 0 {
                    events.push(event(*activity_type, 2024, 2, day, 8 + i as u32));
                }
            }
        }
        let series = bucket_trends(&events, 28, Granularity::Daily, &frame_at(2024, 2, 28));

        for bucket in &series {
            assert_eq!(bucket.total, bucket.counts_by_type.values().sum::<u32>());
        }
        assert_eq!(
            series.iter().map(|b| b.total).sum::<u32>() as usize,
            events.len()
        );
    }

    #[test]
    fn test_later_today_not_counted() {
        // frame_at is 18:00; the 20:00 event has not happened yet
        let events = vec![
            event(ActivityType::Newsletter, 2024, 1, 5, 9),
            event(ActivityType::Newsletter, 2024, 1, 5, 20),
        ];
        let series = bucket_trends(&events, 1, Granularity::Daily, &frame_at(2024, 1, 5));
        assert_eq!(keys_and_totals(&series), vec![("2024-01-05".to_string(), 1)]);
    }

    #[test]
    fn test_huge_window_is_capped() {
        let frame = frame_at(2024, 6, 15);
        let capped = bucket_trends(&[], MAX_WINDOW_DAYS, Granularity::Monthly, &frame);
        let huge = bucket_trends(&[], u32::MAX, Granularity::Monthly, &frame);
        assert_eq!(huge, capped);
        assert_eq!(huge.last().map(|b| b.period_key.as_str()), Some("2024-06"));
    }

    #[test]
    fn test_window_clamped_at_earliest_date() {
        let frame = ReferenceFrame::utc(NaiveDate::MIN.and_hms_opt(12, 0, 0).unwrap().and_utc());
        let series = bucket_trends(&[], 30, Granularity::Daily, &frame);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_bucketing_uses_reference_timezone() {
        // 2024-01-05T02:00Z is still Jan 4 in UTC-5
        let events = vec![event(ActivityType::Newsletter, 2024, 1, 5, 2)];
        let frame = ReferenceFrame::new(
            Utc.with_ymd_and_hms(2024, 1, 5, 18, 0, 0).unwrap(),
            parse_offset("-05:00").unwrap(),
        );
        let series = bucket_trends(&events, 2, Granularity::Daily, &frame);
        assert_eq!(
            keys_and_totals(&series),
            vec![("2024-01-04".to_string(), 1), ("2024-01-05".to_string(), 0)]
        );
    }
}
