//! Behavioral insights
//!
//! Derives peak usage times, the busiest week, a weekday consistency score, the
//! current daily streak and an ordered list of recommendations from the raw
//! event set.

use crate::clock::{weekday_index, weekday_name, ReferenceFrame};
use crate::stats::{round1, safe_div};
use crate::types::{ActivityEvent, ProductivityInsights};
use chrono::{Datelike, NaiveDate, Timelike};
use std::collections::{BTreeMap, BTreeSet};

/// Recommendation shown before any activity is recorded
pub const NO_DATA_RECOMMENDATION: &str =
    "Start using the document tools to see personalized insights here.";

/// Recommendation shown when no rule fires
pub const ALL_GOOD_RECOMMENDATION: &str =
    "You're making great use of the document tools. Keep it up!";

/// Consistency below this suggests a routine
const LOW_CONSISTENCY_THRESHOLD: f64 = 60.0;

/// Weekly average below this suggests more frequent use
const LOW_WEEKLY_TASKS_THRESHOLD: f64 = 5.0;

/// Streak length that earns congratulations
const LONG_STREAK_DAYS: u32 = 7;

/// Task count for the power-user acknowledgment
const POWER_USER_TASKS: u32 = 50;

/// Business hours, inclusive
const BUSINESS_HOURS: std::ops::RangeInclusive<u32> = 9..=17;

impl ProductivityInsights {
    /// Insights for a user with no recorded activity
    pub fn empty() -> Self {
        Self {
            peak_usage_hour: 0,
            peak_usage_day: "N/A".to_string(),
            most_productive_week: None,
            average_tasks_per_week: 0.0,
            consistency_score: 0.0,
            streak_days: 0,
            recommendations: vec![NO_DATA_RECOMMENDATION.to_string()],
        }
    }
}

/// Analyze usage behavior across all events
pub fn analyze_behavior(events: &[ActivityEvent], frame: &ReferenceFrame) -> ProductivityInsights {
    if events.is_empty() {
        return ProductivityInsights::empty();
    }

    let mut hour_counts = [0u32; 24];
    let mut day_counts = [0u32; 7];
    let mut week_counts: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    let mut active_dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for event in events {
        let local = event.timestamp.with_timezone(&frame.offset);
        let date = local.date_naive();

        hour_counts[local.hour() as usize] += 1;
        day_counts[weekday_index(local.weekday())] += 1;
        *week_counts.entry(week_of_year(date)).or_insert(0) += 1;
        active_dates.insert(date);
    }

    let peak_usage_hour = arg_max(&hour_counts) as u32;
    let peak_usage_day = weekday_name(arg_max(&day_counts)).to_string();
    let most_productive_week = busiest_week(&week_counts)
        .map(|(year, week)| format!("{}-W{}", year, week));

    let total_tasks = events.len() as u32;
    let average_tasks_per_week = round1(safe_div(total_tasks as f64, week_counts.len() as f64));
    let consistency = consistency_score(&day_counts);
    let streak = streak_days(&active_dates, frame.today());

    let recommendations = recommend(&RuleContext {
        consistency_score: consistency,
        average_tasks_per_week,
        streak_days: streak,
        peak_usage_hour,
        total_tasks,
    });

    ProductivityInsights {
        peak_usage_hour,
        peak_usage_day,
        most_productive_week,
        average_tasks_per_week,
        consistency_score: consistency,
        streak_days: streak,
        recommendations,
    }
}

/// Weekday evenness score in `[0, 100]`.
///
/// This measures how evenly activity is spread across the seven weekdays, not
/// how regular usage is from day to day over time: a user active only on
/// Mondays for a year scores the same as one active on a single Monday.
///
/// Formula: `max(0, 100 - stddev / mean * 20)` over the weekday histogram,
/// 0 when there is no activity.
pub fn consistency_score(day_counts: &[u32; 7]) -> f64 {
    let n = day_counts.len() as f64;
    let mean = day_counts.iter().map(|&c| c as f64).sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }

    let variance = day_counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    round1((100.0 - variance.sqrt() / mean * 20.0).clamp(0.0, 100.0))
}

/// Consecutive active days ending today or yesterday.
///
/// Returns 0 when the most recent active date is older than yesterday. Dates
/// after `today` are ignored.
pub fn streak_days(active_dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut recent_first = active_dates.range(..=today).rev();

    let Some(&latest) = recent_first.next() else {
        return 0;
    };
    if latest != today && Some(latest) != today.pred_opt() {
        return 0;
    }

    let mut streak = 1;
    let mut previous = latest;
    for &date in recent_first {
        if (previous - date).num_days() != 1 {
            break;
        }
        streak += 1;
        previous = date;
    }

    streak
}

/// Week key as `(year, n)` with `n = day_of_year / 7 + 1` (0-based day of year).
///
/// Not an ISO week: weeks restart at every January 1st.
fn week_of_year(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.ordinal0() / 7 + 1)
}

/// Highest-count week, earliest week on ties
fn busiest_week(week_counts: &BTreeMap<(i32, u32), u32>) -> Option<(i32, u32)> {
    let mut best: Option<((i32, u32), u32)> = None;
    for (&week, &count) in week_counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((week, count));
        }
    }
    best.map(|(week, _)| week)
}

/// Index of the largest count, first index on ties
fn arg_max(counts: &[u32]) -> usize {
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }
    best
}

/// Inputs the recommendation rules look at
struct RuleContext {
    consistency_score: f64,
    average_tasks_per_week: f64,
    streak_days: u32,
    peak_usage_hour: u32,
    total_tasks: u32,
}

struct RecommendationRule {
    applies: fn(&RuleContext) -> bool,
    message: &'static str,
}

/// Evaluated top to bottom; every matching rule contributes
const RULES: &[RecommendationRule] = &[
    RecommendationRule {
        applies: low_consistency,
        message: "Try building a routine: your activity is concentrated on only a few days of the week.",
    },
    RecommendationRule {
        applies: infrequent_use,
        message: "Use the document tools more often to get the most time savings each week.",
    },
    RecommendationRule {
        applies: no_streak,
        message: "Start a daily habit: create one document today to begin a new streak.",
    },
    RecommendationRule {
        applies: long_streak,
        message: "Great job! You've kept a streak going for a week or more.",
    },
    RecommendationRule {
        applies: off_hours_peak,
        message: "Most of your work happens outside business hours. Scheduling document tasks between 9am and 5pm can keep your evenings free.",
    },
    RecommendationRule {
        applies: power_user,
        message: "You're a power user! Explore every document type to save even more time.",
    },
];

fn low_consistency(ctx: &RuleContext) -> bool {
    ctx.consistency_score < LOW_CONSISTENCY_THRESHOLD
}

fn infrequent_use(ctx: &RuleContext) -> bool {
    ctx.average_tasks_per_week < LOW_WEEKLY_TASKS_THRESHOLD
}

fn no_streak(ctx: &RuleContext) -> bool {
    ctx.streak_days == 0
}

fn long_streak(ctx: &RuleContext) -> bool {
    ctx.streak_days >= LONG_STREAK_DAYS
}

fn off_hours_peak(ctx: &RuleContext) -> bool {
    !BUSINESS_HOURS.contains(&ctx.peak_usage_hour)
}

fn power_user(ctx: &RuleContext) -> bool {
    ctx.total_tasks >= POWER_USER_TASKS
}

fn recommend(ctx: &RuleContext) -> Vec<String> {
    let mut messages: Vec<String> = RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| rule.message.to_string())
        .collect();

    if messages.is_empty() {
        messages.push(ALL_GOOD_RECOMMENDATION.to_string());
    }
    messages
}
