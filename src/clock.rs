//! Reference frame for calendar arithmetic
//!
//! Every stage that talks about "today", "this month" or a local hour resolves
//! it through a [`ReferenceFrame`]: a fixed instant plus the caller's UTC offset.

use crate::error::AnalyticsError;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Offset, Utc, Weekday,
};

/// The instant and timezone all calendar boundaries are computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceFrame {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl ReferenceFrame {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Frame at a given instant in UTC
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, utc_offset())
    }

    /// Frame at the current system time
    pub fn current(offset: FixedOffset) -> Self {
        Self::new(Utc::now(), offset)
    }

    /// Build a frame from an RFC 3339 instant and a timezone string
    pub fn parse(now_rfc3339: &str, timezone: &str) -> Result<Self, AnalyticsError> {
        let now = DateTime::parse_from_rfc3339(now_rfc3339)
            .map_err(|e| AnalyticsError::DateParseError(format!("{}: {}", now_rfc3339, e)))?
            .with_timezone(&Utc);
        Ok(Self::new(now, parse_offset(timezone)?))
    }

    /// Local calendar date of an instant
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }

    /// Start of the current local calendar month
    pub fn month_start(&self) -> DateTime<Utc> {
        self.local_midnight(first_of_month(self.today()))
    }

    /// Start of the previous local calendar month
    pub fn previous_month_start(&self) -> DateTime<Utc> {
        let first = first_of_month(self.today());
        let previous = first.checked_sub_months(Months::new(1)).unwrap_or(first);
        self.local_midnight(previous)
    }

    /// UTC instant of local midnight on `date`
    pub fn local_midnight(&self, date: NaiveDate) -> DateTime<Utc> {
        let naive = date.and_time(NaiveTime::MIN);
        (naive - Duration::seconds(self.offset.local_minus_utc() as i64)).and_utc()
    }
}

/// The zero offset
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Parse `UTC`, `Z`, `+HH:MM`, `-HH:MM`, `+HHMM` or `-HHMM`
pub fn parse_offset(timezone: &str) -> Result<FixedOffset, AnalyticsError> {
    let tz = timezone.trim();
    if tz.eq_ignore_ascii_case("utc") || tz == "Z" {
        return Ok(utc_offset());
    }

    let invalid = || AnalyticsError::InvalidTimezone(timezone.to_string());

    let (sign, rest) = match tz.as_bytes().first() {
        Some(b'+') => (1, &tz[1..]),
        Some(b'-') => (-1, &tz[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Sunday that starts the week containing `date`
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// English weekday name for a Sunday-based index (0 = Sunday)
pub fn weekday_name(index: usize) -> &'static str {
    const NAMES: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    NAMES.get(index).copied().unwrap_or("N/A")
}

/// Sunday-based weekday index (0 = Sunday)
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}
