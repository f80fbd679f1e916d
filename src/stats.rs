//! Zero-safe arithmetic shared by the stages
//!
//! None of these helpers ever return NaN or infinity.

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

/// Percent change from `previous` to `current`
///
/// 0 -> 0 is 0%, 0 -> N is +100%, otherwise `(current - previous) / previous * 100`.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous > 0.0 {
        round1((current - previous) / previous * 100.0)
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0
pub fn share_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round1(part / whole * 100.0)
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0 when `denominator` is 0
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
