//! Human-readable formatting for durations, dates, and time ranges

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

use crate::domain::DATE_FORMAT;

#[derive(Debug, Error, PartialEq)]
pub enum RangeError {
    #[error("invalid time range '{0}': expected 'from \u{2192} to' or 'last N hours/days/weeks'")]
    InvalidFormat(String),

    #[error("invalid {which} date '{value}': expected YYYY-MM-DD")]
    InvalidDate { which: &'static str, value: String },

    #[error("'to' date cannot be before 'from' date")]
    Reversed,

    #[error("unsupported time unit '{0}'")]
    UnsupportedUnit(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// Formats a day count as a short human summary
///
/// Shows at most the two largest nonzero units (years, months, weeks,
/// days), decomposed hierarchically with floor division. The truncation is
/// intentionally lossy; the exact day counts stay available to machine
/// consumers.
pub fn human_duration(days: i64) -> String {
    if days == 0 {
        return "no change".to_string();
    }

    let years = days / 365;
    let remaining = days % 365;
    let months = remaining / 30;
    let remaining = remaining % 30;
    let weeks = remaining / 7;
    let remaining_days = remaining % 7;

    if years > 0 {
        if months == 0 {
            return format!("{} year{}", years, plural(years));
        }
        return format!(
            "{} year{} {} month{}",
            years,
            plural(years),
            months,
            plural(months)
        );
    }

    if months > 0 {
        if weeks == 0 {
            return format!("{} month{}", months, plural(months));
        }
        return format!(
            "{} month{} {} week{}",
            months,
            plural(months),
            weeks,
            plural(weeks)
        );
    }

    if weeks > 0 {
        if remaining_days == 0 {
            return format!("{} week{}", weeks, plural(weeks));
        }
        return format!(
            "{} week{} {} day{}",
            weeks,
            plural(weeks),
            remaining_days,
            plural(remaining_days)
        );
    }

    format!("{} day{}", days, plural(days))
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Formats a date using a chrono format string
pub fn format_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Parses a human-readable time range into a from/to timestamp pair
///
/// Accepts `"last N minutes|hours|days|weeks"` relative to now, or an
/// explicit `"YYYY-MM-DD \u{2192} YYYY-MM-DD"` pair.
pub fn parse_human_range(range: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), RangeError> {
    if let Some(rest) = range.strip_prefix("last ") {
        let duration = parse_relative_duration(rest)?;
        let now = Utc::now();
        return Ok((now - duration, now));
    }

    let (from_str, to_str) = range
        .split_once('\u{2192}')
        .ok_or_else(|| RangeError::InvalidFormat(range.to_string()))?;
    let from_str = from_str.trim();
    let to_str = to_str.trim();

    let from = NaiveDate::parse_from_str(from_str, DATE_FORMAT).map_err(|_| {
        RangeError::InvalidDate {
            which: "from",
            value: from_str.to_string(),
        }
    })?;
    let to = NaiveDate::parse_from_str(to_str, DATE_FORMAT).map_err(|_| {
        RangeError::InvalidDate {
            which: "to",
            value: to_str.to_string(),
        }
    })?;

    if to < from {
        return Err(RangeError::Reversed);
    }

    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    Ok((midnight(from), midnight(to)))
}

/// Parses strings like "30 minutes", "2 days", "1 week"
fn parse_relative_duration(s: &str) -> Result<Duration, RangeError> {
    let mut parts = s.split_whitespace();
    let (amount, unit) = match (parts.next(), parts.next(), parts.next()) {
        (Some(amount), Some(unit), None) => (amount, unit),
        _ => return Err(RangeError::InvalidFormat(s.to_string())),
    };

    let amount: i64 = amount
        .parse()
        .map_err(|_| RangeError::InvalidNumber(amount.to_string()))?;

    let unit = unit.to_lowercase();
    let unit = unit.strip_suffix('s').unwrap_or(&unit);

    let duration = match unit {
        "minute" => Duration::minutes(amount),
        "hour" => Duration::hours(amount),
        "day" => Duration::days(amount),
        "week" => Duration::weeks(amount),
        other => return Err(RangeError::UnsupportedUnit(other.to_string())),
    };

    Ok(duration)
}
