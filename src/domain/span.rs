//! Date span model
//!
//! A span is an inclusive start/end pair of calendar dates representing an
//! item's planned timeline. Spans are compared via [`DateSpan::compare_to`],
//! which yields signed day deltas consumed by the delay classifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format used for span fields in GitHub project data
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum SpanError {
    #[error("invalid {which} date '{value}': expected YYYY-MM-DD")]
    InvalidDate { which: &'static str, value: String },

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// An inclusive span of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// How a span moved between two snapshots
///
/// All deltas are in days, signed as `other - self`: positive start/end
/// deltas mean the date moved later, a positive duration delta means the
/// span grew. The classifier depends on this sign convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateSpanChange {
    pub start_days_delta: i64,
    pub end_days_delta: i64,
    pub duration_delta: i64,
}

impl DateSpan {
    /// Creates a span from two already-validated dates
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SpanError> {
        if end < start {
            return Err(SpanError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a span from two YYYY-MM-DD strings
    pub fn parse(start: &str, end: &str) -> Result<Self, SpanError> {
        let start_date =
            NaiveDate::parse_from_str(start, DATE_FORMAT).map_err(|_| SpanError::InvalidDate {
                which: "start",
                value: start.to_string(),
            })?;
        let end_date =
            NaiveDate::parse_from_str(end, DATE_FORMAT).map_err(|_| SpanError::InvalidDate {
                which: "end",
                value: end.to_string(),
            })?;
        Self::new(start_date, end_date)
    }

    /// Duration in days, counting both the start and end day
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Compares this span to a later snapshot of the same item
    pub fn compare_to(&self, other: &DateSpan) -> DateSpanChange {
        DateSpanChange {
            start_days_delta: (other.start - self.start).num_days(),
            end_days_delta: (other.end - self.end).num_days(),
            duration_delta: other.duration_days() - self.duration_days(),
        }
    }
}

impl DateSpanChange {
    /// Returns true if nothing moved
    pub fn is_zero(&self) -> bool {
        *self == DateSpanChange::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn span(start: &str, end: &str) -> DateSpan {
        DateSpan::parse(start, end).unwrap()
    }

    #[test]
    fn parse_valid_span() {
        let s = span("2024-01-01", "2024-01-10");
        assert_eq!(s.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(s.end, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn parse_rejects_malformed_dates() {
        assert_eq!(
            DateSpan::parse("not-a-date", "2024-01-10"),
            Err(SpanError::InvalidDate {
                which: "start",
                value: "not-a-date".to_string()
            })
        );
        assert_eq!(
            DateSpan::parse("2024-01-01", "01/10/2024"),
            Err(SpanError::InvalidDate {
                which: "end",
                value: "01/10/2024".to_string()
            })
        );
    }

    #[test]
    fn parse_rejects_reversed_dates() {
        let err = DateSpan::parse("2024-01-10", "2024-01-01").unwrap_err();
        assert!(matches!(err, SpanError::EndBeforeStart { .. }));
    }

    #[test]
    fn duration_counts_both_endpoints() {
        assert_eq!(span("2024-01-01", "2024-01-01").duration_days(), 1);
        assert_eq!(span("2024-01-01", "2024-01-10").duration_days(), 10);
        assert_eq!(span("2024-01-01", "2024-12-31").duration_days(), 366);
    }

    #[test]
    fn compare_detects_shifts() {
        let before = span("2024-01-01", "2024-01-10");
        let after = span("2024-01-03", "2024-01-15");

        let change = before.compare_to(&after);
        assert_eq!(change.start_days_delta, 2);
        assert_eq!(change.end_days_delta, 5);
        assert_eq!(change.duration_delta, 3);
    }

    #[test]
    fn compare_detects_earlier_shift() {
        let before = span("2024-02-01", "2024-02-20");
        let after = span("2024-01-25", "2024-02-10");

        let change = before.compare_to(&after);
        assert_eq!(change.start_days_delta, -7);
        assert_eq!(change.end_days_delta, -10);
        assert_eq!(change.duration_delta, -3);
    }

    #[test]
    fn compare_identical_spans_is_zero() {
        let s = span("2024-01-01", "2024-01-10");
        assert!(s.compare_to(&s).is_zero());
    }

    #[test]
    fn serde_roundtrip() {
        let s = span("2024-03-05", "2024-04-01");
        let json = serde_json::to_string(&s).unwrap();
        let parsed: DateSpan = serde_json::from_str(&json).unwrap();
        assert_eq!(s, parsed);
    }

    proptest! {
        #[test]
        fn duration_is_at_least_one(start_off in 0i64..20_000, len in 0i64..5_000) {
            let base = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
            let start = base + chrono::Days::new(start_off as u64);
            let end = start + chrono::Days::new(len as u64);
            let s = DateSpan::new(start, end).unwrap();

            prop_assert_eq!(s.duration_days(), len + 1);
            prop_assert!(s.duration_days() >= 1);
        }

        #[test]
        fn compare_is_antisymmetric(
            a_off in 0i64..20_000, a_len in 0i64..5_000,
            b_off in 0i64..20_000, b_len in 0i64..5_000,
        ) {
            let base = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
            let a_start = base + chrono::Days::new(a_off as u64);
            let a = DateSpan::new(a_start, a_start + chrono::Days::new(a_len as u64)).unwrap();
            let b_start = base + chrono::Days::new(b_off as u64);
            let b = DateSpan::new(b_start, b_start + chrono::Days::new(b_len as u64)).unwrap();

            let ab = a.compare_to(&b);
            let ba = b.compare_to(&a);
            prop_assert_eq!(ab.start_days_delta, -ba.start_days_delta);
            prop_assert_eq!(ab.end_days_delta, -ba.end_days_delta);
            prop_assert_eq!(ab.duration_delta, -ba.duration_delta);
        }
    }
}
