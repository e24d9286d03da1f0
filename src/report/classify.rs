//! Delay classification for timeline changes
//!
//! Pure threshold bucketing: a day delta plus three ascending thresholds
//! maps to a severity level. Total functions, no failure mode; callers own
//! threshold sanity.

use serde::{Deserialize, Serialize};

/// How far a timeline slipped relative to the configured thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayLevel {
    OnTrack,
    Ahead,
    Moderate,
    High,
    Extreme,
}

impl DelayLevel {
    /// Display label with a symbol recognizable in any output format
    pub fn label(&self) -> &'static str {
        match self {
            DelayLevel::OnTrack => "\u{1F535} On track",
            DelayLevel::Ahead => "\u{1F680} Ahead of schedule",
            DelayLevel::Moderate => "\u{1F7E0} Moderate delay",
            DelayLevel::High => "\u{1F534} High delay",
            DelayLevel::Extreme => "\u{1F6AB} Extreme delay",
        }
    }
}

/// Day thresholds separating the delay levels, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub moderate: i64,
    pub high: i64,
    pub extreme: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            moderate: 7,  // 1 week
            high: 14,     // 2 weeks
            extreme: 30,  // 1 month
        }
    }
}

/// Classifies a duration delta in days
pub fn delay_level(duration_delta: i64, thresholds: &Thresholds) -> DelayLevel {
    if duration_delta < 0 {
        return DelayLevel::Ahead;
    }
    if duration_delta == 0 {
        return DelayLevel::OnTrack;
    }
    if duration_delta >= thresholds.extreme {
        return DelayLevel::Extreme;
    }
    if duration_delta >= thresholds.high {
        return DelayLevel::High;
    }
    if duration_delta >= thresholds.moderate {
        return DelayLevel::Moderate;
    }
    DelayLevel::OnTrack
}

/// Classifies a timeline change from both the start shift and the duration
/// change
///
/// A start that moved earlier combined with a duration that held or shrank
/// is ahead of schedule; otherwise the worse of the two deltas drives the
/// classification.
pub fn timeline_delay_level(
    start_days_delta: i64,
    duration_delta: i64,
    thresholds: &Thresholds,
) -> DelayLevel {
    if start_days_delta < 0 && duration_delta <= 0 {
        return DelayLevel::Ahead;
    }

    let effective = start_days_delta.max(duration_delta);

    if effective == 0 {
        return DelayLevel::OnTrack;
    }
    if effective >= thresholds.extreme {
        return DelayLevel::Extreme;
    }
    if effective >= thresholds.high {
        return DelayLevel::High;
    }
    if effective >= thresholds.moderate {
        return DelayLevel::Moderate;
    }
    DelayLevel::OnTrack
}
