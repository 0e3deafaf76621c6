use serde::Serialize;

use super::attendance::{most_recent_first, AttendanceRecord};

/// Records per comparison window.
pub const TREND_WINDOW: usize = 5;
/// Rate difference (as a fraction) that counts as a change.
pub const TREND_THRESHOLD: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
    /// One of the two windows holds fewer than [`TREND_WINDOW`] records.
    InsufficientData,
}

/// Present rates of the recent window and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendWindows {
    pub recent_rate: f64,
    pub previous_rate: f64,
    pub recent_len: usize,
    pub previous_len: usize,
}

impl TrendWindows {
    /// Direction of the change, treating a short window as whatever rate it has
    /// (an empty window rates 0).
    pub fn direction(&self) -> Trend {
        let delta = self.recent_rate - self.previous_rate;
        if delta > TREND_THRESHOLD {
            Trend::Up
        } else if delta < -TREND_THRESHOLD {
            Trend::Down
        } else {
            Trend::Stable
        }
    }

    pub fn is_complete(&self) -> bool {
        self.recent_len >= TREND_WINDOW && self.previous_len >= TREND_WINDOW
    }
}

fn window_rate(window: &[&AttendanceRecord]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let present = window.iter().filter(|r| r.is_present()).count();
    present as f64 / window.len() as f64
}

/// Rates of the 5 most recent records and of the 5 before them.
pub fn compare_windows(records: &[AttendanceRecord]) -> TrendWindows {
    let ordered = most_recent_first(records);
    let recent = &ordered[..ordered.len().min(TREND_WINDOW)];
    let previous = &ordered[recent.len()..ordered.len().min(TREND_WINDOW * 2)];
    TrendWindows {
        recent_rate: window_rate(recent),
        previous_rate: window_rate(previous),
        recent_len: recent.len(),
        previous_len: previous.len(),
    }
}

/// Up / down / stable when both windows are full, otherwise insufficient data.
pub fn recent_trend(records: &[AttendanceRecord]) -> Trend {
    let windows = compare_windows(records);
    if !windows.is_complete() {
        return Trend::InsufficientData;
    }
    windows.direction()
}
