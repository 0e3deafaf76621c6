//! Attendance aggregation: event windows, rates, streaks, trends and monthly rollups.
//!
//! Everything in here is a pure function over an in-memory snapshot. The
//! current instant is always passed in by the caller.

pub mod activity;
pub mod attendance;
pub mod monthly;
pub mod summary;
pub mod trend;

pub use activity::*;
pub use attendance::*;
pub use monthly::*;
pub use summary::*;
pub use trend::*;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// An event time that is not `HH:MM` (optionally `HH:MM:SS`).
    InvalidTimeFormat { time: String },
    /// The event ends beyond the representable calendar.
    WindowOutOfRange { date: NaiveDate, time: String },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::InvalidTimeFormat { time } => {
                write!(f, "Invalid event time format: {time:?} (expected HH:MM)")
            }
            StatsError::WindowOutOfRange { date, time } => {
                write!(f, "Event window out of range: {date} {time}")
            }
        }
    }
}

impl std::error::Error for StatsError {}
