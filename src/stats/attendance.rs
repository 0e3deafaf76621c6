use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::models::{Attendance, AttendanceStatus, Event, Registration};

/// Which registrations and attendances count toward a rate.
///
/// An empty scope counts everything. Narrow it to a member, to a set of
/// events (usually one club's events), or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceScope {
    member_id: Option<i64>,
    event_ids: Option<HashSet<i64>>,
}

impl AttendanceScope {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn member(member_id: i64) -> Self {
        AttendanceScope {
            member_id: Some(member_id),
            event_ids: None,
        }
    }

    pub fn events(event_ids: impl IntoIterator<Item = i64>) -> Self {
        AttendanceScope {
            member_id: None,
            event_ids: Some(event_ids.into_iter().collect()),
        }
    }

    /// The events in `events` that belong to `club_id`.
    pub fn club(club_id: i64, events: &[Event]) -> Self {
        Self::events(events.iter().filter(|e| e.club_id == club_id).map(|e| e.id))
    }

    pub fn with_member(mut self, member_id: i64) -> Self {
        self.member_id = Some(member_id);
        self
    }

    pub fn includes(&self, event_id: i64, member_id: i64) -> bool {
        self.member_id.is_none_or(|m| m == member_id)
            && self.event_ids.as_ref().is_none_or(|ids| ids.contains(&event_id))
    }
}

/// `round(numerator / denominator * 100)`, 0 for an empty denominator, capped at 100.
pub fn percentage(numerator: usize, denominator: usize) -> u8 {
    if denominator == 0 {
        return 0;
    }
    let pct = (numerator as f64 / denominator as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Present attendances over registrations, both restricted to `scope`.
///
/// Registrations are the denominator; a present attendance without a
/// registration still counts in the numerator, so the result is capped.
pub fn attendance_rate(
    registrations: &[Registration],
    attendances: &[Attendance],
    scope: &AttendanceScope,
) -> u8 {
    let registered = registrations
        .iter()
        .filter(|r| scope.includes(r.event_id, r.member_id))
        .count();
    let present = attendances
        .iter()
        .filter(|a| a.is_present() && scope.includes(a.event_id, a.member_id))
        .count();
    percentage(present, registered)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Present,
    Absent,
    Unmarked,
}

impl From<Option<AttendanceStatus>> for Outcome {
    fn from(status: Option<AttendanceStatus>) -> Self {
        match status {
            Some(AttendanceStatus::Present) => Outcome::Present,
            Some(AttendanceStatus::Absent) => Outcome::Absent,
            None => Outcome::Unmarked,
        }
    }
}

/// One registered event of a member and what happened at it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub event_id: i64,
    pub date: NaiveDate,
    pub outcome: Outcome,
}

impl AttendanceRecord {
    pub fn is_present(&self) -> bool {
        self.outcome == Outcome::Present
    }
}

/// Records for every event in `events` that `member_id` registered for, in
/// the order of `events`.
pub fn member_records(
    member_id: i64,
    events: &[Event],
    registrations: &[Registration],
    attendances: &[Attendance],
) -> Vec<AttendanceRecord> {
    let registered: HashSet<i64> = registrations
        .iter()
        .filter(|r| r.member_id == member_id)
        .map(|r| r.event_id)
        .collect();
    let status: HashMap<i64, AttendanceStatus> = attendances
        .iter()
        .filter(|a| a.member_id == member_id)
        .map(|a| (a.event_id, a.status))
        .collect();

    events
        .iter()
        .filter(|e| registered.contains(&e.id))
        .map(|e| AttendanceRecord {
            event_id: e.id,
            date: e.date,
            outcome: status.get(&e.id).copied().into(),
        })
        .collect()
}

/// Records oldest first. Same-day records keep their input order.
pub fn chronological(records: &[AttendanceRecord]) -> Vec<&AttendanceRecord> {
    let mut sorted: Vec<&AttendanceRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);
    sorted
}

/// Records newest first: the exact reverse of [`chronological`].
pub fn most_recent_first(records: &[AttendanceRecord]) -> Vec<&AttendanceRecord> {
    let mut sorted = chronological(records);
    sorted.reverse();
    sorted
}

/// Consecutive present records counting back from the most recent one.
pub fn current_streak(records: &[AttendanceRecord]) -> u32 {
    most_recent_first(records)
        .into_iter()
        .take_while(|r| r.is_present())
        .count() as u32
}

/// Longest run of consecutive present records, oldest to newest.
pub fn longest_streak(records: &[AttendanceRecord]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    for record in chronological(records) {
        if record.is_present() {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}
