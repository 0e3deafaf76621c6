use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::HashSet;

use super::StatsError;
use crate::models::Event;

/// Duration used when an event has none, or a non-positive one.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

pub fn effective_duration(duration_minutes: Option<i32>) -> i64 {
    match duration_minutes {
        Some(d) if d > 0 => i64::from(d),
        _ => DEFAULT_DURATION_MINUTES,
    }
}

/// Parse a stored `HH:MM` start time. `HH:MM:SS` is accepted as well.
pub fn parse_event_time(time: &str) -> Result<NaiveTime, StatsError> {
    let trimmed = time.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| StatsError::InvalidTimeFormat {
            time: time.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPhase {
    Past,
    Active,
    Upcoming,
}

/// Local wall-clock span of an event, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventWindow {
    pub fn new(date: NaiveDate, time: &str, duration_minutes: Option<i32>) -> Result<Self, StatsError> {
        let start = date.and_time(parse_event_time(time)?);
        let end = start
            .checked_add_signed(Duration::minutes(effective_duration(duration_minutes)))
            .ok_or_else(|| StatsError::WindowOutOfRange {
                date,
                time: time.to_string(),
            })?;
        Ok(EventWindow { start, end })
    }

    pub fn for_event(event: &Event) -> Result<Self, StatsError> {
        Self::new(event.date, &event.time, event.duration_minutes)
    }

    pub fn contains(&self, now: NaiveDateTime) -> bool {
        self.start <= now && now <= self.end
    }

    pub fn phase(&self, now: NaiveDateTime) -> EventPhase {
        if now < self.start {
            EventPhase::Upcoming
        } else if now > self.end {
            EventPhase::Past
        } else {
            EventPhase::Active
        }
    }
}

/// True iff `now` lies within `[start, start + duration]`.
pub fn is_event_active(
    date: NaiveDate,
    time: &str,
    duration_minutes: Option<i32>,
    now: NaiveDateTime,
) -> Result<bool, StatsError> {
    Ok(EventWindow::new(date, time, duration_minutes)?.contains(now))
}

/// Events split by where `now` falls relative to their window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventPartition {
    pub past: Vec<Event>,
    pub active: Vec<Event>,
    pub upcoming: Vec<Event>,
}

/// Partition the events of `club_ids` into past / active / upcoming.
///
/// Events of other clubs are dropped. `upcoming` and `active` are ordered by
/// (date, time) ascending; `past` keeps the input order. Fails on the first
/// event whose time cannot be parsed.
pub fn partition_events(
    events: &[Event],
    club_ids: &HashSet<i64>,
    now: NaiveDateTime,
) -> Result<EventPartition, StatsError> {
    let mut partition = EventPartition::default();
    let mut active = Vec::new();
    let mut upcoming = Vec::new();

    for event in events.iter().filter(|e| club_ids.contains(&e.club_id)) {
        let window = EventWindow::for_event(event)?;
        match window.phase(now) {
            EventPhase::Past => partition.past.push(event.clone()),
            EventPhase::Active => active.push((window.start, event.clone())),
            EventPhase::Upcoming => upcoming.push((window.start, event.clone())),
        }
    }

    // start already folds date and time together
    active.sort_by_key(|(start, _)| *start);
    upcoming.sort_by_key(|(start, _)| *start);
    partition.active = active.into_iter().map(|(_, e)| e).collect();
    partition.upcoming = upcoming.into_iter().map(|(_, e)| e).collect();

    Ok(partition)
}
