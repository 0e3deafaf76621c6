use serde::Serialize;

use super::attendance::{
    attendance_rate, current_streak, longest_streak, member_records, AttendanceScope,
};
use super::trend::{recent_trend, Trend};
use crate::models::{Attendance, Event, Registration};

/// Everything the profile and dashboard views show about one member's attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub events_registered: usize,
    pub events_attended: usize,
    pub attendance_rate: u8,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub trend: Trend,
}

/// Summarize `member_id` over `events`.
///
/// `events` is the scope: pass only the events that should count (one club's,
/// or those that have already started).
pub fn summarize_member(
    member_id: i64,
    events: &[Event],
    registrations: &[Registration],
    attendances: &[Attendance],
) -> AttendanceSummary {
    let records = member_records(member_id, events, registrations, attendances);
    let scope = AttendanceScope::events(events.iter().map(|e| e.id)).with_member(member_id);

    AttendanceSummary {
        events_registered: records.len(),
        events_attended: records.iter().filter(|r| r.is_present()).count(),
        attendance_rate: attendance_rate(registrations, attendances, &scope),
        current_streak: current_streak(&records),
        longest_streak: longest_streak(&records),
        trend: recent_trend(&records),
    }
}
