use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;

use super::attendance::{percentage, AttendanceScope};
use crate::models::{Attendance, Event, Registration};

/// Months covered by a rollup, the current one included.
pub const ROLLUP_MONTHS: u32 = 6;

/// Registrations and present attendances for events dated in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAttendance {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub events: usize,
    pub attended: usize,
    pub attendance: u8,
}

/// `(year, month)` stepped back `back` months.
fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// `[first day 00:00:00, last day 23:59:59]` of a month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = months_before(year, month + 1, 0);
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((
        first.and_time(NaiveTime::MIN),
        last.and_hms_opt(23, 59, 59)?,
    ))
}

/// One bucket per month for the trailing [`ROLLUP_MONTHS`] months, oldest first.
///
/// Registrations and attendances are matched to a month by the date of their
/// event; those whose event is not in `events` are ignored.
pub fn monthly_rollup(
    events: &[Event],
    registrations: &[Registration],
    attendances: &[Attendance],
    scope: &AttendanceScope,
    now: NaiveDateTime,
) -> Vec<MonthlyAttendance> {
    let event_dates: HashMap<i64, NaiveDateTime> = events
        .iter()
        .map(|e| (e.id, e.date.and_time(NaiveTime::MIN)))
        .collect();

    (0..ROLLUP_MONTHS)
        .rev()
        .filter_map(|back| {
            let (year, month) = months_before(now.year(), now.month(), back);
            let (start, end) = month_bounds(year, month)?;
            let in_month = |event_id: i64| {
                event_dates
                    .get(&event_id)
                    .is_some_and(|at| start <= *at && *at <= end)
            };

            let registered = registrations
                .iter()
                .filter(|r| scope.includes(r.event_id, r.member_id) && in_month(r.event_id))
                .count();
            let attended = attendances
                .iter()
                .filter(|a| {
                    a.is_present() && scope.includes(a.event_id, a.member_id) && in_month(a.event_id)
                })
                .count();

            Some(MonthlyAttendance {
                year,
                month,
                label: start.format("%b %Y").to_string(),
                events: registered,
                attended,
                attendance: percentage(attended, registered),
            })
        })
        .collect()
}
