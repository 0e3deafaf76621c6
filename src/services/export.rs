use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::club::can_manage_club;
use super::or_empty;
use crate::errors::AppError;
use crate::models::{AttendanceStatus, Event};
use crate::stats::Outcome;
use crate::store::ClubStore;

/// One registration of a club, flattened for spreadsheets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub event_id: i64,
    pub event_title: String,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub member_id: i64,
    pub member_name: String,
    pub status: Outcome,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Every registration in `club_id` with its outcome. Owners and admins only.
pub async fn club_export(
    store: &dyn ClubStore,
    viewer: Option<i64>,
    club_id: i64,
) -> Option<Vec<ExportRow>> {
    let viewer = viewer?;
    or_empty(load_club_export(store, viewer, club_id).await, "club_export")
}

async fn load_club_export(
    store: &dyn ClubStore,
    viewer: i64,
    club_id: i64,
) -> Result<Option<Vec<ExportRow>>, AppError> {
    if !can_manage_club(store, viewer, club_id).await? {
        log::warn!("member {viewer} denied export of club {club_id}");
        return Ok(None);
    }

    let events = store.events_of_clubs(&[club_id]).await?;
    let members = store.members_of_club(club_id).await?;
    let registrations = store.registrations_of_club(club_id).await?;
    let attendances = store.attendances_of_club(club_id).await?;

    let events: HashMap<i64, &Event> = events.iter().map(|e| (e.id, e)).collect();
    let names: HashMap<i64, &str> = members
        .iter()
        .map(|m| (m.id, m.display_name.as_str()))
        .collect();
    let marked: HashMap<(i64, i64), (AttendanceStatus, DateTime<Utc>)> = attendances
        .iter()
        .map(|a| ((a.event_id, a.member_id), (a.status, a.recorded_at)))
        .collect();

    let mut rows: Vec<ExportRow> = registrations
        .iter()
        .filter_map(|r| {
            let event = events.get(&r.event_id)?;
            let mark = marked.get(&(r.event_id, r.member_id)).copied();
            Some(ExportRow {
                event_id: event.id,
                event_title: event.title.clone(),
                event_type: event.event_type.clone(),
                event_date: event.date,
                event_time: event.time.clone(),
                member_id: r.member_id,
                member_name: names.get(&r.member_id).copied().unwrap_or_default().to_string(),
                status: mark.map(|(status, _)| status).into(),
                recorded_at: mark.map(|(_, at)| at),
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.event_date, &a.event_time, a.event_id, &a.member_name)
            .cmp(&(b.event_date, &b.event_time, b.event_id, &b.member_name))
    });

    Ok(Some(rows))
}

/// Render export rows as CSV with a header line.
pub fn export_csv(rows: &[ExportRow]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    if rows.is_empty() {
        writer.write_record([
            "event_id",
            "event_title",
            "event_type",
            "event_date",
            "event_time",
            "member_id",
            "member_name",
            "status",
            "recorded_at",
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(status: Outcome, recorded_at: Option<DateTime<Utc>>) -> ExportRow {
        ExportRow {
            event_id: 7,
            event_title: "Derby, home".to_string(),
            event_type: "match".to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
            event_time: "15:00".to_string(),
            member_id: 3,
            member_name: "Cal".to_string(),
            status,
            recorded_at,
        }
    }

    #[test]
    fn csv_has_header_and_quotes_commas() {
        let at = Utc.with_ymd_and_hms(2026, 5, 2, 17, 0, 0).unwrap();
        let csv = export_csv(&[row(Outcome::Present, Some(at)), row(Outcome::Unmarked, None)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "event_id,event_title,event_type,event_date,event_time,member_id,member_name,status,recorded_at"
        );
        assert_eq!(
            lines[1],
            "7,\"Derby, home\",match,2026-05-02,15:00,3,Cal,present,2026-05-02T17:00:00Z"
        );
        assert_eq!(lines[2], "7,\"Derby, home\",match,2026-05-02,15:00,3,Cal,unmarked,");
    }

    #[test]
    fn empty_export_still_has_header() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("event_id,"));
    }
}
