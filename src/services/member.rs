use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::{or_empty, role_in, schedulable_events, started_events};
use crate::errors::AppError;
use crate::models::{Attendance, AttendanceStatus, Event, Member, Membership};
use crate::stats::{partition_events, summarize_member, AttendanceSummary, EventWindow, Outcome};
use crate::store::ClubStore;

/// How many history entries the profile shows.
pub const PROFILE_RECENT_ENTRIES: usize = 5;

/// One registered event in a member's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub event_id: i64,
    pub club_id: i64,
    pub club_name: String,
    pub title: String,
    pub event_type: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub outcome: Outcome,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberProfile {
    pub member: Member,
    pub memberships: Vec<Membership>,
    /// Club the stats are restricted to, if any.
    pub club_id: Option<i64>,
    pub stats: AttendanceSummary,
    pub recent: Vec<HistoryEntry>,
}

/// An active or upcoming event in one of the member's clubs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventListing {
    #[serde(flatten)]
    pub event: Event,
    pub club_name: String,
    pub registered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberEvents {
    pub active: Vec<EventListing>,
    pub upcoming: Vec<EventListing>,
}

/// Profile of `member_id` as seen by `viewer`.
///
/// Members may always see their own profile. Anyone else needs `club_id`, an
/// owner/admin role in that club, and the member must belong to it.
pub async fn member_profile(
    store: &dyn ClubStore,
    viewer: Option<i64>,
    member_id: i64,
    club_id: Option<i64>,
    now: NaiveDateTime,
) -> Option<MemberProfile> {
    let Some(viewer) = viewer else {
        log::debug!("member_profile: unauthenticated request");
        return None;
    };
    or_empty(
        load_member_profile(store, viewer, member_id, club_id, now).await,
        "member_profile",
    )
}

/// The viewer's own profile across all their clubs.
pub async fn own_profile(
    store: &dyn ClubStore,
    viewer: Option<i64>,
    now: NaiveDateTime,
) -> Option<MemberProfile> {
    let member_id = viewer?;
    member_profile(store, viewer, member_id, None, now).await
}

async fn load_member_profile(
    store: &dyn ClubStore,
    viewer: i64,
    member_id: i64,
    club_id: Option<i64>,
    now: NaiveDateTime,
) -> Result<Option<MemberProfile>, AppError> {
    if viewer != member_id {
        let Some(club_id) = club_id else {
            return Ok(None);
        };
        let viewer_memberships = store.memberships_of_member(viewer).await?;
        if !role_in(&viewer_memberships, club_id).is_some_and(|r| r.can_manage()) {
            log::warn!("member {viewer} denied profile of {member_id} in club {club_id}");
            return Ok(None);
        }
    }

    let Some(member) = store.member(member_id).await? else {
        return Ok(None);
    };
    let mut memberships = store.memberships_of_member(member_id).await?;
    if let Some(club_id) = club_id {
        if role_in(&memberships, club_id).is_none() {
            return Ok(None);
        }
        // other viewers only see the club they manage
        if viewer != member_id {
            memberships.retain(|m| m.club_id == club_id);
        }
    }

    let events: Vec<Event> = store
        .registered_events(member_id)
        .await?
        .into_iter()
        .filter(|e| club_id.is_none_or(|c| e.club_id == c))
        .collect();
    let started = started_events(&events, now)?;
    let registrations = store.registrations_of_member(member_id).await?;
    let attendances = store.attendances_of_member(member_id).await?;

    let stats = summarize_member(member_id, &started, &registrations, &attendances);
    let mut recent = history_entries(&started, &memberships, &attendances)?;
    recent.truncate(PROFILE_RECENT_ENTRIES);

    Ok(Some(MemberProfile {
        member,
        memberships,
        club_id,
        stats,
        recent,
    }))
}

/// The viewer's registered events that have started, newest first.
pub async fn attendance_history(
    store: &dyn ClubStore,
    viewer: Option<i64>,
    club_id: Option<i64>,
    now: NaiveDateTime,
) -> Vec<HistoryEntry> {
    let Some(viewer) = viewer else {
        return Vec::new();
    };
    or_empty(
        load_attendance_history(store, viewer, club_id, now).await,
        "attendance_history",
    )
}

async fn load_attendance_history(
    store: &dyn ClubStore,
    member_id: i64,
    club_id: Option<i64>,
    now: NaiveDateTime,
) -> Result<Vec<HistoryEntry>, AppError> {
    let memberships = store.memberships_of_member(member_id).await?;
    let events: Vec<Event> = store
        .registered_events(member_id)
        .await?
        .into_iter()
        .filter(|e| club_id.is_none_or(|c| e.club_id == c))
        .collect();
    let started = started_events(&events, now)?;
    let attendances = store.attendances_of_member(member_id).await?;
    history_entries(&started, &memberships, &attendances)
}

/// History rows for `events`, newest start first.
fn history_entries(
    events: &[Event],
    memberships: &[Membership],
    attendances: &[Attendance],
) -> Result<Vec<HistoryEntry>, AppError> {
    let club_names: HashMap<i64, &str> = memberships
        .iter()
        .map(|m| (m.club_id, m.club_name.as_str()))
        .collect();
    let marked: HashMap<i64, (AttendanceStatus, DateTime<Utc>)> = attendances
        .iter()
        .map(|a| (a.event_id, (a.status, a.recorded_at)))
        .collect();

    let mut entries = Vec::with_capacity(events.len());
    for event in events {
        let start = EventWindow::for_event(event)?.start;
        let mark = marked.get(&event.id).copied();
        entries.push((
            start,
            HistoryEntry {
                event_id: event.id,
                club_id: event.club_id,
                club_name: club_names.get(&event.club_id).copied().unwrap_or_default().to_string(),
                title: event.title.clone(),
                event_type: event.event_type.clone(),
                date: event.date,
                time: event.time.clone(),
                location: event.location.clone(),
                outcome: mark.map(|(status, _)| status).into(),
                recorded_at: mark.map(|(_, at)| at),
            },
        ));
    }
    // stable: same-start events keep store order, reversed with the rest
    entries.reverse();
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(entries.into_iter().map(|(_, e)| e).collect())
}

/// Active and upcoming events across the viewer's clubs.
pub async fn member_events(
    store: &dyn ClubStore,
    viewer: Option<i64>,
    now: NaiveDateTime,
) -> MemberEvents {
    let Some(viewer) = viewer else {
        return MemberEvents::default();
    };
    or_empty(load_member_events(store, viewer, now).await, "member_events")
}

async fn load_member_events(
    store: &dyn ClubStore,
    member_id: i64,
    now: NaiveDateTime,
) -> Result<MemberEvents, AppError> {
    let memberships = store.memberships_of_member(member_id).await?;
    if memberships.is_empty() {
        return Ok(MemberEvents::default());
    }
    let club_ids: Vec<i64> = memberships.iter().map(|m| m.club_id).collect();
    let club_set: HashSet<i64> = club_ids.iter().copied().collect();
    let club_names: HashMap<i64, &str> = memberships
        .iter()
        .map(|m| (m.club_id, m.club_name.as_str()))
        .collect();

    let events = schedulable_events(store.events_of_clubs(&club_ids).await?);
    let partition = partition_events(&events, &club_set, now)?;
    let registered: HashSet<i64> = store
        .registrations_of_member(member_id)
        .await?
        .into_iter()
        .map(|r| r.event_id)
        .collect();

    let listing = |event: Event| EventListing {
        club_name: club_names.get(&event.club_id).copied().unwrap_or_default().to_string(),
        registered: registered.contains(&event.id),
        event,
    };

    Ok(MemberEvents {
        active: partition.active.into_iter().map(listing).collect(),
        upcoming: partition.upcoming.into_iter().map(listing).collect(),
    })
}
