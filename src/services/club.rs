use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::{or_empty, role_in, schedulable_events, started_events};
use crate::errors::AppError;
use crate::models::{Event, Membership, MembershipRole};
use crate::stats::{
    attendance_rate, monthly_rollup, partition_events, summarize_member, AttendanceScope,
    MonthlyAttendance,
};
use crate::store::ClubStore;

/// How many members the top-attendee table lists.
pub const TOP_ATTENDEES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    pub event_type: String,
    pub events: usize,
    pub registrations: usize,
    pub attended: usize,
    pub attendance_rate: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendeeRank {
    pub member_id: i64,
    pub display_name: String,
    pub events_registered: usize,
    pub events_attended: usize,
    pub attendance_rate: u8,
    pub current_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubPerformance {
    pub club_id: i64,
    pub club_name: String,
    pub member_count: usize,
    pub attendance_rate: u8,
    pub monthly: Vec<MonthlyAttendance>,
    pub by_type: Vec<TypeBreakdown>,
    pub top_attendees: Vec<AttendeeRank>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubMetrics {
    pub club_id: i64,
    pub club_name: String,
    pub role: MembershipRole,
    pub member_count: usize,
    pub event_count: usize,
    pub active_events: usize,
    pub upcoming_events: usize,
    pub attendance_rate: u8,
    pub this_month_rate: u8,
    pub last_month_rate: u8,
    /// Percentage points, this month minus last month.
    pub rate_change: i16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OwnerDashboard {
    pub clubs: Vec<ClubMetrics>,
}

/// Club-wide reporting for an owner or admin of `club_id`.
pub async fn club_performance(
    store: &dyn ClubStore,
    viewer: Option<i64>,
    club_id: i64,
    now: NaiveDateTime,
) -> Option<ClubPerformance> {
    let viewer = viewer?;
    or_empty(
        load_club_performance(store, viewer, club_id, now).await,
        "club_performance",
    )
}

async fn load_club_performance(
    store: &dyn ClubStore,
    viewer: i64,
    club_id: i64,
    now: NaiveDateTime,
) -> Result<Option<ClubPerformance>, AppError> {
    let viewer_memberships = store.memberships_of_member(viewer).await?;
    let Some(membership) = viewer_memberships
        .iter()
        .find(|m| m.club_id == club_id && m.role.can_manage())
    else {
        log::warn!("member {viewer} denied performance view of club {club_id}");
        return Ok(None);
    };

    let events = store.events_of_clubs(&[club_id]).await?;
    let started = started_events(&events, now)?;
    let registrations = store.registrations_of_club(club_id).await?;
    let attendances = store.attendances_of_club(club_id).await?;
    let members = store.members_of_club(club_id).await?;

    let scope = AttendanceScope::events(started.iter().map(|e| e.id));

    let mut types: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for event in &started {
        types.entry(event.event_type.as_str()).or_default().push(event.id);
    }
    let by_type = types
        .into_iter()
        .map(|(event_type, ids)| {
            let count = ids.len();
            let ids: HashSet<i64> = ids.into_iter().collect();
            let registered = registrations.iter().filter(|r| ids.contains(&r.event_id)).count();
            let attended = attendances
                .iter()
                .filter(|a| a.is_present() && ids.contains(&a.event_id))
                .count();
            TypeBreakdown {
                event_type: event_type.to_string(),
                events: count,
                registrations: registered,
                attended,
                attendance_rate: crate::stats::percentage(attended, registered),
            }
        })
        .collect();

    let mut ranks: Vec<AttendeeRank> = members
        .iter()
        .map(|m| (m, summarize_member(m.id, &started, &registrations, &attendances)))
        .filter(|(_, s)| s.events_registered > 0)
        .map(|(m, s)| AttendeeRank {
            member_id: m.id,
            display_name: m.display_name.clone(),
            events_registered: s.events_registered,
            events_attended: s.events_attended,
            attendance_rate: s.attendance_rate,
            current_streak: s.current_streak,
        })
        .collect();
    ranks.sort_by(|a, b| {
        b.attendance_rate
            .cmp(&a.attendance_rate)
            .then(b.events_attended.cmp(&a.events_attended))
            .then(a.display_name.cmp(&b.display_name))
    });
    ranks.truncate(TOP_ATTENDEES);

    Ok(Some(ClubPerformance {
        club_id,
        club_name: membership.club_name.clone(),
        member_count: members.len(),
        attendance_rate: attendance_rate(&registrations, &attendances, &scope),
        monthly: monthly_rollup(&started, &registrations, &attendances, &scope, now),
        by_type,
        top_attendees: ranks,
    }))
}

/// Headline numbers for every club the viewer owns or administers.
pub async fn owner_dashboard(
    store: &dyn ClubStore,
    viewer: Option<i64>,
    now: NaiveDateTime,
) -> OwnerDashboard {
    let Some(viewer) = viewer else {
        return OwnerDashboard::default();
    };
    or_empty(load_owner_dashboard(store, viewer, now).await, "owner_dashboard")
}

async fn load_owner_dashboard(
    store: &dyn ClubStore,
    viewer: i64,
    now: NaiveDateTime,
) -> Result<OwnerDashboard, AppError> {
    let memberships = store.memberships_of_member(viewer).await?;
    let mut clubs = Vec::new();

    // a failing club is logged and left out; the others still report
    for membership in memberships.iter().filter(|m| m.role.can_manage()) {
        match club_metrics(store, membership, now).await {
            Ok(metrics) => clubs.push(metrics),
            Err(e) => log::error!("owner_dashboard: club {} skipped: {e}", membership.club_id),
        }
    }

    Ok(OwnerDashboard { clubs })
}

async fn club_metrics(
    store: &dyn ClubStore,
    membership: &Membership,
    now: NaiveDateTime,
) -> Result<ClubMetrics, AppError> {
    let club_id = membership.club_id;
    let events = store.events_of_clubs(&[club_id]).await?;
    let roster = store.memberships_of_club(club_id).await?;
    let registrations = store.registrations_of_club(club_id).await?;
    let attendances = store.attendances_of_club(club_id).await?;

    let event_count = events.len();
    let partition = partition_events(&schedulable_events(events), &HashSet::from([club_id]), now)?;
    let started: Vec<Event> = partition
        .past
        .iter()
        .chain(partition.active.iter())
        .cloned()
        .collect();
    let scope = AttendanceScope::events(started.iter().map(|e| e.id));
    let monthly = monthly_rollup(&started, &registrations, &attendances, &scope, now);
    let this_month = monthly.last().map_or(0, |m| m.attendance);
    let last_month = monthly
        .len()
        .checked_sub(2)
        .and_then(|i| monthly.get(i))
        .map_or(0, |m| m.attendance);

    Ok(ClubMetrics {
        club_id,
        club_name: membership.club_name.clone(),
        role: membership.role,
        member_count: roster.len(),
        event_count,
        active_events: partition.active.len(),
        upcoming_events: partition.upcoming.len(),
        attendance_rate: attendance_rate(&registrations, &attendances, &scope),
        this_month_rate: this_month,
        last_month_rate: last_month,
        rate_change: i16::from(this_month) - i16::from(last_month),
    })
}

/// Whether `viewer` may see club-wide data for `club_id`.
pub(crate) async fn can_manage_club(
    store: &dyn ClubStore,
    viewer: i64,
    club_id: i64,
) -> Result<bool, AppError> {
    let memberships = store.memberships_of_member(viewer).await?;
    Ok(role_in(&memberships, club_id).is_some_and(|r| r.can_manage()))
}
