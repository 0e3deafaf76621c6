//! Read-only query handlers behind the API.
//!
//! Each one takes the store, the caller's member id (`None` when the request
//! is unauthenticated) and the current local time. Callers without access get
//! an empty result; fetch failures are logged and also yield an empty result.

pub mod club;
pub mod export;
pub mod member;

pub use club::*;
pub use export::*;
pub use member::*;

use chrono::NaiveDateTime;

use crate::errors::AppError;
use crate::models::{Event, Membership, MembershipRole};
use crate::stats::{EventPhase, EventWindow, StatsError};

/// Role of the member in `club_id`, if they belong to it.
pub fn role_in(memberships: &[Membership], club_id: i64) -> Option<MembershipRole> {
    memberships
        .iter()
        .find(|m| m.club_id == club_id)
        .map(|m| m.role)
}

/// Events whose window has opened by `now` (past or active), in input order.
pub fn started_events(events: &[Event], now: NaiveDateTime) -> Result<Vec<Event>, StatsError> {
    let mut started = Vec::with_capacity(events.len());
    for event in events {
        if EventWindow::for_event(event)?.phase(now) != EventPhase::Upcoming {
            started.push(event.clone());
        }
    }
    Ok(started)
}

/// Drop events whose window cannot be built, logging each one.
pub fn schedulable_events(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| match EventWindow::for_event(event) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("event {} skipped: {e}", event.id);
                false
            }
        })
        .collect()
}

/// Unwrap a service result, logging the failure and falling back to `T::default()`.
pub(crate) fn or_empty<T: Default>(result: Result<T, AppError>, context: &str) -> T {
    result.unwrap_or_else(|e| {
        log::error!("{context} failed: {e}");
        T::default()
    })
}
