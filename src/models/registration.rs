use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// A member's stated intent to attend an event. At most one per (event, member).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Registration {
    pub event_id: i64,
    pub member_id: i64,
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_member(pool: &PgPool, member_id: i64) -> Result<Vec<Registration>, sqlx::Error> {
    sqlx::query_as::<_, Registration>(
        "SELECT event_id, member_id, created_at FROM registrations \
         WHERE member_id = $1 ORDER BY created_at, event_id",
    )
    .bind(member_id)
    .fetch_all(pool)
    .await
}

/// Registrations of every member for the events of one club.
pub async fn find_by_club(pool: &PgPool, club_id: i64) -> Result<Vec<Registration>, sqlx::Error> {
    sqlx::query_as::<_, Registration>(
        "SELECT r.event_id, r.member_id, r.created_at \
         FROM registrations r \
         JOIN events e ON e.id = r.event_id \
         WHERE e.club_id = $1 \
         ORDER BY r.created_at, r.event_id, r.member_id",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await
}
