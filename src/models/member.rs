use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Member {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "SELECT id, display_name, email, created_at FROM members WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Members of a club, by display name.
pub async fn find_by_club(pool: &PgPool, club_id: i64) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "SELECT mb.id, mb.display_name, mb.email, mb.created_at \
         FROM members mb \
         JOIN memberships m ON m.member_id = mb.id \
         WHERE m.club_id = $1 \
         ORDER BY mb.display_name, mb.id",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await
}
