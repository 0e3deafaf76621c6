use sqlx::PgPool;

use super::types::Event;

const EVENT_SELECT: &str = "\
SELECT e.id, e.club_id, e.title, e.event_type, e.event_date AS date, \
       e.start_time AS time, e.duration_minutes, \
       COALESCE(e.location, '') AS location, e.capacity \
FROM events e";

/// All events of the given clubs, chronological.
pub async fn find_by_clubs(pool: &PgPool, club_ids: &[i64]) -> Result<Vec<Event>, sqlx::Error> {
    if club_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "{EVENT_SELECT} WHERE e.club_id = ANY($1) ORDER BY e.event_date, e.start_time, e.id"
    );
    sqlx::query_as::<_, Event>(&sql)
        .bind(club_ids)
        .fetch_all(pool)
        .await
}

/// Events a member registered for, across every club, chronological.
pub async fn find_registered_by_member(
    pool: &PgPool,
    member_id: i64,
) -> Result<Vec<Event>, sqlx::Error> {
    let sql = format!(
        "{EVENT_SELECT} JOIN registrations r ON r.event_id = e.id \
         WHERE r.member_id = $1 ORDER BY e.event_date, e.start_time, e.id"
    );
    sqlx::query_as::<_, Event>(&sql)
        .bind(member_id)
        .fetch_all(pool)
        .await
}
