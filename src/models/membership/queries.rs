use sqlx::PgPool;

use super::types::Membership;

const MEMBERSHIP_SELECT: &str = "\
SELECT m.club_id, c.name AS club_name, m.member_id, m.role, m.joined_at \
FROM memberships m \
JOIN clubs c ON c.id = m.club_id";

/// Every club the member belongs to, oldest membership first.
pub async fn find_by_member(pool: &PgPool, member_id: i64) -> Result<Vec<Membership>, sqlx::Error> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE m.member_id = $1 ORDER BY m.joined_at, m.club_id");
    sqlx::query_as::<_, Membership>(&sql)
        .bind(member_id)
        .fetch_all(pool)
        .await
}

/// The roster of a club.
pub async fn find_by_club(pool: &PgPool, club_id: i64) -> Result<Vec<Membership>, sqlx::Error> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE m.club_id = $1 ORDER BY m.joined_at, m.member_id");
    sqlx::query_as::<_, Membership>(&sql)
        .bind(club_id)
        .fetch_all(pool)
        .await
}
