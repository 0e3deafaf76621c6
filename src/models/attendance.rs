use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            other => Err(format!("unknown attendance status: {other}")),
        }
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The recorded outcome for a member at an event. No row means "not yet marked".
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Attendance {
    pub event_id: i64,
    pub member_id: i64,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
    pub recorded_at: DateTime<Utc>,
}

impl Attendance {
    pub fn is_present(&self) -> bool {
        self.status == AttendanceStatus::Present
    }
}

pub async fn find_by_member(pool: &PgPool, member_id: i64) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "SELECT event_id, member_id, status, recorded_at FROM attendances \
         WHERE member_id = $1 ORDER BY recorded_at, event_id",
    )
    .bind(member_id)
    .fetch_all(pool)
    .await
}

/// Attendances of every member for the events of one club.
pub async fn find_by_club(pool: &PgPool, club_id: i64) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "SELECT a.event_id, a.member_id, a.status, a.recorded_at \
         FROM attendances a \
         JOIN events e ON e.id = a.event_id \
         WHERE e.club_id = $1 \
         ORDER BY a.recorded_at, a.event_id, a.member_id",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await
}
