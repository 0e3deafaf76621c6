use chrono::NaiveDate;
use serde::Serialize;

/// A scheduled club event. `time` is the local start time as stored (`HH:MM`).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub club_id: i64,
    pub title: String,
    pub event_type: String,
    pub date: NaiveDate,
    pub time: String,
    pub duration_minutes: Option<i32>,
    pub location: String,
    pub capacity: Option<i32>,
}
