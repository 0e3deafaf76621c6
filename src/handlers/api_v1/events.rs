use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::local_now;
use crate::errors::AppError;
use crate::stats::EventWindow;

#[derive(Deserialize)]
pub struct ActiveQuery {
    pub date: String,
    pub time: String,
    pub duration: Option<i32>,
}

#[derive(Serialize)]
pub struct ActiveResponse {
    pub active: bool,
    pub start: String,
    pub end: String,
}

/// GET /api/v1/events/active - Whether an event window contains the current time.
/// Query params: date (YYYY-MM-DD), time (HH:MM), duration (minutes, default 60).
/// Polled by the UI; an unparseable time is a 400.
pub async fn active(query: web::Query<ActiveQuery>) -> Result<HttpResponse, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {:?}", query.date)))?;
    let window = EventWindow::new(date, &query.time, query.duration)?;

    Ok(HttpResponse::Ok().json(ActiveResponse {
        active: window.contains(local_now()),
        start: window.start.format("%Y-%m-%dT%H:%M").to_string(),
        end: window.end.format("%Y-%m-%dT%H:%M").to_string(),
    }))
}
