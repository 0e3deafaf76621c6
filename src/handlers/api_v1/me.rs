use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::local_now;
use crate::auth::session::get_member_id;
use crate::errors::AppError;
use crate::services;
use crate::store::ClubStore;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub club_id: Option<i64>,
}

/// GET /api/v1/me/profile - The signed-in member's profile and stats, `null` when signed out.
pub async fn profile(
    store: web::Data<dyn ClubStore>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let profile = services::own_profile(store.get_ref(), get_member_id(&session), local_now()).await;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/v1/me/history - Started registered events, newest first.
/// Query params: club_id (optional filter).
pub async fn history(
    store: web::Data<dyn ClubStore>,
    session: Session,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = services::attendance_history(
        store.get_ref(),
        get_member_id(&session),
        query.club_id,
        local_now(),
    )
    .await;
    Ok(HttpResponse::Ok().json(entries))
}

/// GET /api/v1/me/events - Active and upcoming events across the member's clubs.
pub async fn events(
    store: web::Data<dyn ClubStore>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let events = services::member_events(store.get_ref(), get_member_id(&session), local_now()).await;
    Ok(HttpResponse::Ok().json(events))
}
