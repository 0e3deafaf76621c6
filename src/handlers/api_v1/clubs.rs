use actix_session::Session;
use actix_web::{web, HttpResponse};

use super::local_now;
use crate::auth::session::get_member_id;
use crate::errors::AppError;
use crate::services;
use crate::store::ClubStore;

/// GET /api/v1/clubs/{club_id}/members/{member_id} - A member's profile scoped to one club.
pub async fn member_profile(
    store: web::Data<dyn ClubStore>,
    session: Session,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (club_id, member_id) = path.into_inner();
    let profile = services::member_profile(
        store.get_ref(),
        get_member_id(&session),
        member_id,
        Some(club_id),
        local_now(),
    )
    .await;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/v1/clubs/{club_id}/performance - Club reporting, owners and admins only.
pub async fn performance(
    store: web::Data<dyn ClubStore>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let club_id = path.into_inner();
    let report =
        services::club_performance(store.get_ref(), get_member_id(&session), club_id, local_now())
            .await;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/v1/clubs/{club_id}/export.csv - Registrations with outcomes as CSV.
pub async fn export_csv(
    store: web::Data<dyn ClubStore>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let club_id = path.into_inner();
    let rows = services::club_export(store.get_ref(), get_member_id(&session), club_id)
        .await
        .unwrap_or_default();
    let body = services::export_csv(&rows)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"club-{club_id}-attendance.csv\""),
        ))
        .body(body))
}

/// GET /api/v1/clubs/{club_id}/export.json - Same rows as the CSV export, `[]` without access.
pub async fn export_json(
    store: web::Data<dyn ClubStore>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let club_id = path.into_inner();
    let rows = services::club_export(store.get_ref(), get_member_id(&session), club_id)
        .await
        .unwrap_or_default();
    Ok(HttpResponse::Ok().json(rows))
}
