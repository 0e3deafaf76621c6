use actix_session::Session;
use actix_web::{web, HttpResponse};

use super::local_now;
use crate::auth::session::get_member_id;
use crate::errors::AppError;
use crate::services;
use crate::store::ClubStore;

/// GET /api/v1/dashboard - Metrics for every club the member owns or administers.
pub async fn index(
    store: web::Data<dyn ClubStore>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let dashboard =
        services::owner_dashboard(store.get_ref(), get_member_id(&session), local_now()).await;
    Ok(HttpResponse::Ok().json(dashboard))
}
