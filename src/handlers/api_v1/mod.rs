pub mod clubs;
pub mod dashboard;
pub mod events;
pub mod me;

use actix_web::web;
use chrono::{Local, NaiveDateTime};

/// Local wall-clock time the services compare event windows against.
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Configure API v1 routes. Everything here is read-only.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/me")
            .route("/profile", web::get().to(me::profile))
            .route("/history", web::get().to(me::history))
            .route("/events", web::get().to(me::events)),
    );
    cfg.service(
        web::scope("/clubs/{club_id}")
            .route("/members/{member_id}", web::get().to(clubs::member_profile))
            .route("/performance", web::get().to(clubs::performance))
            .route("/export.csv", web::get().to(clubs::export_csv))
            .route("/export.json", web::get().to(clubs::export_json)),
    );
    cfg.route("/dashboard", web::get().to(dashboard::index));
    cfg.route("/events/active", web::get().to(events::active));
}
