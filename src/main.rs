use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, HttpServer, middleware, web};

use clubdash::config::AppConfig;
use clubdash::errors::AppError;
use clubdash::store::{ClubStore, PgStore};
use clubdash::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = db::init_pool(&config).await.map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;

    let store: Arc<dyn ClubStore> = Arc::new(PgStore::new(pool));
    let store = web::Data::from(store);

    log::info!("Starting server at http://{}", config.bind_addr);

    let secret_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .service(web::scope("/api/v1").configure(handlers::api_v1::configure))
            .default_service(web::to(|| async { Err::<HttpResponse, _>(AppError::NotFound) }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
