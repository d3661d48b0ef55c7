use actix_cors::Cors;
use actix_web::web;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(handlers::json_config())
            .route("/chat", web::post().to(handlers::chat))
    )
    .route("/health", web::get().to(handlers::health_check));
}

/// Every origin, method and header is allowed.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .send_wildcard()
}
