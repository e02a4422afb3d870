pub mod auth;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod signature;
pub mod store;
pub mod templates_structs;

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use askama::Template;

use crate::config::AppConfig;
use crate::store::ComplaintStore;
use crate::templates_structs::NotFoundTemplate;

/// Register shared state, body limits, routes, static assets and the 404
/// fallback. Used by `main` and by the integration tests.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    store: Arc<dyn ComplaintStore>,
    config: Arc<AppConfig>,
) {
    let limit = config.payload_limit;
    cfg.app_data(web::Data::from(store))
        .app_data(web::Data::from(config))
        .app_data(web::FormConfig::default().limit(limit))
        .app_data(web::JsonConfig::default().limit(limit))
        .configure(handlers::routes)
        .service(actix_files::Files::new("/static", "./static"))
        .default_service(web::to(not_found));
}

async fn not_found(config: web::Data<AppConfig>) -> HttpResponse {
    let tmpl = NotFoundTemplate { app_name: config.app_name.clone() };
    let body = tmpl.render().unwrap_or_else(|e| {
        log::error!("Template error: {e}");
        "Not Found".to_string()
    });
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(body)
}
