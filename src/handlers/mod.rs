pub mod api_v1;
pub mod complaint_handlers;

use actix_web::web;

/// Page, export and API routes. Static files and the fallback are added by
/// `configure_app`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(complaint_handlers::index))
        .route("/complaints", web::post().to(complaint_handlers::submit))
        .route("/complaints/export/{format}", web::get().to(complaint_handlers::export))
        .route("/complaints/{id}", web::get().to(complaint_handlers::detail))
        .route("/complaints/{id}/status", web::post().to(complaint_handlers::update_status))
        .service(web::scope("/api/v1").configure(api_v1::configure));
}
