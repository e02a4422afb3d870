pub mod complaints;
pub mod signatures;

use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::Next,
};

use crate::templates_structs::ApiErrorResponse;

/// CSRF protection for REST API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests without Content-Type: application/json.
/// A plain cross-origin form POST cannot carry that header. GET requests
/// are exempt.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == Method::POST || method == Method::PUT || method == Method::DELETE {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = ApiErrorResponse::new(
                "Content-Type must be application/json for mutation requests",
            );
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure API v1 routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/complaints")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(complaints::list))
            .route("", web::post().to(complaints::create))
            .route("/{id}", web::get().to(complaints::read))
            .route("/{id}/status", web::put().to(complaints::update_status))
    );
    cfg.service(
        web::scope("/signatures")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/render", web::post().to(signatures::render))
    );
}
