use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::handlers::complaint_handlers::helpers::{change_status, submit_complaint, STATUS_UPDATED};
use crate::models::complaint::ComplaintForm;
use crate::store::ComplaintStore;
use crate::templates_structs::{ApiErrorResponse, ApiStatusRequest, ApiStatusResponse};

/// GET /api/v1/complaints - All complaints, newest first
pub async fn list(store: web::Data<dyn ComplaintStore>) -> Result<HttpResponse, AppError> {
    let complaints = store.list().await?;
    Ok(HttpResponse::Ok().json(complaints))
}

/// GET /api/v1/complaints/{id} - Get single complaint by ID
pub async fn read(
    store: web::Data<dyn ComplaintStore>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let complaint = store.find(path.into_inner()).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(complaint))
}

/// POST /api/v1/complaints - Submit a complaint
/// 201 with the stored record, 400 with per-field errors.
pub async fn create(
    store: web::Data<dyn ComplaintStore>,
    body: web::Json<ComplaintForm>,
) -> Result<HttpResponse, AppError> {
    let state = submit_complaint(store.get_ref(), &body).await;

    match state.complaint {
        Some(complaint) => Ok(HttpResponse::Created().json(complaint)),
        None if !state.errors.is_empty() => Ok(HttpResponse::BadRequest()
            .json(ApiErrorResponse::with_errors(state.message, state.errors))),
        None => Ok(HttpResponse::InternalServerError().json(ApiErrorResponse::new(state.message))),
    }
}

/// PUT /api/v1/complaints/{id}/status - Change status
/// Body: `{"status": "Open" | "Closed"}`
pub async fn update_status(
    store: web::Data<dyn ComplaintStore>,
    path: web::Path<i64>,
    body: web::Json<ApiStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let response = match change_status(store.get_ref(), id, &body.status).await {
        Ok(_) => ApiStatusResponse { success: true, message: STATUS_UPDATED.to_string() },
        Err(AppError::Operation(message)) => ApiStatusResponse { success: false, message },
        Err(e) => return Err(e),
    };

    if response.success {
        Ok(HttpResponse::Ok().json(response))
    } else {
        Ok(HttpResponse::BadRequest().json(response))
    }
}
