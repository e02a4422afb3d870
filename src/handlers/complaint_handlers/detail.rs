use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::{csrf, session::{set_flash, set_flash_error}};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::complaint::StatusForm;
use crate::store::ComplaintStore;
use crate::templates_structs::{ComplaintDetailTemplate, PageContext, SelectOption};

use super::helpers::change_status;

/// GET /complaints/{id}
pub async fn detail(
    store: web::Data<dyn ComplaintStore>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let complaint = store.find(id).await?.ok_or(AppError::NotFound)?;

    let ctx = PageContext::build(&session, &config);
    let tmpl = ComplaintDetailTemplate {
        ctx,
        filed_on: complaint.filed_on_display(),
        status_options: SelectOption::statuses(complaint.status),
        complaint,
    };
    render(tmpl)
}

/// POST /complaints/{id}/status
/// On failure the detail page shows the stored status again.
pub async fn update_status(
    store: web::Data<dyn ComplaintStore>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    if store.find(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    match change_status(store.get_ref(), id, &form.status).await {
        Ok(complaint) => {
            set_flash(&session, &format!("Complaint #{} marked as {}.", complaint.id, complaint.status));
        }
        Err(AppError::Operation(message)) => set_flash_error(&session, &message),
        Err(e) => return Err(e),
    }

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/complaints/{id}")))
        .finish())
}
