use std::collections::HashMap;

use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::{csrf, session::{set_flash, set_flash_error}};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::complaint::{ComplaintForm, ValidationErrors};
use crate::store::ComplaintStore;
use crate::templates_structs::{ComplaintRowView, HomeTab, HomeTemplate, PageContext, SelectOption};

use super::helpers::submit_complaint;

/// GET /
/// Tabbed page: the complaint form, or the list with `?tab=list`.
pub async fn index(
    store: web::Data<dyn ComplaintStore>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let tab = HomeTab::from_query(query.get("tab").map(String::as_str));
    render_home(
        store.get_ref(),
        &config,
        &session,
        tab,
        ComplaintForm::default(),
        ValidationErrors::default(),
    )
    .await
}

/// POST /complaints
/// Invalid submissions re-render the form with the entered values and
/// per-field messages; nothing is stored.
pub async fn submit(
    store: web::Data<dyn ComplaintStore>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<ComplaintForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let form = form.into_inner();
    let state = submit_complaint(store.get_ref(), &form).await;

    if state.success {
        set_flash(&session, &state.message);
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/?tab=list"))
            .finish());
    }

    set_flash_error(&session, &state.message);
    render_home(store.get_ref(), &config, &session, HomeTab::Form, form, state.errors).await
}

async fn render_home(
    store: &dyn ComplaintStore,
    config: &AppConfig,
    session: &Session,
    tab: HomeTab,
    mut form: ComplaintForm,
    errors: ValidationErrors,
) -> Result<HttpResponse, AppError> {
    let complaints = store.list().await?;
    let product_options = SelectOption::product_types(form.product_type.trim());
    form.csrf_token.clear();

    let ctx = PageContext::build(session, config);
    let tmpl = HomeTemplate {
        ctx,
        tab,
        form,
        errors,
        product_options,
        complaints: complaints.iter().map(ComplaintRowView::from).collect(),
    };
    render(tmpl)
}
