use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::export::{self, ExportFormat};
use crate::store::ComplaintStore;

/// GET /complaints/export/{format}
/// Downloads the whole list as `csv`, `txt` or `pdf`.
pub async fn export(
    store: web::Data<dyn ComplaintStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let format = ExportFormat::from_extension(&path.into_inner()).ok_or(AppError::NotFound)?;
    let complaints = store.list().await?;

    let body = match format {
        ExportFormat::Csv => export::to_csv(&complaints).into_bytes(),
        ExportFormat::Txt => export::to_txt(&complaints).into_bytes(),
        // Image decoding and compression are CPU bound.
        ExportFormat::Pdf => web::block(move || export::to_pdf(&complaints))
            .await
            .map_err(|e| AppError::Export(e.to_string()))??,
    };

    log::info!("Exported {} as {}", format.filename(), format.content_type());

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", format.filename()),
        ))
        .body(body))
}
