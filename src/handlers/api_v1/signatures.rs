use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::signature::{decode_data_url, PointerEvent, RasterSurface, SignaturePad, SurfaceBounds};
use crate::templates_structs::{ApiErrorResponse, ApiRenderRequest, ApiRenderResponse};

/// Largest accepted surface edge, in CSS pixels.
const MAX_CSS_EDGE: f32 = 2000.0;
const MAX_PIXEL_RATIO: f32 = 4.0;

/// POST /api/v1/signatures/render - Replay strokes on a server-side surface
///
/// Each stroke is fed through the pad as down / move... / up, exactly as
/// pointer input would be, and the last emitted image is returned.
pub async fn render(body: web::Json<ApiRenderRequest>) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();

    if let Some(problem) = check_geometry(&req) {
        return Ok(HttpResponse::BadRequest().json(ApiErrorResponse::new(problem)));
    }

    let strokes = req.strokes.len();
    // Rasterizing and PNG encoding are CPU bound.
    let response = web::block(move || replay(req))
        .await
        .map_err(|e| AppError::Export(e.to_string()))??;

    log::info!(
        "Rendered {strokes} stroke(s) on a {}x{} surface",
        response.width,
        response.height
    );

    Ok(HttpResponse::Ok().json(response))
}

fn replay(req: ApiRenderRequest) -> Result<ApiRenderResponse, AppError> {
    let base = req.base.filter(|b| !b.trim().is_empty());
    if let Some(base) = base.as_deref() {
        decode_data_url(base)?;
    }

    let mut pad = match base {
        Some(base) => SignaturePad::with_value(base),
        None => SignaturePad::new(),
    };
    pad.mount(
        RasterSurface::new(req.width, req.height, req.pixel_ratio),
        SurfaceBounds::default(),
    );

    for stroke in &req.strokes {
        let Some((first, rest)) = stroke.split_first() else {
            continue;
        };
        pad.handle(PointerEvent::MouseDown(*first));
        for p in rest {
            pad.handle(PointerEvent::MouseMove(*p));
        }
        pad.handle(PointerEvent::MouseUp);
    }

    let signature = pad
        .snapshot()
        .ok_or_else(|| AppError::Export("failed to encode signature surface".to_string()))?;
    let (width, height) = pad
        .surface()
        .map(|s| s.raster().dimensions())
        .unwrap_or_default();

    Ok(ApiRenderResponse { signature, width, height })
}

fn check_geometry(req: &ApiRenderRequest) -> Option<String> {
    let edge_ok = |v: f32| v.is_finite() && v > 0.0 && v <= MAX_CSS_EDGE;
    if !edge_ok(req.width) || !edge_ok(req.height) {
        return Some(format!("width and height must be between 0 and {MAX_CSS_EDGE}"));
    }
    if !(req.pixel_ratio.is_finite() && req.pixel_ratio > 0.0 && req.pixel_ratio <= MAX_PIXEL_RATIO) {
        return Some(format!("pixelRatio must be between 0 and {MAX_PIXEL_RATIO}"));
    }
    let coord_ok = |v: f32| v.is_finite() && v.abs() <= MAX_CSS_EDGE;
    if req.strokes.iter().flatten().any(|p| !coord_ok(p.x) || !coord_ok(p.y)) {
        return Some(format!("stroke points must lie within -{MAX_CSS_EDGE} and {MAX_CSS_EDGE}"));
    }
    None
}
