//! Shared test infrastructure.
//!
//! - `signature(...)` draws a real signature through `SignaturePad`
//! - `valid_form()` / `new_complaint()` build submissions that pass validation
//! - `check_store_contract()` runs the same assertions against any backend
//! - `csrf_token()` / `session_cookie()` drive the HTML flows

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use regex::Regex;

use signassist::config::AppConfig;
use signassist::models::complaint::{ComplaintForm, ComplaintStatus, NewComplaint};
use signassist::signature::{Point, PointerEvent, RasterSurface, SignaturePad, SurfaceBounds};
use signassist::store::ComplaintStore;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const PAD_WIDTH: f32 = 300.0;
pub const PAD_HEIGHT: f32 = 100.0;
pub const PROBLEM: &str = "Screen flickers, then goes black after a minute";
pub const SOLUTION: &str = "Replaced the display cable and tested for an hour";

// ============================================================================
// SIGNATURES
// ============================================================================

/// Draw a short diagonal stroke and return the emitted data URL.
pub fn signature() -> String {
    signature_at(1.0)
}

pub fn signature_at(pixel_ratio: f32) -> String {
    let mut pad = SignaturePad::new();
    pad.mount(
        RasterSurface::new(PAD_WIDTH, PAD_HEIGHT, pixel_ratio),
        SurfaceBounds::default(),
    );
    pad.handle(PointerEvent::MouseDown(Point::new(20.0, 20.0)));
    pad.handle(PointerEvent::MouseMove(Point::new(80.0, 60.0)));
    pad.handle(PointerEvent::MouseMove(Point::new(140.0, 30.0)));
    pad.handle(PointerEvent::MouseUp);
    pad.value().to_string()
}

// ============================================================================
// SUBMISSIONS
// ============================================================================

/// A submission that passes validation.
pub fn valid_form() -> ComplaintForm {
    form_for("Ada Lovelace")
}

pub fn form_for(user_name: &str) -> ComplaintForm {
    ComplaintForm {
        user_name: user_name.to_string(),
        room_number: "101".to_string(),
        section: "Cardiology".to_string(),
        product_type: "Monitor".to_string(),
        product_serial_number: "SN123456789".to_string(),
        problem_description: PROBLEM.to_string(),
        user_signature: signature(),
        representative_name: "Grace Hopper".to_string(),
        solution: SOLUTION.to_string(),
        representative_signature: signature(),
        csrf_token: String::new(),
    }
}

pub fn new_complaint(user_name: &str) -> NewComplaint {
    form_for(user_name).validate().expect("valid form")
}

// ============================================================================
// STORE CONTRACT
// ============================================================================

/// Behavior every `ComplaintStore` must share. Expects an empty store.
pub async fn check_store_contract(store: &dyn ComplaintStore) {
    assert!(store.list().await.expect("list").is_empty());

    let before = chrono::Utc::now();
    let first = store.append(new_complaint("First")).await.expect("append first");
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.append(new_complaint("Second")).await.expect("append second");

    assert_ne!(first.id, second.id);
    assert_eq!(first.status, ComplaintStatus::Open);
    assert!(first.created_at >= before - chrono::Duration::seconds(1));
    assert_eq!(first.problem_description, PROBLEM);

    let listed = store.list().await.expect("list");
    let names: Vec<&str> = listed.iter().map(|c| c.user_name.as_str()).collect();
    assert_eq!(names, vec!["Second", "First"]);

    let found = store.find(first.id).await.expect("find").expect("first exists");
    assert_eq!(found, first);
    assert!(store.find(first.id + second.id + 1000).await.expect("find").is_none());

    let closed = store
        .update_status(first.id, ComplaintStatus::Closed)
        .await
        .expect("update")
        .expect("first exists");
    assert_eq!(closed.status, ComplaintStatus::Closed);
    assert_eq!(closed.created_at, first.created_at);

    let missing = store
        .update_status(first.id + second.id + 1000, ComplaintStatus::Closed)
        .await
        .expect("update missing");
    assert!(missing.is_none());

    let after = store.list().await.expect("list");
    assert_eq!(after.len(), 2);
    let statuses: Vec<ComplaintStatus> = after.iter().map(|c| c.status).collect();
    assert_eq!(statuses, vec![ComplaintStatus::Open, ComplaintStatus::Closed]);
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

pub fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        app_name: "SignAssist Test".to_string(),
        ..AppConfig::default()
    })
}

/// Pull the CSRF token out of a rendered form.
pub fn csrf_token(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).expect("valid regex");
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("page carries a CSRF token")
}

/// The session cookie set by a response, if any.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned())
}
