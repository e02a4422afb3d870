//! Report exports over complaints that went through a real store.

mod common;

use signassist::export::{to_csv, to_pdf, to_txt};
use signassist::models::complaint::{Complaint, ComplaintStatus};
use signassist::store::{ComplaintStore, MemoryStore};
use common::*;

async fn stored(forms: Vec<signassist::models::complaint::ComplaintForm>) -> Vec<Complaint> {
    let store = MemoryStore::new();
    for form in forms {
        store.append(form.validate().expect("valid")).await.expect("append");
    }
    store.list().await.expect("list")
}

#[tokio::test]
async fn test_submission_to_csv_end_to_end() {
    let before = chrono::Utc::now();
    let complaints = stored(vec![valid_form()]).await;

    assert_eq!(complaints.len(), 1);
    assert_eq!(complaints[0].status, ComplaintStatus::Open);
    assert!(complaints[0].created_at >= before);

    let csv = to_csv(&complaints);
    let lines: Vec<&str> = csv.split('\n').collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ID,Date,Status,User Name"));
    assert!(lines[1].starts_with("1,"));
    assert!(lines[1].contains(&format!("\"{PROBLEM}\"")));
    assert!(!csv.contains("data:image"));
}

#[tokio::test]
async fn test_csv_quotes_embedded_quotes() {
    let mut form = valid_form();
    form.solution = "Told the user to \"turn it off and on\"".to_string();
    let csv = to_csv(&stored(vec![form]).await);
    assert!(csv.contains("\"Told the user to \"\"turn it off and on\"\"\""));
}

#[tokio::test]
async fn test_txt_has_one_block_per_complaint() {
    let complaints = stored(vec![form_for("First"), form_for("Second")]).await;
    let txt = to_txt(&complaints);

    let blocks: Vec<&str> = txt.split("\n\n").collect();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].starts_with("ID: 2\n"));
    assert!(blocks[0].contains("User: Second"));
    assert!(blocks[1].contains("User: First"));
    assert!(blocks[1].trim_end().ends_with(&"-".repeat(36)));
}

#[tokio::test]
async fn test_pdf_has_a_page_per_complaint() {
    let complaints = stored(vec![form_for("First"), form_for("Second")]).await;
    let bytes = to_pdf(&complaints).expect("pdf");

    assert!(bytes.starts_with(b"%PDF"));
    let doc = lopdf::Document::load_mem(&bytes).expect("parses");
    assert_eq!(doc.get_pages().len(), 2);
}

#[tokio::test]
async fn test_pdf_is_landscape_with_both_signatures_boxed() {
    let complaints = stored(vec![form_for("First"), form_for("Second")]).await;
    let bytes = to_pdf(&complaints).expect("pdf");
    let doc = lopdf::Document::load_mem(&bytes).expect("parses");

    let box_w = 80.0 * 72.0 / 25.4;
    let box_h = 40.0 * 72.0 / 25.4;
    let close = |a: f32, b: f32| (a - b).abs() < 0.01;

    for page_id in doc.get_pages().into_values() {
        let page = doc.get_object(page_id).and_then(|o| o.as_dict()).expect("page dict");

        let media_box: Vec<f32> = page
            .get(b"MediaBox")
            .and_then(|o| o.as_array())
            .expect("MediaBox")
            .iter()
            .map(|v| v.as_float().expect("number"))
            .collect();
        assert!(media_box[2] > media_box[3], "landscape: {media_box:?}");

        let xobjects = page
            .get(b"Resources")
            .and_then(|o| o.as_dict())
            .and_then(|r| r.get(b"XObject"))
            .and_then(|o| o.as_dict())
            .expect("XObject resources");
        for name in [&b"ImUser"[..], b"ImRep"] {
            let id = xobjects.get(name).and_then(|o| o.as_reference()).expect("image ref");
            let image = doc.get_object(id).and_then(|o| o.as_stream()).expect("image stream");
            let width = image.dict.get(b"Width").and_then(|o| o.as_i64()).expect("Width");
            let height = image.dict.get(b"Height").and_then(|o| o.as_i64()).expect("Height");
            assert_eq!((width, height), (PAD_WIDTH as i64, PAD_HEIGHT as i64));
        }

        let content = doc.get_page_content(page_id).expect("content");
        let content = lopdf::content::Content::decode(&content).expect("decodes");
        let placements: Vec<(f32, f32)> = content
            .operations
            .iter()
            .filter(|op| op.operator == "cm")
            .map(|op| {
                let w = op.operands[0].as_float().expect("w");
                let h = op.operands[3].as_float().expect("h");
                (w, h)
            })
            .collect();
        assert_eq!(placements.len(), 2);
        for (w, h) in placements {
            assert!(close(w, box_w) && close(h, box_h), "image placed at {w}x{h}");
        }
    }
}

#[tokio::test]
async fn test_pdf_survives_unusable_signatures() {
    let complaints = stored(vec![valid_form()]).await;
    let mut broken = complaints[0].clone();
    broken.user_signature = "data:image/png;base64,AAAA".to_string();
    broken.representative_signature.clear();

    let bytes = to_pdf(&[broken]).expect("pdf");
    let doc = lopdf::Document::load_mem(&bytes).expect("parses");
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_pdf_of_nothing_is_one_page() {
    let bytes = to_pdf(&[]).expect("pdf");
    let doc = lopdf::Document::load_mem(&bytes).expect("parses");
    assert_eq!(doc.get_pages().len(), 1);
}
