use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::errors::AppError;
use crate::models::complaint::Complaint;
use crate::signature::SignatureImage;

// A4 landscape, in points
const PAGE_WIDTH: f32 = 841.89;
const PAGE_HEIGHT: f32 = 595.28;

const MARGIN: f32 = 15.0;
const LABEL_COLUMN: f32 = 50.0;
const CELL_PADDING: f32 = 1.5;
const SIGNATURE_WIDTH: f32 = 80.0;
const SIGNATURE_HEIGHT: f32 = 40.0;
const HEADER_FILL: (f32, f32, f32) = (231.0 / 255.0, 48.0 / 255.0, 48.0 / 255.0);

const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = BODY_SIZE * 1.15;

fn mm(v: f32) -> f32 {
    v * 72.0 / 25.4
}

fn num(v: f32) -> Object {
    v.into()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }

    /// Rough advance per character, on the safe side so wrapped text stays
    /// inside its cell.
    fn char_width(&self, size: f32) -> f32 {
        match self {
            Font::Regular => size * 0.53,
            Font::Bold => size * 0.58,
        }
    }
}

/// Map text to WinAnsi bytes for the standard Type1 fonts.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' | '\r' | '\n' => b' ',
            c if (c as u32) < 0x20 => b' ',
            c if (c as u32) <= 0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap to `max_width` points. Explicit line breaks are kept and
/// words wider than a line are split.
fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / font.char_width(size)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let line_len = line.chars().count();
            if line_len > 0 && line_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[derive(Default)]
struct Page {
    operations: Vec<Operation>,
    xobjects: Vec<(String, ObjectId)>,
}

impl Page {
    /// Text with its baseline `y` points from the top of the page.
    fn text(&mut self, font: Font, size: f32, x: f32, y: f32, gray: f32, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![num(gray), num(gray), num(gray)]),
            Operation::new("Tf", vec![Object::Name(font.resource().to_vec()), num(size)]),
            Operation::new("Td", vec![num(x), num(PAGE_HEIGHT - y)]),
            Operation::new("Tj", vec![Object::string_literal(encode_text(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn white_text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        self.text(font, size, x, y, 1.0, text);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgb: (f32, f32, f32)) {
        self.operations.extend([
            Operation::new("rg", vec![num(rgb.0), num(rgb.1), num(rgb.2)]),
            Operation::new("re", vec![num(x), num(PAGE_HEIGHT - y - h), num(w), num(h)]),
            Operation::new("f", vec![]),
        ]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, gray: f32) {
        self.operations.extend([
            Operation::new("w", vec![num(0.5)]),
            Operation::new("RG", vec![num(gray), num(gray), num(gray)]),
            Operation::new("re", vec![num(x), num(PAGE_HEIGHT - y - h), num(w), num(h)]),
            Operation::new("S", vec![]),
        ]);
    }

    fn image(&mut self, name: &str, id: ObjectId, x: f32, y: f32, w: f32, h: f32) {
        self.xobjects.push((name.to_string(), id));
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![num(w), num(0.0), num(0.0), num(h), num(x), num(PAGE_HEIGHT - y - h)],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
    }
}

/// Embed RGBA pixels as an RGB image with a soft mask for transparency.
fn add_image(doc: &mut Document, raster: &RgbaImage) -> ObjectId {
    let (width, height) = raster.dimensions();
    let mut rgb = Vec::with_capacity(raster.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(raster.len() / 4);
    for pixel in raster.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8_i64,
        },
        alpha,
    ));
    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "SMask" => smask_id,
        },
        rgb,
    ))
}

/// Lays out pages top-down with a cursor.
struct Layout<'a> {
    doc: &'a mut Document,
    pages: Vec<Page>,
    y: f32,
}

impl<'a> Layout<'a> {
    fn new(doc: &'a mut Document) -> Self {
        Self {
            doc,
            pages: vec![Page::default()],
            y: mm(MARGIN),
        }
    }

    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = mm(MARGIN);
    }

    fn bottom() -> f32 {
        PAGE_HEIGHT - mm(MARGIN)
    }

    fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * mm(MARGIN)
    }

    fn table_header(&mut self) {
        let x = mm(MARGIN);
        let label_w = mm(LABEL_COLUMN);
        let value_w = Self::content_width() - label_w;
        let pad = mm(CELL_PADDING);
        let h = LINE_HEIGHT + 2.0 * pad;
        let y = self.y;
        let baseline = y + pad + BODY_SIZE;

        let page = self.page();
        page.fill_rect(x, y, label_w + value_w, h, HEADER_FILL);
        page.white_text(Font::Bold, BODY_SIZE, x + pad, baseline, "Field");
        page.white_text(Font::Bold, BODY_SIZE, x + label_w + pad, baseline, "Value");
        page.stroke_rect(x, y, label_w, h, 0.78);
        page.stroke_rect(x + label_w, y, value_w, h, 0.78);
        self.y += h;
    }

    /// One table row; rows taller than the remaining space continue on the
    /// next page under a repeated header.
    fn table_row(&mut self, label: &str, value: &str) {
        let x = mm(MARGIN);
        let label_w = mm(LABEL_COLUMN);
        let value_w = Self::content_width() - label_w;
        let pad = mm(CELL_PADDING);

        let label_lines = wrap(label, Font::Bold, BODY_SIZE, label_w - 2.0 * pad);
        let mut value_lines = wrap(value, Font::Regular, BODY_SIZE, value_w - 2.0 * pad);
        let mut first_chunk = true;

        loop {
            let wanted = value_lines.len().max(if first_chunk { label_lines.len() } else { 1 });
            let room = ((Self::bottom() - self.y - 2.0 * pad) / LINE_HEIGHT).floor();
            if room < 1.0 || (first_chunk && (room as usize) < wanted.min(3)) {
                self.new_page();
                self.table_header();
                continue;
            }
            let take = wanted.min(room as usize);
            let rest = value_lines.split_off(take.min(value_lines.len()));
            let h = take as f32 * LINE_HEIGHT + 2.0 * pad;
            let y = self.y;

            let page = self.page();
            page.stroke_rect(x, y, label_w, h, 0.78);
            page.stroke_rect(x + label_w, y, value_w, h, 0.78);
            if first_chunk {
                for (i, line) in label_lines.iter().take(take).enumerate() {
                    let baseline = y + pad + BODY_SIZE + i as f32 * LINE_HEIGHT;
                    page.text(Font::Bold, BODY_SIZE, x + pad, baseline, 0.0, line);
                }
            }
            for (i, line) in value_lines.iter().enumerate() {
                let baseline = y + pad + BODY_SIZE + i as f32 * LINE_HEIGHT;
                page.text(Font::Regular, BODY_SIZE, x + label_w + pad, baseline, 0.0, line);
            }

            self.y += h;
            first_chunk = false;
            if rest.is_empty() {
                break;
            }
            value_lines = rest;
        }
    }

    fn signatures(&mut self, complaint: &Complaint) {
        let needed = mm(15.0 + 13.0 + SIGNATURE_HEIGHT);
        if self.y + needed > Self::bottom() {
            self.new_page();
        }

        let final_y = self.y;
        let left = mm(MARGIN);
        let right = PAGE_WIDTH / 2.0;
        let box_y = final_y + mm(28.0);

        let user = embed_signature(self.doc, &complaint.user_signature);
        let representative = embed_signature(self.doc, &complaint.representative_signature);

        let page = self.page();
        page.text(Font::Regular, 12.0, left, final_y + mm(15.0), 0.0, "Signatures");
        page.text(Font::Regular, BODY_SIZE, left, final_y + mm(25.0), 0.0, "User Signature");
        page.text(Font::Regular, BODY_SIZE, right, final_y + mm(25.0), 0.0, "Representative Signature");

        let (w, h) = (mm(SIGNATURE_WIDTH), mm(SIGNATURE_HEIGHT));
        if let Some(id) = user {
            page.image("ImUser", id, left, box_y, w, h);
        }
        if let Some(id) = representative {
            page.image("ImRep", id, right, box_y, w, h);
        }
        page.stroke_rect(left, box_y, w, h, 0.0);
        page.stroke_rect(right, box_y, w, h, 0.0);

        self.y = box_y + h;
    }

    fn complaint(&mut self, complaint: &Complaint, first: bool) {
        if !first {
            self.new_page();
        }
        let left = mm(MARGIN);

        self.page().text(Font::Regular, 14.0, left, mm(35.0), 0.0, &format!("Complaint #{}", complaint.id));
        let date = format!("Date: {}", complaint.created_display());
        let status = format!("Status: {}", complaint.status);
        let page = self.page();
        page.text(Font::Regular, BODY_SIZE, left, mm(42.0), 0.39, &date);
        page.text(Font::Regular, BODY_SIZE, PAGE_WIDTH / 2.0, mm(42.0), 0.39, &status);
        self.y = mm(50.0);

        self.table_header();
        let rows = [
            ("User Name", complaint.user_name.as_str()),
            ("Room Number", complaint.room_number.as_str()),
            ("Section", complaint.section.as_str()),
            ("Product Type", complaint.product_type.as_str()),
            ("Product Serial Number", complaint.product_serial_number.as_str()),
            ("Problem Description", complaint.problem_description.as_str()),
            ("Representative Name", complaint.representative_name.as_str()),
            ("Solution Provided", complaint.solution.as_str()),
        ];
        for (label, value) in rows {
            self.table_row(label, value);
        }

        self.signatures(complaint);
    }
}

/// Decode and embed a signature. Empty or undecodable strings yield `None`
/// and the box is drawn empty.
fn embed_signature(doc: &mut Document, data_url: &str) -> Option<ObjectId> {
    if data_url.is_empty() {
        return None;
    }
    match SignatureImage::parse(data_url).and_then(|img| img.decode()) {
        Ok(raster) => Some(add_image(doc, &raster)),
        Err(e) => {
            log::warn!("Skipping signature in PDF export: {e}");
            None
        }
    }
}

/// Render the landscape complaints report.
pub fn to_pdf(complaints: &[Complaint]) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.5");

    let pages = {
        let mut layout = Layout::new(&mut doc);
        layout.page().text(Font::Regular, 20.0, mm(MARGIN), mm(20.0), 0.0, "Complaints Report");
        if complaints.is_empty() {
            layout.page().text(
                Font::Regular,
                BODY_SIZE,
                mm(MARGIN),
                mm(35.0),
                0.39,
                "No complaints have been submitted.",
            );
        }
        for (i, complaint) in complaints.iter().enumerate() {
            layout.complaint(complaint, i == 0);
        }
        layout.pages
    };

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let fonts_id = doc.add_object(dictionary! {
        "F1" => regular_id,
        "F2" => bold_id,
    });

    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| AppError::Export(format!("PDF content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let mut xobjects = lopdf::Dictionary::new();
        for (name, id) in page.xobjects {
            xobjects.set(name, id);
        }
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), num(PAGE_WIDTH), num(PAGE_HEIGHT)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => fonts_id,
                "XObject" => xobjects,
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| AppError::Export(format!("PDF write: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let max = 100.0;
        let lines = wrap("the printer on the third floor keeps jamming", Font::Regular, 10.0, max);
        let max_chars = (max / Font::Regular.char_width(10.0)).floor() as usize;
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= max_chars));
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap(&"x".repeat(50), Font::Regular, 10.0, 55.0);
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn wrap_keeps_line_breaks() {
        let lines = wrap("first\nsecond", Font::Regular, 10.0, 500.0);
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn text_is_winansi() {
        assert_eq!(encode_text("café\n€"), vec![b'c', b'a', b'f', 0xE9, b' ', b'?']);
    }
}
