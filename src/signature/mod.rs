//! Freehand signature capture.
//!
//! `SignaturePad` is the pointer-driven state machine; it draws through any
//! `DrawingSurface`. `RasterSurface` is the in-memory implementation used on
//! the server, and `static/js/signature-pad.js` binds the same contract to a
//! browser `<canvas>`. Results travel as PNG data URLs (`SignatureImage`).

pub mod encoding;
pub mod pad;
pub mod surface;

use std::fmt;

pub use encoding::{SignatureImage, decode_data_url, encode_png_data_url, PNG_DATA_URL_PREFIX};
pub use pad::{EventOutcome, PadState, PointerEvent, SignaturePad, SurfaceBounds};
pub use surface::{DrawingSurface, Point, RasterSurface};

#[derive(Debug)]
pub enum SignatureError {
    /// The string is not a `data:` URL.
    NotDataUrl,
    /// The data URL does not carry a base64 payload.
    NotBase64,
    UnsupportedMediaType(String),
    Base64(base64::DecodeError),
    Image(image::ImageError),
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::NotDataUrl => write!(f, "not a data URL"),
            SignatureError::NotBase64 => write!(f, "data URL is not base64 encoded"),
            SignatureError::UnsupportedMediaType(m) => write!(f, "unsupported media type '{m}'"),
            SignatureError::Base64(e) => write!(f, "invalid base64 payload: {e}"),
            SignatureError::Image(e) => write!(f, "invalid image: {e}"),
        }
    }
}

impl std::error::Error for SignatureError {}

impl From<base64::DecodeError> for SignatureError {
    fn from(e: base64::DecodeError) -> Self {
        SignatureError::Base64(e)
    }
}

impl From<image::ImageError> for SignatureError {
    fn from(e: image::ImageError) -> Self {
        SignatureError::Image(e)
    }
}
