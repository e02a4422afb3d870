use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};

use super::SignatureError;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode a raster as `data:image/png;base64,...`.
pub fn encode_png_data_url(raster: &RgbaImage) -> Result<String, SignatureError> {
    let mut png = Vec::new();
    raster.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(&png)))
}

/// A parsed `data:image/...;base64,` string.
///
/// Parsing only checks the envelope and the base64 payload; `decode` does
/// the actual image decoding.
#[derive(Debug, Clone)]
pub struct SignatureImage {
    media_type: String,
    bytes: Vec<u8>,
}

impl SignatureImage {
    pub fn parse(data_url: &str) -> Result<Self, SignatureError> {
        let rest = data_url
            .trim()
            .strip_prefix("data:")
            .ok_or(SignatureError::NotDataUrl)?;
        let (meta, payload) = rest.split_once(',').ok_or(SignatureError::NotDataUrl)?;
        let media_type = meta
            .strip_suffix(";base64")
            .ok_or(SignatureError::NotBase64)?;
        if !media_type.starts_with("image/") {
            return Err(SignatureError::UnsupportedMediaType(media_type.to_string()));
        }
        let bytes = STANDARD.decode(payload)?;
        Ok(Self {
            media_type: media_type.to_string(),
            bytes,
        })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Decode the payload to RGBA pixels.
    pub fn decode(&self) -> Result<RgbaImage, SignatureError> {
        let img = image::load_from_memory(&self.bytes)?;
        Ok(img.to_rgba8())
    }
}

/// Parse and decode a data URL in one step.
pub fn decode_data_url(data_url: &str) -> Result<RgbaImage, SignatureError> {
    SignatureImage::parse(data_url)?.decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn encoded_raster_keeps_dimensions() {
        let raster = RgbaImage::from_pixel(30, 12, Rgba([0, 0, 0, 255]));
        let url = encode_png_data_url(&raster).unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));

        let parsed = SignatureImage::parse(&url).unwrap();
        assert_eq!(parsed.media_type(), "image/png");
        assert_eq!(parsed.decode().unwrap().dimensions(), (30, 12));
    }

    #[test]
    fn rejects_non_data_url() {
        assert!(matches!(
            SignatureImage::parse("https://example.com/sig.png"),
            Err(SignatureError::NotDataUrl)
        ));
    }

    #[test]
    fn rejects_non_image_media_type() {
        assert!(matches!(
            SignatureImage::parse("data:text/plain;base64,aGVsbG8="),
            Err(SignatureError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn rejects_plain_payload() {
        assert!(matches!(
            SignatureImage::parse("data:image/png,rawbytes"),
            Err(SignatureError::NotBase64)
        ));
    }

    #[test]
    fn garbage_png_fails_on_decode() {
        let parsed = SignatureImage::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert!(parsed.decode().is_err());
    }
}
