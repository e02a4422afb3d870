use serde::{Deserialize, Serialize};

use crate::models::complaint::ValidationErrors;
use crate::signature::Point;

/// API error response.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), errors: None }
    }

    pub fn with_errors(error: impl Into<String>, errors: ValidationErrors) -> Self {
        Self { error: error.into(), errors: Some(errors) }
    }
}

/// Status change request for `PUT /api/v1/complaints/{id}/status`.
#[derive(Deserialize, Debug)]
pub struct ApiStatusRequest {
    pub status: String,
}

/// Outcome of a status change, shown to the user as-is.
#[derive(Serialize, Debug, PartialEq)]
pub struct ApiStatusResponse {
    pub success: bool,
    pub message: String,
}

/// Recorded strokes to replay on a server-side surface.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiRenderRequest {
    /// Surface size in CSS pixels.
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f32,
    /// Existing signature to draw before replaying.
    #[serde(default)]
    pub base: Option<String>,
    /// Each stroke is a list of surface-local points; one point is a tap.
    #[serde(default)]
    pub strokes: Vec<Vec<Point>>,
}

fn default_pixel_ratio() -> f32 {
    1.0
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiRenderResponse {
    pub signature: String,
    /// Device pixel dimensions of the encoded image.
    pub width: u32,
    pub height: u32,
}
