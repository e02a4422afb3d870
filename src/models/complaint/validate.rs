use std::collections::BTreeMap;

use serde::Serialize;

use crate::signature::SignatureImage;
use super::types::{ComplaintForm, NewComplaint};

/// Longest accepted value for single-line fields.
pub const MAX_SHORT_LEN: usize = 200;
/// Longest accepted value for the problem description and solution.
pub const MAX_LONG_LEN: usize = 5000;
/// Minimum length of the problem description and solution.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Field-level validation messages, keyed by submission field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// First message for `field`, for inline display next to the input.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|m| m.first()).map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of the invalid fields, sorted.
    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, label: &str, max_len: usize) -> Option<String> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Some(format!("{label} is required."));
    }
    if len > max_len {
        return Some(format!("{label} must be at most {max_len} characters."));
    }
    None
}

/// Validate a free-text field that needs at least `min_len` characters.
pub fn validate_min_length(value: &str, label: &str, min_len: usize, max_len: usize) -> Option<String> {
    let len = value.trim().chars().count();
    if len < min_len {
        return Some(format!("{label} must be at least {min_len} characters."));
    }
    if len > max_len {
        return Some(format!("{label} must be at most {max_len} characters."));
    }
    None
}

/// Validate a signature: present, and a decodable image data URL.
pub fn validate_signature(value: &str, label: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{label} is required."));
    }
    match SignatureImage::parse(trimmed).and_then(|img| img.decode()) {
        Ok(_) => None,
        Err(e) => {
            log::debug!("{label} rejected: {e}");
            Some(format!("{label} is not a valid image."))
        }
    }
}

impl ComplaintForm {
    /// Check every field and build the record payload.
    ///
    /// All fields are checked so the caller gets every message at once.
    pub fn validate(&self) -> Result<NewComplaint, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let checks = [
            ("userName", validate_required(&self.user_name, "User name", MAX_SHORT_LEN)),
            ("roomNumber", validate_required(&self.room_number, "Room number", MAX_SHORT_LEN)),
            ("section", validate_required(&self.section, "Section", MAX_SHORT_LEN)),
            ("productType", validate_required(&self.product_type, "Product type", MAX_SHORT_LEN)),
            (
                "productSerialNumber",
                validate_required(&self.product_serial_number, "Product Serial Number", MAX_SHORT_LEN),
            ),
            (
                "problemDescription",
                validate_min_length(
                    &self.problem_description,
                    "Problem description",
                    MIN_DESCRIPTION_LEN,
                    MAX_LONG_LEN,
                ),
            ),
            ("userSignature", validate_signature(&self.user_signature, "User signature")),
            (
                "representativeName",
                validate_required(&self.representative_name, "Representative name", MAX_SHORT_LEN),
            ),
            (
                "solution",
                validate_min_length(&self.solution, "Solution", MIN_DESCRIPTION_LEN, MAX_LONG_LEN),
            ),
            (
                "representativeSignature",
                validate_signature(&self.representative_signature, "Representative signature"),
            ),
        ];

        for (field, message) in checks {
            if let Some(message) = message {
                errors.add(field, message);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewComplaint {
            user_name: self.user_name.trim().to_string(),
            room_number: self.room_number.trim().to_string(),
            section: self.section.trim().to_string(),
            product_type: self.product_type.trim().to_string(),
            product_serial_number: self.product_serial_number.trim().to_string(),
            problem_description: self.problem_description.trim().to_string(),
            user_signature: self.user_signature.trim().to_string(),
            representative_name: self.representative_name.trim().to_string(),
            solution: self.solution.trim().to_string(),
            representative_signature: self.representative_signature.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_whitespace() {
        assert_eq!(
            validate_required("   ", "Section", 10),
            Some("Section is required.".to_string())
        );
        assert!(validate_required("A", "Section", 10).is_none());
    }

    #[test]
    fn required_enforces_max_len() {
        assert!(validate_required("abcdef", "Room number", 5).is_some());
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        // ten two-byte characters
        assert!(validate_min_length("éééééééééé", "Solution", 10, 100).is_none());
        assert!(validate_min_length("ééééééééé", "Solution", 10, 100).is_some());
    }

    #[test]
    fn signature_must_be_an_image() {
        assert_eq!(
            validate_signature("", "User signature"),
            Some("User signature is required.".to_string())
        );
        assert_eq!(
            validate_signature("not-a-data-url", "User signature"),
            Some("User signature is not a valid image.".to_string())
        );
    }

    #[test]
    fn errors_collect_per_field() {
        let mut errors = ValidationErrors::default();
        errors.add("solution", "too short");
        errors.add("solution", "second");
        errors.add("section", "missing");
        assert_eq!(errors.fields(), vec!["section", "solution"]);
        assert_eq!(errors.first("solution"), Some("too short"));
        assert_eq!(errors.messages("solution").len(), 2);
        assert!(errors.messages("userName").is_empty());
    }
}
