use askama::Template;

use super::PageContext;
use crate::models::complaint::{
    Complaint, ComplaintForm, ComplaintStatus, ValidationErrors, PRODUCT_TYPES,
};

/// Which half of the home page is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeTab {
    Form,
    List,
}

impl HomeTab {
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("list") => HomeTab::List,
            _ => HomeTab::Form,
        }
    }

    pub fn is_list(&self) -> bool {
        *self == HomeTab::List
    }
}

/// An `<option>` with its selection state resolved server-side.
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn product_types(current: &str) -> Vec<Self> {
        PRODUCT_TYPES
            .iter()
            .map(|p| SelectOption { value: p.to_string(), selected: *p == current })
            .collect()
    }

    pub fn statuses(current: ComplaintStatus) -> Vec<Self> {
        ComplaintStatus::ALL
            .iter()
            .map(|s| SelectOption { value: s.as_str().to_string(), selected: *s == current })
            .collect()
    }
}

/// Complaint row for the list table; signatures are rendered inline.
pub struct ComplaintRowView {
    pub id: i64,
    pub created: String,
    pub user_name: String,
    pub room_number: String,
    pub product_type: String,
    pub status: String,
    pub is_closed: bool,
    pub user_signature: String,
    pub representative_signature: String,
}

impl From<&Complaint> for ComplaintRowView {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id,
            created: c.created_display(),
            user_name: c.user_name.clone(),
            room_number: c.room_number.clone(),
            product_type: c.product_type.clone(),
            status: c.status.to_string(),
            is_closed: c.status.is_closed(),
            user_signature: c.user_signature.clone(),
            representative_signature: c.representative_signature.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub tab: HomeTab,
    pub form: ComplaintForm,
    pub errors: ValidationErrors,
    pub product_options: Vec<SelectOption>,
    pub complaints: Vec<ComplaintRowView>,
}

impl HomeTemplate {
    /// Inline message for a field, empty when the field is valid.
    pub fn error_for(&self, field: &str) -> &str {
        self.errors.first(field).unwrap_or("")
    }
}

#[derive(Template)]
#[template(path = "complaints/detail.html")]
pub struct ComplaintDetailTemplate {
    pub ctx: PageContext,
    pub complaint: Complaint,
    pub filed_on: String,
    pub status_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub app_name: String,
}
