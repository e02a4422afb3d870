use crate::errors::AppError;
use crate::models::complaint::{Complaint, ComplaintForm, ComplaintStatus, ValidationErrors};
use crate::store::ComplaintStore;

pub const VALIDATION_FAILED: &str = "Validation failed. Please check your input.";
pub const SUBMITTED: &str = "Complaint submitted successfully!";
pub const SERVER_ERROR: &str = "An unexpected error occurred on the server.";
pub const STATUS_UPDATED: &str = "Status updated successfully";
pub const STATUS_FAILED: &str = "Failed to update status";

/// Result of a submission, shared by the HTML form and the JSON API.
#[derive(Debug)]
pub struct FormState {
    pub success: bool,
    pub message: String,
    pub errors: ValidationErrors,
    pub complaint: Option<Complaint>,
}

impl FormState {
    fn invalid(errors: ValidationErrors) -> Self {
        Self { success: false, message: VALIDATION_FAILED.to_string(), errors, complaint: None }
    }

    fn failed() -> Self {
        Self {
            success: false,
            message: SERVER_ERROR.to_string(),
            errors: ValidationErrors::default(),
            complaint: None,
        }
    }
}

/// Validate and store a submission. Store failures become an
/// unsuccessful state rather than an error so the form can be re-shown.
pub async fn submit_complaint(store: &dyn ComplaintStore, form: &ComplaintForm) -> FormState {
    let new = match form.validate() {
        Ok(new) => new,
        Err(errors) => {
            log::warn!("Complaint rejected, invalid fields: {}", errors.fields().join(", "));
            return FormState::invalid(errors);
        }
    };

    match store.append(new).await {
        Ok(complaint) => {
            log::info!(
                "Complaint #{} submitted by '{}' ({})",
                complaint.id, complaint.user_name, complaint.product_type
            );
            FormState {
                success: true,
                message: SUBMITTED.to_string(),
                errors: ValidationErrors::default(),
                complaint: Some(complaint),
            }
        }
        Err(e) => {
            log::error!("Failed to store complaint: {e}");
            FormState::failed()
        }
    }
}

/// Change a complaint's status. An unknown status or id is an
/// `Operation` error carrying the user-facing message.
pub async fn change_status(
    store: &dyn ComplaintStore,
    id: i64,
    raw_status: &str,
) -> Result<Complaint, AppError> {
    let status: ComplaintStatus = raw_status.trim().parse().map_err(|_| {
        log::warn!("Rejected status '{raw_status}' for complaint #{id}");
        AppError::Operation(STATUS_FAILED.to_string())
    })?;

    match store.update_status(id, status).await {
        Ok(Some(complaint)) => {
            log::info!("Complaint #{id} marked as {status}");
            Ok(complaint)
        }
        Ok(None) => {
            log::warn!("Status update for unknown complaint #{id}");
            Err(AppError::Operation(STATUS_FAILED.to_string()))
        }
        Err(e) => {
            log::error!("Failed to update complaint #{id}: {e}");
            Err(AppError::Operation(STATUS_FAILED.to_string()))
        }
    }
}
