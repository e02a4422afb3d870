// Template context structures for Askama templates, organized by page.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{take_flash, take_flash_error};
use crate::config::AppConfig;

/// Context shared by every page.
/// Templates access these as `ctx.app_name`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub app_name: String,
    pub csrf_token: String,
    pub flash: Option<String>,
    pub flash_error: Option<String>,
}

impl PageContext {
    /// Consumes pending flash messages.
    pub fn build(session: &Session, config: &AppConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
            flash: take_flash(session),
            flash_error: take_flash_error(session),
        }
    }
}

mod api;
mod complaint;

pub use api::*;
pub use complaint::*;
