mod detail;
mod export;
mod form;
pub mod helpers;

pub use detail::{detail, update_status};
pub use export::export;
pub use form::{index, submit};
