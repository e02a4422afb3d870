//! Complaint persistence.
//!
//! `MemoryStore` keeps records for the lifetime of the process; `PgStore`
//! persists them in Postgres. Handlers only see `dyn ComplaintStore`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::complaint::{Complaint, ComplaintStatus, NewComplaint};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Owner of the complaint collection.
///
/// Implementations must be `Send + Sync`; each mutation is atomic on its own.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// All complaints, newest first. Equal timestamps keep the most
    /// recently appended record first.
    async fn list(&self) -> Result<Vec<Complaint>, AppError>;

    async fn find(&self, id: i64) -> Result<Option<Complaint>, AppError>;

    /// Store a validated complaint with a fresh id, the current time and
    /// status `Open`.
    async fn append(&self, new: NewComplaint) -> Result<Complaint, AppError>;

    /// Change the status of an existing complaint. Returns `None` when the
    /// id is unknown, in which case nothing changes.
    async fn update_status(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, AppError>;
}
