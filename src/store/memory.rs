use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::complaint::{Complaint, ComplaintStatus, NewComplaint};
use super::ComplaintStore;

/// Process-local store. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    // most recently appended first
    complaints: Vec<Complaint>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                complaints: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComplaintStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Complaint>, AppError> {
        let inner = self.inner.read().await;
        let mut complaints = inner.complaints.clone();
        // stable sort keeps insertion recency for equal timestamps
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(complaints)
    }

    async fn find(&self, id: i64) -> Result<Option<Complaint>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.complaints.iter().find(|c| c.id == id).cloned())
    }

    async fn append(&self, new: NewComplaint) -> Result<Complaint, AppError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let complaint = new.into_complaint(id, Utc::now());
        inner.complaints.insert(0, complaint.clone());
        Ok(complaint)
    }

    async fn update_status(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .complaints
            .iter_mut()
            .find(|c| c.id == id)
            .map(|c| {
                c.status = status;
                c.clone()
            }))
    }
}
