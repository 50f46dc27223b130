//! services/api/src/adapters/memory.rs
//!
//! An in-memory implementation of the `SummaryStore` port. It backs the
//! `memory` store mode for local development and the test suites; nothing
//! survives a process restart.

use async_trait::async_trait;
use chrono::Utc;
use summaries_core::domain::{NewSummary, Summary};
use summaries_core::ports::{PortError, PortResult, SummaryStore};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A `SummaryStore` that keeps every aggregate in process memory.
///
/// Insertion order doubles as listing order, matching the database
/// adapter's `ORDER BY created_at`.
#[derive(Default)]
pub struct MemoryAdapter {
    summaries: RwLock<Vec<Summary>>,
}

impl MemoryAdapter {
    /// Creates an empty `MemoryAdapter`.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SummaryStore for MemoryAdapter {
    async fn create_summary(&self, new_summary: NewSummary) -> PortResult<Summary> {
        let summary = new_summary.into_summary(Uuid::new_v4(), Utc::now());
        self.summaries.write().await.push(summary.clone());
        Ok(summary)
    }

    async fn get_summary_by_id(&self, summary_id: Uuid) -> PortResult<Summary> {
        self.summaries
            .read()
            .await
            .iter()
            .find(|summary| summary.id == summary_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Summary {} not found", summary_id)))
    }

    async fn list_summaries(&self) -> PortResult<Vec<Summary>> {
        Ok(self.summaries.read().await.clone())
    }
}
