//! crates/summaries_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewSummary, Summary};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The durable mapping from summary identifier to summary aggregate.
///
/// Implementations own identifier and creation-time assignment so that a
/// `NewSummary` round-trips to a fully formed `Summary`.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Persists a new summary and returns the stored aggregate.
    async fn create_summary(&self, new_summary: NewSummary) -> PortResult<Summary>;

    /// Loads one summary with its chapters in reading order.
    /// Unknown identifiers are a `PortError::NotFound`.
    async fn get_summary_by_id(&self, summary_id: Uuid) -> PortResult<Summary>;

    /// Loads every summary, ordered by creation time.
    async fn list_summaries(&self) -> PortResult<Vec<Summary>>;
}
