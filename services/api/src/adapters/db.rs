//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `SummaryStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use summaries_core::domain::{Chapter, NewSummary, Summary};
use summaries_core::ports::{PortError, PortResult, SummaryStore};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SummaryStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn load_chapters(&self, summary_id: Uuid) -> PortResult<Vec<Chapter>> {
        let records = sqlx::query_as::<_, ChapterRecord>(
            "SELECT position, content FROM chapters WHERE summary_id = $1 ORDER BY position ASC",
        )
        .bind(summary_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SummaryRecord {
    id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
}

impl SummaryRecord {
    fn to_domain(self, chapters: Vec<Chapter>) -> Summary {
        Summary {
            id: self.id,
            title: self.title,
            created_at: self.created_at,
            chapters,
        }
    }
}

#[derive(FromRow)]
struct ChapterRecord {
    position: i32,
    content: String,
}

impl ChapterRecord {
    fn to_domain(self) -> Chapter {
        Chapter {
            position: self.position as u32,
            content: self.content,
        }
    }
}

//=========================================================================================
// `SummaryStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryStore for DbAdapter {
    async fn create_summary(&self, new_summary: NewSummary) -> PortResult<Summary> {
        let summary = new_summary.into_summary(Uuid::new_v4(), Utc::now());

        // One summary row plus one row per chapter, inserted atomically.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        sqlx::query("INSERT INTO summaries (id, title, created_at) VALUES ($1, $2, $3)")
            .bind(summary.id)
            .bind(&summary.title)
            .bind(summary.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        for chapter in &summary.chapters {
            sqlx::query(
                "INSERT INTO chapters (summary_id, position, content) VALUES ($1, $2, $3)",
            )
            .bind(summary.id)
            .bind(chapter.position as i32)
            .bind(&chapter.content)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(summary)
    }

    async fn get_summary_by_id(&self, summary_id: Uuid) -> PortResult<Summary> {
        let record = sqlx::query_as::<_, SummaryRecord>(
            "SELECT id, title, created_at FROM summaries WHERE id = $1",
        )
        .bind(summary_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Summary {} not found", summary_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        let chapters = self.load_chapters(summary_id).await?;
        Ok(record.to_domain(chapters))
    }

    async fn list_summaries(&self) -> PortResult<Vec<Summary>> {
        let records = sqlx::query_as::<_, SummaryRecord>(
            "SELECT id, title, created_at FROM summaries ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            let chapters = self.load_chapters(record.id).await?;
            summaries.push(record.to_domain(chapters));
        }
        Ok(summaries)
    }
}
