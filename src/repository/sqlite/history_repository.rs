//! Append-only log of scan scores.
//!
//! One row per successful scan in `seo_results`. Rows are never updated or
//! deleted, and there is no read surface beyond what tests need.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::models::HistoryEntry;

#[derive(Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
    // one writer at a time, across every clone
    write_lock: Arc<Mutex<()>>,
}

impl HistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append a row with a database-generated timestamp.
    pub async fn record(&self, url: &str, score: i64) -> Result<HistoryEntry> {
        let _guard = self.write_lock.lock().await;

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin history transaction")?;

        let (id, url, score, timestamp): (i64, String, i64, String) = sqlx::query_as(
            r#"
            INSERT INTO seo_results (url, seo_score, timestamp)
            VALUES (?, ?, datetime('now'))
            RETURNING id, url, seo_score, timestamp
            "#,
        )
        .bind(url)
        .bind(score)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert history row")?;

        tx.commit()
            .await
            .context("Failed to commit history row")?;

        log::debug!("[HISTORY] #{} {} -> {}", id, url, score);

        Ok(HistoryEntry {
            id,
            url,
            score,
            timestamp,
        })
    }
}
