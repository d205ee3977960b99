//! Pending play queue storage
//!
//! Holds plays captured on this device until the scrobble sync gets them
//! acknowledged by the server.
//!
//! # Example
//!
//! ```rust,no_run
//! use greenroom_storage::pending_plays;
//! use greenroom_core::PendingPlay;
//!
//! # async fn example(pool: &sqlx::SqlitePool, play: PendingPlay) -> Result<(), Box<dyn std::error::Error>> {
//! pending_plays::enqueue(pool, &play).await?;
//!
//! let batch = pending_plays::oldest(pool, 50).await?;
//! // Submit batch...
//! let ids: Vec<String> = batch.into_iter().map(|p| p.local_id).collect();
//! pending_plays::remove(pool, &ids).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use greenroom_core::{ExtendedMetadata, PendingPlay, PendingPlayQueue};
use sqlx::{Row, SqlitePool};

const TABLE: &str = "pending_plays";

fn encode_played_at(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_row(row: &sqlx::sqlite::SqliteRow) -> Result<PendingPlay> {
    let played_at: String = row.try_get("played_at")?;
    let played_at = DateTime::parse_from_rfc3339(&played_at)
        .map_err(|e| StorageError::corrupt(TABLE, format!("played_at '{}': {}", played_at, e)))?
        .with_timezone(&Utc);

    let metadata: String = row.try_get("extended_metadata")?;
    let extended_metadata: ExtendedMetadata = serde_json::from_str(&metadata)?;

    let duration_ms: i64 = row.try_get("duration_ms")?;

    Ok(PendingPlay {
        local_id: row.try_get("local_id")?,
        track_name: row.try_get("track_name")?,
        artist_name: row.try_get("artist_name")?,
        album_name: row.try_get("album_name")?,
        duration_ms: duration_ms.max(0) as u64,
        source_app: row.try_get("source_app")?,
        played_at,
        extended_metadata,
    })
}

/// Add a play to the queue; an existing `local_id` is left untouched
pub async fn enqueue(pool: &SqlitePool, play: &PendingPlay) -> Result<()> {
    let metadata = serde_json::to_string(&play.extended_metadata)?;

    sqlx::query(
        r#"
        INSERT INTO pending_plays
            (local_id, track_name, artist_name, album_name, duration_ms, source_app, played_at, extended_metadata)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(local_id) DO NOTHING
        "#,
    )
    .bind(&play.local_id)
    .bind(&play.track_name)
    .bind(&play.artist_name)
    .bind(&play.album_name)
    .bind(play.duration_ms as i64)
    .bind(&play.source_app)
    .bind(encode_played_at(&play.played_at))
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get up to `limit` plays, oldest first
pub async fn oldest(pool: &SqlitePool, limit: usize) -> Result<Vec<PendingPlay>> {
    let rows = sqlx::query(
        r#"
        SELECT local_id, track_name, artist_name, album_name, duration_ms, source_app,
               played_at, extended_metadata
        FROM pending_plays
        ORDER BY played_at ASC, local_id ASC
        LIMIT ?
        "#,
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.iter().map(decode_row).collect()
}

/// Remove acknowledged plays in one transaction
pub async fn remove(pool: &SqlitePool, local_ids: &[String]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut removed = 0u64;

    for local_id in local_ids {
        let result = sqlx::query("DELETE FROM pending_plays WHERE local_id = ?")
            .bind(local_id)
            .execute(&mut *tx)
            .await?;
        removed += result.rows_affected();
    }

    tx.commit().await?;
    Ok(removed as usize)
}

/// Number of queued plays
pub async fn count(pool: &SqlitePool) -> Result<usize> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pending_plays")
        .fetch_one(pool)
        .await?;

    Ok(count.max(0) as usize)
}

/// Drop every queued play
pub async fn clear(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM pending_plays").execute(pool).await?;
    Ok(())
}

/// `PendingPlayQueue` backed by the `pending_plays` table
#[derive(Debug, Clone)]
pub struct SqlitePendingQueue {
    pool: SqlitePool,
}

impl SqlitePendingQueue {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PendingPlayQueue for SqlitePendingQueue {
    async fn enqueue(&self, play: &PendingPlay) -> greenroom_core::Result<()> {
        Ok(enqueue(&self.pool, play).await?)
    }

    async fn oldest(&self, limit: usize) -> greenroom_core::Result<Vec<PendingPlay>> {
        Ok(oldest(&self.pool, limit).await?)
    }

    async fn remove(&self, local_ids: &[String]) -> greenroom_core::Result<usize> {
        Ok(remove(&self.pool, local_ids).await?)
    }

    async fn count(&self) -> greenroom_core::Result<usize> {
        Ok(count(&self.pool).await?)
    }

    async fn clear(&self) -> greenroom_core::Result<()> {
        Ok(clear(&self.pool).await?)
    }
}
