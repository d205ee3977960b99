//! In-memory pending-play queue
//!
//! Used on platforms without a database and in tests. Contents are lost when
//! the process exits.

use crate::error::Result;
use crate::traits::PendingPlayQueue;
use crate::types::PendingPlay;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Pending plays held in process memory
#[derive(Debug, Default)]
pub struct MemoryPendingQueue {
    plays: RwLock<Vec<PendingPlay>>,
}

impl MemoryPendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue pre-filled with plays
    pub fn with_plays(plays: impl IntoIterator<Item = PendingPlay>) -> Self {
        Self {
            plays: RwLock::new(plays.into_iter().collect()),
        }
    }

    /// Snapshot of the queue contents, oldest first
    pub async fn snapshot(&self) -> Vec<PendingPlay> {
        let mut plays = self.plays.read().await.clone();
        sort_oldest_first(&mut plays);
        plays
    }
}

fn sort_oldest_first(plays: &mut [PendingPlay]) {
    plays.sort_by(|a, b| {
        a.played_at
            .cmp(&b.played_at)
            .then_with(|| a.local_id.cmp(&b.local_id))
    });
}

#[async_trait]
impl PendingPlayQueue for MemoryPendingQueue {
    async fn enqueue(&self, play: &PendingPlay) -> Result<()> {
        let mut plays = self.plays.write().await;
        if !plays.iter().any(|p| p.local_id == play.local_id) {
            plays.push(play.clone());
        }
        Ok(())
    }

    async fn oldest(&self, limit: usize) -> Result<Vec<PendingPlay>> {
        let mut plays = self.snapshot().await;
        plays.truncate(limit);
        Ok(plays)
    }

    async fn remove(&self, local_ids: &[String]) -> Result<usize> {
        let mut plays = self.plays.write().await;
        let before = plays.len();
        plays.retain(|p| !local_ids.contains(&p.local_id));
        Ok(before - plays.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.plays.read().await.len())
    }

    async fn clear(&self) -> Result<()> {
        self.plays.write().await.clear();
        Ok(())
    }
}
