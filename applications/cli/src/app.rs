//! Application wiring: storage, session, API client and stores.

use crate::config::GreenroomConfig;
use crate::error::Result;
use greenroom_client::{ClientConfig, GreenroomClient, Session, SessionStore};
use greenroom_scrobble::ScrobbleStore;
use greenroom_storage::{session as saved_session, settings, SqlitePendingQueue, StorageError, StoredSession};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Everything a command needs, built once per invocation
pub struct App {
    config: GreenroomConfig,
    pool: SqlitePool,
    session: Arc<SessionStore>,
    client: Arc<GreenroomClient>,
    queue: Arc<SqlitePendingQueue>,
    scrobbles: ScrobbleStore,
    session_writer: JoinHandle<()>,
}

impl App {
    /// Open the database, restore the saved session and build the stores.
    pub async fn open(config: GreenroomConfig) -> Result<Self> {
        config.validate()?;

        let pool = greenroom_storage::create_pool(&config.storage.database_url).await?;
        greenroom_storage::run_migrations(&pool).await?;
        debug!(url = %config.storage.database_url, "Database ready");

        let session = match saved_session::load(&pool).await? {
            Some(stored) => {
                debug!("Restored saved session");
                SessionStore::with_session(Session {
                    access_token: stored.access_token,
                    refresh_token: stored.refresh_token,
                    user: stored.user,
                })
            }
            None => SessionStore::new(),
        };
        let session = Arc::new(session);

        let client = Arc::new(GreenroomClient::new(
            ClientConfig::new(&config.api.base_url).with_timeout(config.timeout()),
            Arc::clone(&session),
        )?);

        let queue = Arc::new(SqlitePendingQueue::new(pool.clone()));
        let scrobbles = ScrobbleStore::new(client.clone(), queue.clone());

        // A terminal has no playback permission to ask for
        let mut signals = settings::load_scrobbling(&pool).await?;
        signals.permission_granted = true;
        scrobbles.restore_signals(signals);
        scrobbles.refresh_pending_count().await?;

        let session_writer = tokio::spawn(write_sessions(pool.clone(), session.subscribe()));

        Ok(Self {
            config,
            pool,
            session,
            client,
            queue,
            scrobbles,
            session_writer,
        })
    }

    pub fn config(&self) -> &GreenroomConfig {
        &self.config
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn client(&self) -> &Arc<GreenroomClient> {
        &self.client
    }

    pub fn queue(&self) -> &Arc<SqlitePendingQueue> {
        &self.queue
    }

    pub fn scrobbles(&self) -> &ScrobbleStore {
        &self.scrobbles
    }

    /// Flush the session and the scrobbling toggle, then close the pool.
    pub async fn close(self) -> Result<()> {
        self.session_writer.abort();
        save_session(&self.pool, self.session.current()).await?;
        settings::save_scrobbling(&self.pool, &self.scrobbles.signals()).await?;
        self.pool.close().await;
        info!("Closed");
        Ok(())
    }
}

async fn save_session(pool: &SqlitePool, session: Option<Session>) -> std::result::Result<(), StorageError> {
    match session {
        Some(session) => {
            saved_session::save(
                pool,
                &StoredSession {
                    access_token: session.access_token,
                    refresh_token: session.refresh_token,
                    user: session.user,
                },
            )
            .await
        }
        None => saved_session::clear(pool).await,
    }
}

/// Mirror every session change (login, refresh, logout) to the database
async fn write_sessions(pool: SqlitePool, mut updates: watch::Receiver<Option<Session>>) {
    while updates.changed().await.is_ok() {
        let current = updates.borrow_and_update().clone();
        let signed_in = current.is_some();
        match save_session(&pool, current).await {
            Ok(()) => debug!(signed_in, "Session saved"),
            Err(e) => warn!(error = %e, "Failed to save session"),
        }
    }
}
