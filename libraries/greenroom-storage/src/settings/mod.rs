//! Key/value settings storage

use crate::error::Result;
use greenroom_core::ScrobblingSignals;
use sqlx::SqlitePool;

/// The user's scrobbling toggle
pub const SCROBBLING_ENABLED: &str = "scrobbling.enabled";
/// Set once the toggle has been switched on
pub const SCROBBLING_SET_UP: &str = "scrobbling.set_up";

/// Get a setting value
pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value)
}

/// Set a setting value
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, strftime('%s', 'now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a boolean setting, `default` when unset or unparseable
pub async fn get_bool(pool: &SqlitePool, key: &str, default: bool) -> Result<bool> {
    Ok(get(pool, key)
        .await?
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(default))
}

/// Set a boolean setting
pub async fn set_bool(pool: &SqlitePool, key: &str, value: bool) -> Result<()> {
    set(pool, key, if value { "true" } else { "false" }).await
}

/// Load the persisted scrobbling toggle.
///
/// The OS permission is not stored; it is always reported as missing here and
/// must be filled in by the caller.
pub async fn load_scrobbling(pool: &SqlitePool) -> Result<ScrobblingSignals> {
    Ok(ScrobblingSignals {
        permission_granted: false,
        enabled: get_bool(pool, SCROBBLING_ENABLED, false).await?,
        set_up: get_bool(pool, SCROBBLING_SET_UP, false).await?,
    })
}

/// Persist the scrobbling toggle
pub async fn save_scrobbling(pool: &SqlitePool, signals: &ScrobblingSignals) -> Result<()> {
    set_bool(pool, SCROBBLING_ENABLED, signals.enabled).await?;
    set_bool(pool, SCROBBLING_SET_UP, signals.set_up).await
}
