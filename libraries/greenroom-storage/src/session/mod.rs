//! Session storage
//!
//! Persists the signed-in user's tokens so the session store can be restored
//! at startup. There is at most one row.

use crate::error::Result;
use greenroom_core::User;
use sqlx::{Row, SqlitePool};

/// Tokens and user saved between runs
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

/// Load the saved session, if any
pub async fn load(pool: &SqlitePool) -> Result<Option<StoredSession>> {
    let row = sqlx::query("SELECT access_token, refresh_token, user_json FROM session WHERE id = 1")
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let user_json: Option<String> = row.try_get("user_json")?;
    let user = user_json
        .map(|json| serde_json::from_str::<User>(&json))
        .transpose()?;

    Ok(Some(StoredSession {
        access_token: row.try_get("access_token")?,
        refresh_token: row.try_get("refresh_token")?,
        user,
    }))
}

/// Save (or replace) the session
pub async fn save(pool: &SqlitePool, session: &StoredSession) -> Result<()> {
    let user_json = session.user.as_ref().map(serde_json::to_string).transpose()?;

    sqlx::query(
        r#"
        INSERT INTO session (id, access_token, refresh_token, user_json, updated_at)
        VALUES (1, ?, ?, ?, strftime('%s', 'now'))
        ON CONFLICT(id) DO UPDATE SET
            access_token = excluded.access_token,
            refresh_token = excluded.refresh_token,
            user_json = excluded.user_json,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&session.access_token)
    .bind(&session.refresh_token)
    .bind(user_json)
    .execute(pool)
    .await?;

    Ok(())
}

/// Forget the session (logout)
pub async fn clear(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM session").execute(pool).await?;
    Ok(())
}
