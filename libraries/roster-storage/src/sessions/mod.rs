//! Signed-in session rows

use chrono::{DateTime, Utc};
use roster_core::{error::Result, NewSession, UserId};
use sqlx::SqlitePool;

pub async fn create(pool: &SqlitePool, session: NewSession) -> Result<()> {
    sqlx::query("INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(&session.id)
        .bind(session.user_id.get())
        .bind(Utc::now().timestamp_millis())
        .bind(session.expires_at.timestamp_millis())
        .execute(pool)
        .await?;

    Ok(())
}

/// Whether the session exists for this user and has not expired
pub async fn is_active(
    pool: &SqlitePool,
    session_id: &str,
    user_id: UserId,
    now: DateTime<Utc>,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sessions WHERE id = ? AND user_id = ? AND expires_at > ?",
    )
    .bind(session_id)
    .bind(user_id.get())
    .bind(now.timestamp_millis())
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

pub async fn delete(pool: &SqlitePool, session_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove sessions that expired before `now`, returning how many went
pub async fn delete_expired(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now.timestamp_millis())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
