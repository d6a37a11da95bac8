//! Micropost queries backing the profile page

use crate::timestamp_from_millis;
use chrono::Utc;
use roster_core::validation::validate_micropost;
use roster_core::{
    error::Result, Micropost, MicropostId, NewMicropost, Page, PageRequest, RosterError, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn from_row(row: &SqliteRow) -> Result<Micropost> {
    Ok(Micropost {
        id: MicropostId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        content: row.try_get("content")?,
        created_at: timestamp_from_millis(row.try_get("created_at")?)?,
    })
}

/// Create a micropost for an existing user
pub async fn create(pool: &SqlitePool, post: NewMicropost) -> Result<Micropost> {
    validate_micropost(&post.content).into_result(())?;

    let now = Utc::now().timestamp_millis();
    let result =
        sqlx::query("INSERT INTO microposts (user_id, content, created_at) VALUES (?, ?, ?)")
            .bind(post.user_id.get())
            .bind(&post.content)
            .bind(now)
            .execute(pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    RosterError::user_not_found(post.user_id)
                }
                _ => e.into(),
            })?;

    Ok(Micropost {
        id: MicropostId::new(result.last_insert_rowid()),
        user_id: post.user_id,
        content: post.content,
        created_at: timestamp_from_millis(now)?,
    })
}

/// Get one page of a user's microposts, newest first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: UserId,
    request: PageRequest,
) -> Result<Page<Micropost>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, content, created_at
        FROM microposts
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id.get())
    .bind(request.limit())
    .bind(request.offset())
    .fetch_all(pool)
    .await?;

    let posts = rows.iter().map(from_row).collect::<Result<Vec<_>>>()?;
    let total = count_for_user(pool, user_id).await?;

    Ok(Page::new(posts, request, total))
}

pub async fn count_for_user(pool: &SqlitePool, user_id: UserId) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM microposts WHERE user_id = ?")
        .bind(user_id.get())
        .fetch_one(pool)
        .await?;
    Ok(count)
}
