//! User management and authentication queries

use crate::timestamp_from_millis;
use chrono::Utc;
use roster_core::validation::{normalize_email, Field, FieldErrors, TAKEN};
use roster_core::{
    error::Result, NewUser, Page, PageRequest, RosterError, User, UserChanges, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

const USER_COLUMNS: &str = "id, name, email, admin, created_at";

fn from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: UserId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        admin: row.try_get::<i64, _>("admin")? != 0,
        created_at: timestamp_from_millis(row.try_get("created_at")?)?,
    })
}

/// Turn a unique-index clash on `users.email` into a field error
fn email_taken_or(err: sqlx::Error) -> RosterError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            let mut errors = FieldErrors::new();
            errors.add(Field::Email, TAKEN);
            RosterError::Validation(errors)
        }
        _ => err.into(),
    }
}

async fn fetch(conn: &mut SqliteConnection, id: UserId) -> Result<User> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id.get())
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| RosterError::user_not_found(id))?;

    from_row(&row)
}

/// Create a user and its credentials in one transaction
///
/// The email is normalized before insert; the unique index rejects
/// duplicates regardless of case.
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    let email = normalize_email(&user.email);
    let now = Utc::now().timestamp_millis();

    let mut tx = pool.begin().await?;

    let result =
        sqlx::query("INSERT INTO users (name, email, admin, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user.name)
            .bind(&email)
            .bind(i64::from(user.admin))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(email_taken_or)?;

    let id = UserId::new(result.last_insert_rowid());
    write_password_hash(&mut *tx, id, &user.password_digest).await?;

    tx.commit().await?;

    tracing::debug!(user_id = %id, "Inserted user");

    Ok(User {
        id,
        name: user.name,
        email,
        admin: user.admin,
        created_at: timestamp_from_millis(now)?,
    })
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<User> {
    let mut conn = pool.acquire().await?;
    fetch(&mut conn, id).await
}

/// Find a user by email, ignoring case and surrounding whitespace
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
    ))
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Apply a partial update in one transaction
pub async fn update(pool: &SqlitePool, id: UserId, changes: UserChanges) -> Result<User> {
    let mut tx = pool.begin().await?;

    // Fails with NotFound before anything is written
    fetch(&mut *tx, id).await?;

    if changes.name.is_some() || changes.email.is_some() {
        sqlx::query(
            "UPDATE users SET name = COALESCE(?, name), email = COALESCE(?, email) WHERE id = ?",
        )
        .bind(changes.name)
        .bind(changes.email.as_deref().map(normalize_email))
        .bind(id.get())
        .execute(&mut *tx)
        .await
        .map_err(email_taken_or)?;
    }

    if let Some(digest) = changes.password_digest {
        write_password_hash(&mut *tx, id, &digest).await?;
    }

    let user = fetch(&mut *tx, id).await?;
    tx.commit().await?;

    Ok(user)
}

/// Delete a user; credentials, microposts and sessions cascade
pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.get())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RosterError::user_not_found(id));
    }

    Ok(())
}

/// Get one page of users ordered by name, then id
pub async fn list(pool: &SqlitePool, request: PageRequest) -> Result<Page<User>> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY name, id LIMIT ? OFFSET ?"
    ))
    .bind(request.limit())
    .bind(request.offset())
    .fetch_all(pool)
    .await?;

    let users = rows.iter().map(from_row).collect::<Result<Vec<_>>>()?;
    let total = count(pool).await?;

    Ok(Page::new(users, request, total))
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Get user's password hash for authentication
///
/// Returns `None` if the user has no credentials
pub async fn get_password_hash(pool: &SqlitePool, user_id: UserId) -> Result<Option<String>> {
    let hash: Option<String> =
        sqlx::query_scalar("SELECT password_hash FROM user_credentials WHERE user_id = ?")
            .bind(user_id.get())
            .fetch_optional(pool)
            .await?;

    Ok(hash)
}

/// Create or update user credentials
///
/// `password_hash` must already be hashed
async fn write_password_hash(
    conn: &mut SqliteConnection,
    user_id: UserId,
    password_hash: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(user_id)
         DO UPDATE SET password_hash = excluded.password_hash, updated_at = excluded.updated_at",
    )
    .bind(user_id.get())
    .bind(password_hash)
    .bind(Utc::now().timestamp_millis())
    .execute(conn)
    .await?;

    Ok(())
}
