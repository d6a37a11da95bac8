use crate::{microposts, sessions, users, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::{
    error::Result, Micropost, NewMicropost, NewSession, NewUser, Page, PageRequest,
    RosterStorage, User, UserChanges, UserId,
};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
#[derive(Clone)]
pub struct LocalStorage {
    pool: SqlitePool,
}

impl LocalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `database_url` and bring its schema
    /// up to date
    pub async fn connect(database_url: &str) -> std::result::Result<Self, StorageError> {
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl RosterStorage for LocalStorage {
    // Users
    async fn create_user(&self, user: NewUser) -> Result<User> {
        users::create(&self.pool, user).await
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        users::get_by_id(&self.pool, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        users::find_by_email(&self.pool, email).await
    }

    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User> {
        users::update(&self.pool, id, changes).await
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        users::delete(&self.pool, id).await
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>> {
        users::list(&self.pool, page).await
    }

    async fn count_users(&self) -> Result<i64> {
        users::count(&self.pool).await
    }

    async fn get_password_digest(&self, id: UserId) -> Result<Option<String>> {
        users::get_password_hash(&self.pool, id).await
    }

    // Microposts
    async fn create_micropost(&self, post: NewMicropost) -> Result<Micropost> {
        microposts::create(&self.pool, post).await
    }

    async fn list_microposts(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Micropost>> {
        microposts::list_for_user(&self.pool, user_id, page).await
    }

    async fn count_microposts(&self, user_id: UserId) -> Result<i64> {
        microposts::count_for_user(&self.pool, user_id).await
    }

    // Sessions
    async fn create_session(&self, session: NewSession) -> Result<()> {
        sessions::create(&self.pool, session).await
    }

    async fn session_is_active(
        &self,
        session_id: &str,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        sessions::is_active(&self.pool, session_id, user_id, now).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        sessions::delete(&self.pool, session_id).await
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
        sessions::delete_expired(&self.pool, now).await
    }
}
