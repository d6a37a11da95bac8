//! Storage trait for users, microposts and sessions

use crate::error::{Result, RosterError};
use crate::types::{
    Micropost, NewMicropost, NewSession, NewUser, Page, PageRequest, User, UserChanges, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage context providing access to database operations
///
/// Implementations own the data invariants. In particular `create_user` and
/// `update_user` must check email uniqueness (case-insensitively) and write
/// in one atomic step, reporting a clash as a `Validation` error on the
/// email field rather than a database error.
#[async_trait]
pub trait RosterStorage: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Create a user together with its password credential
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get user by ID, failing with `NotFound` when absent
    async fn get_user(&self, id: UserId) -> Result<User>;

    /// Find a user by email, ignoring case
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Apply a partial update; all supplied columns change or none do
    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User>;

    /// Delete a user and everything it owns
    async fn delete_user(&self, id: UserId) -> Result<()>;

    /// One page of users ordered by name, then id
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>>;

    async fn count_users(&self) -> Result<i64>;

    /// Stored password hash, if the user has one
    async fn get_password_digest(&self, id: UserId) -> Result<Option<String>>;

    /// Convenience wrapper over `get_user` that maps `NotFound` to `None`
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        match self.get_user(id).await {
            Ok(user) => Ok(Some(user)),
            Err(RosterError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Microposts
    // ========================================================================

    async fn create_micropost(&self, post: NewMicropost) -> Result<Micropost>;

    /// One page of a user's microposts, newest first
    async fn list_microposts(&self, user_id: UserId, page: PageRequest)
        -> Result<Page<Micropost>>;

    async fn count_microposts(&self, user_id: UserId) -> Result<i64>;

    // ========================================================================
    // Sessions
    // ========================================================================

    async fn create_session(&self, session: NewSession) -> Result<()>;

    /// Whether the session exists, belongs to `user_id` and has not expired
    async fn session_is_active(
        &self,
        session_id: &str,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// Remove a session; removing an unknown session is not an error
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Drop sessions that expired at or before `now`
    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64>;
}
