/// Server-side session record
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// A session to persist when a user signs in
///
/// The id is the `sid` claim of the token handed to the client. Removing the
/// row, or the user it belongs to, invalidates that token.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}
