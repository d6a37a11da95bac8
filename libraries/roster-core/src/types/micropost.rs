/// Micropost domain types
use crate::types::{MicropostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short post owned by a user, shown on the owner's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Micropost {
    pub id: MicropostId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a micropost
#[derive(Debug, Clone)]
pub struct NewMicropost {
    pub user_id: UserId,
    pub content: String,
}
