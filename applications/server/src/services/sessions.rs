/// Session service - resolves who is behind a request
use crate::error::{Result, ServerError};
use crate::services::auth::{AuthService, SessionToken};
use chrono::Utc;
use roster_core::{Identity, NewSession, RosterStorage, User};
use std::sync::Arc;
use uuid::Uuid;

const BAD_CREDENTIALS: &str = "Invalid email/password combination";

pub struct SessionService {
    storage: Arc<dyn RosterStorage>,
    auth_service: Arc<AuthService>,
}

impl SessionService {
    pub fn new(storage: Arc<dyn RosterStorage>, auth_service: Arc<AuthService>) -> Self {
        Self {
            storage,
            auth_service,
        }
    }

    /// Open a session for `user` and sign a token for it
    pub async fn sign_in(&self, user: &User) -> Result<SessionToken> {
        let session_id = Uuid::new_v4().to_string();
        let token = self
            .auth_service
            .create_session_token(user.id, &session_id)?;

        self.storage
            .create_session(NewSession {
                id: session_id,
                user_id: user.id,
                expires_at: token.expires_at,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Signed in");
        Ok(token)
    }

    /// End the session behind `token`. Unknown or expired tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> Result<()> {
        match self.auth_service.verify_session_token(token) {
            Ok((user_id, session_id)) => {
                self.storage.delete_session(&session_id).await?;
                tracing::info!(user_id = %user_id, "Signed out");
            }
            Err(e) => tracing::debug!("Sign out with unusable token: {}", e),
        }
        Ok(())
    }

    /// Resolve the identity behind an optional bearer token
    ///
    /// Never fails: a bad signature, an expired or revoked session, a deleted
    /// user or a storage error all resolve to `Anonymous`.
    pub async fn resolve_identity(&self, token: Option<&str>) -> Identity {
        let Some(token) = token else {
            return Identity::Anonymous;
        };

        match self.lookup(token).await {
            Ok(Some(user)) => Identity::User(user),
            Ok(None) => Identity::Anonymous,
            Err(e) => {
                tracing::debug!("Identity resolution failed: {}", e);
                Identity::Anonymous
            }
        }
    }

    async fn lookup(&self, token: &str) -> Result<Option<User>> {
        let (user_id, session_id) = self.auth_service.verify_session_token(token)?;

        if !self
            .storage
            .session_is_active(&session_id, user_id, Utc::now())
            .await?
        {
            return Ok(None);
        }

        Ok(self.storage.find_user(user_id).await?)
    }

    /// Check an email/password pair
    ///
    /// An unknown email and a wrong password fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .storage
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| ServerError::Auth(BAD_CREDENTIALS.to_string()))?;

        let hash = self
            .storage
            .get_password_digest(user.id)
            .await?
            .ok_or_else(|| ServerError::Auth(BAD_CREDENTIALS.to_string()))?;

        if !self.auth_service.verify_password(password, &hash)? {
            tracing::warn!(user_id = %user.id, "Rejected sign in");
            return Err(ServerError::Auth(BAD_CREDENTIALS.to_string()));
        }

        Ok(user)
    }
}
