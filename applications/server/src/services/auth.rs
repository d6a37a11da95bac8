/// Authentication service - JWT and password handling
use crate::error::{Result, ServerError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use roster_core::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    session_expiration_hours: u64,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub sid: String, // Server-side session ID
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// A signed session token and when it stops being accepted
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthService {
    pub fn new(secret: String, session_expiration_hours: u64, bcrypt_cost: u32) -> Self {
        Self {
            secret,
            session_expiration_hours,
            bcrypt_cost,
        }
    }

    /// When a session opened at `now` expires; `Config` error if out of range
    fn session_expiry(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        i64::try_from(self.session_expiration_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                ServerError::Config(format!(
                    "session lifetime of {} hours is out of range",
                    self.session_expiration_hours
                ))
            })
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Sign a token binding `user_id` to the session `session_id`
    pub fn create_session_token(&self, user_id: UserId, session_id: &str) -> Result<SessionToken> {
        let now = Utc::now();
        let expires_at = self.session_expiry(now)?;

        let claims = Claims {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        let token = encode(&Header::default(), &claims, &encoding_key)?;

        Ok(SessionToken { token, expires_at })
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify a session token, returning its user and session IDs
    pub fn verify_session_token(&self, token: &str) -> Result<(UserId, String)> {
        let claims = self.verify_token(token)?;
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ServerError::Auth("Invalid token subject".to_string()))?;
        Ok((user_id, claims.sid))
    }
}
