/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::RosterError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Already signed in")]
    AlreadySignedIn,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] RosterError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] roster_storage::StorageError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl ServerError {
    /// The core error behind this one, if any
    pub fn core(&self) -> Option<&RosterError> {
        match self {
            ServerError::Core(e) => Some(e),
            _ => None,
        }
    }
}

fn internal(kind: &str) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": kind }),
    )
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ServerError::AlreadySignedIn => (
                StatusCode::CONFLICT,
                json!({ "error": "Already signed in", "redirect": "/" }),
            ),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ServerError::Core(RosterError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": errors.summary(),
                    "errors": errors,
                    "messages": errors.full_messages(),
                }),
            ),
            ServerError::Core(RosterError::Forbidden) => (
                StatusCode::FORBIDDEN,
                json!({ "error": "Action not available" }),
            ),
            ServerError::Core(RosterError::NotFound { entity, .. }) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{entity} not found") }),
            ),
            ServerError::Core(RosterError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            ServerError::Core(ref e) => {
                tracing::error!("Database error: {:?}", e);
                internal("Database error")
            }
            ServerError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                internal("Storage error")
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                internal("Configuration error")
            }
            ServerError::Jwt(ref e) => {
                tracing::error!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, json!({ "error": "Invalid token" }))
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                internal("Password error")
            }
        };

        (status, Json(body)).into_response()
    }
}
