//! Roster Server Library
//!
//! User directory service: signup, profiles, self-service edits and admin
//! deletion over a JSON API.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{AuthService, SessionService, UserService};
pub use state::AppState;
