//! Roster Core
//!
//! Domain types, validation, authorization rules and error handling for Roster.
//!
//! This crate has no I/O of its own. Storage backends implement
//! [`RosterStorage`] and the server drives the user lifecycle on top of it.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Micropost`, `Identity`, `Page`
//! - **Validation**: `FieldErrors` and the signup/edit input rules
//! - **Policy**: who may edit, delete or promote whom
//! - **Storage**: the `RosterStorage` contract
//! - **Error Handling**: Unified `RosterError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use roster_core::validation::{validate_signup, Field, SignupInput};
//!
//! let input = SignupInput {
//!     name: String::new(),
//!     email: "not-an-email".to_string(),
//!     password: "foo".to_string(),
//!     password_confirmation: "foo".to_string(),
//! };
//!
//! let errors = validate_signup(&input);
//! assert!(errors.contains(Field::Name, "can't be blank"));
//! assert!(errors.contains(Field::Email, "is invalid"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod policy;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{Result, RosterError};
pub use storage::RosterStorage;
pub use validation::{Field, FieldErrors};

pub use types::{
    Identity, Micropost, MicropostId, NewMicropost, NewSession, NewUser, Page, PageInfo,
    PageRequest, User, UserChanges, UserId,
};
