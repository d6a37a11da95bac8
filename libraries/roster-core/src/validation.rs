//! Field validation for signup, profile edits and microposts
//!
//! Every rule runs on every submission and failures accumulate in a
//! [`FieldErrors`], so a blank form reports all of its problems at once.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const NAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const MICROPOST_MAX_LEN: usize = 140;

pub const BLANK: &str = "can't be blank";
pub const INVALID: &str = "is invalid";
pub const TAKEN: &str = "has already been taken";
pub const CONFIRMATION_MISMATCH: &str = "doesn't match Password";

// ASCII classes only: `\w`, `\d` and case folding are Unicode-aware in `regex`
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_+\-.]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]+$")
        .expect("email pattern is a valid regex")
});

pub fn too_short(min: usize) -> String {
    format!("is too short (minimum is {} characters)", min)
}

pub fn too_long(max: usize) -> String {
    format!("is too long (maximum is {} characters)", max)
}

/// A form field that can carry validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Password,
    PasswordConfirmation,
    Content,
}

impl Field {
    /// Human-readable label used to build full messages
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::PasswordConfirmation => "Password confirmation",
            Field::Content => "Content",
        }
    }
}

/// Validation messages keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of messages across all fields
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: Field, message: &str) -> bool {
        self.get(field).iter().any(|m| m == message)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    /// Messages prefixed with their field label, e.g. "Name can't be blank"
    pub fn full_messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |message| format!("{} {}", field.label(), message))
            })
            .collect()
    }

    /// Error summary line shown above a rejected form
    pub fn summary(&self) -> String {
        match self.len() {
            1 => "The form contains 1 error.".to_string(),
            n => format!("The form contains {} errors.", n),
        }
    }

    /// `Ok(value)` when no messages were recorded
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

/// Signup form submission
///
/// Missing keys deserialize as empty strings, the same as a blank form field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Profile edit submission; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl UpdateUserInput {
    pub fn changes_password(&self) -> bool {
        self.password.is_some() || self.password_confirmation.is_some()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Lower-case and trim an email so lookups and the unique index agree
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_name(name: &str, errors: &mut FieldErrors) {
    if is_blank(name) {
        errors.add(Field::Name, BLANK);
    } else if name.chars().count() > NAME_MAX_LEN {
        errors.add(Field::Name, too_long(NAME_MAX_LEN));
    }
}

pub fn validate_email(email: &str, errors: &mut FieldErrors) {
    if is_blank(email) {
        errors.add(Field::Email, BLANK);
    }
    if !EMAIL_PATTERN.is_match(email.trim()) {
        errors.add(Field::Email, INVALID);
    }
}

pub fn validate_password(password: &str, confirmation: &str, errors: &mut FieldErrors) {
    if is_blank(password) {
        errors.add(Field::Password, BLANK);
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.add(Field::Password, too_short(PASSWORD_MIN_LEN));
    }
    if password != confirmation {
        errors.add(Field::PasswordConfirmation, CONFIRMATION_MISMATCH);
    }
}

/// Check every signup rule that doesn't need the store
pub fn validate_signup(input: &SignupInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    validate_name(&input.name, &mut errors);
    validate_email(&input.email, &mut errors);
    validate_password(&input.password, &input.password_confirmation, &mut errors);
    errors
}

/// Check the fields present in a profile edit
pub fn validate_update(input: &UpdateUserInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(name) = &input.name {
        validate_name(name, &mut errors);
    }
    if let Some(email) = &input.email {
        validate_email(email, &mut errors);
    }
    if input.changes_password() {
        validate_password(
            input.password.as_deref().unwrap_or_default(),
            input.password_confirmation.as_deref().unwrap_or_default(),
            &mut errors,
        );
    }
    errors
}

pub fn validate_micropost(content: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if is_blank(content) {
        errors.add(Field::Content, BLANK);
    } else if content.chars().count() > MICROPOST_MAX_LEN {
        errors.add(Field::Content, too_long(MICROPOST_MAX_LEN));
    }
    errors
}
