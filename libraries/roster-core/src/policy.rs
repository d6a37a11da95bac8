//! Authorization rules
//!
//! Pure functions of the acting user and the target. Callers pass an
//! [`Identity`] to [`authorize`], which turns an anonymous actor or a denied
//! action into [`RosterError::Forbidden`].

use crate::error::{Result, RosterError};
use crate::types::{Identity, User, UserId};

/// Something an identity may attempt against a user record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Change name, email or password
    Edit(UserId),
    /// Remove the account
    Delete(UserId),
    /// Grant the admin flag
    SetAdmin,
}

/// Users edit only their own profile
pub fn can_edit(actor: &User, target: UserId) -> bool {
    actor.id == target
}

/// Admins delete anyone but themselves
pub fn can_delete(actor: &User, target: UserId) -> bool {
    actor.admin && actor.id != target
}

/// No self-service path grants admin, whoever asks
pub const fn can_set_admin(_actor: &User) -> bool {
    false
}

pub fn permits(actor: &User, action: Action) -> bool {
    match action {
        Action::Edit(target) => can_edit(actor, target),
        Action::Delete(target) => can_delete(actor, target),
        Action::SetAdmin => can_set_admin(actor),
    }
}

/// Resolve the acting user, or fail with `Forbidden`
pub fn authorize(identity: &Identity, action: Action) -> Result<&User> {
    match identity.user() {
        Some(actor) if permits(actor, action) => Ok(actor),
        _ => Err(RosterError::Forbidden),
    }
}
