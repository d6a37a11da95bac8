//! User lifecycle - signup, profile edits, deletion and listings
//!
//! Every mutating call follows the same order: authorize the actor, validate
//! the whole input (collecting every field error), then hand a single change
//! to the store. The store's unique index stays the authority on email
//! uniqueness; the lookup here only lets a taken email be reported alongside
//! the other field errors.

use crate::config::PaginationSettings;
use crate::error::Result;
use crate::services::auth::{AuthService, SessionToken};
use crate::services::sessions::SessionService;
use roster_core::policy::{self, Action};
use roster_core::validation::{
    validate_signup, validate_update, Field, FieldErrors, SignupInput, UpdateUserInput, TAKEN,
};
use roster_core::{
    Identity, Micropost, NewUser, PageInfo, PageRequest, RosterError, RosterStorage, User,
    UserChanges, UserId,
};
use serde::Serialize;
use std::sync::Arc;

pub const WELCOME_MESSAGE: &str = "Welcome to Roster!";
pub const PROFILE_UPDATED_MESSAGE: &str = "Profile updated";
pub const USER_DELETED_MESSAGE: &str = "User deleted.";

const INDEX_AVATAR_SIZE: u32 = 52;
const PROFILE_AVATAR_SIZE: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
}

/// One-shot message shown after a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }
}

/// A successful workflow result and where the client goes next
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub value: T,
    pub redirect: String,
    pub flash: Flash,
}

#[derive(Debug, Clone)]
pub struct SignedUp {
    pub user: User,
    pub session: SessionToken,
}

/// What other people may see of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub gravatar_url: String,
}

impl PublicUser {
    fn new(user: &User, avatar_size: u32) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            gravatar_url: user.gravatar_url(avatar_size),
        }
    }
}

/// A row on the users index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEntry {
    #[serde(flatten)]
    pub user: PublicUser,
    /// Whether the viewer gets a delete link for this row
    pub deletable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserIndex {
    pub users: Vec<UserEntry>,
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: PublicUser,
    pub microposts: Vec<Micropost>,
    pub micropost_count: i64,
    pub pagination: PageInfo,
}

pub fn user_path(id: UserId) -> String {
    format!("/users/{id}")
}

pub struct UserService {
    storage: Arc<dyn RosterStorage>,
    auth_service: Arc<AuthService>,
    sessions: Arc<SessionService>,
    pagination: PaginationSettings,
}

impl UserService {
    pub fn new(
        storage: Arc<dyn RosterStorage>,
        auth_service: Arc<AuthService>,
        sessions: Arc<SessionService>,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            storage,
            auth_service,
            sessions,
            pagination,
        }
    }

    /// Add a "has already been taken" error when `email` belongs to someone
    /// other than `owner`
    async fn check_email_available(
        &self,
        email: &str,
        owner: Option<UserId>,
        errors: &mut FieldErrors,
    ) -> Result<()> {
        // Malformed emails can't collide and already carry an error
        if !errors.get(Field::Email).is_empty() {
            return Ok(());
        }
        if let Some(existing) = self.storage.find_user_by_email(email).await? {
            if Some(existing.id) != owner {
                errors.add(Field::Email, TAKEN);
            }
        }
        Ok(())
    }

    /// Create an account and sign it in
    ///
    /// New accounts are never admins, whatever the submitted payload held.
    pub async fn signup(&self, input: SignupInput) -> Result<Outcome<SignedUp>> {
        let mut errors = validate_signup(&input);
        self.check_email_available(&input.email, None, &mut errors)
            .await?;
        if !errors.is_empty() {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Signup rejected");
            return Err(RosterError::Validation(errors).into());
        }

        let password_digest = self.auth_service.hash_password(&input.password)?;
        let user = self
            .storage
            .create_user(NewUser {
                name: input.name,
                email: input.email,
                password_digest,
                admin: false,
            })
            .await?;

        // An account nobody is signed in to is a failed signup; undo it so the
        // same form can be resubmitted
        let session = match self.sessions.sign_in(&user).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(user_id = %user.id, "Sign in after signup failed: {}", e);
                if let Err(cleanup) = self.storage.delete_user(user.id).await {
                    tracing::error!(user_id = %user.id, "Could not remove account: {}", cleanup);
                }
                return Err(e);
            }
        };

        tracing::info!(user_id = %user.id, "User signed up");

        Ok(Outcome {
            redirect: user_path(user.id),
            flash: Flash::success(WELCOME_MESSAGE),
            value: SignedUp { user, session },
        })
    }

    /// Current values for the edit form; self only
    pub async fn edit_form(&self, actor: &Identity, target: UserId) -> Result<User> {
        policy::authorize(actor, Action::Edit(target))?;
        Ok(self.storage.get_user(target).await?)
    }

    /// Apply a self-service profile edit
    ///
    /// `UpdateUserInput` has no admin field, so privilege changes can't
    /// arrive this way.
    pub async fn update(
        &self,
        actor: &Identity,
        target: UserId,
        input: UpdateUserInput,
    ) -> Result<Outcome<User>> {
        let actor = policy::authorize(actor, Action::Edit(target)).map_err(|e| {
            tracing::warn!(target_id = %target, "Refused profile edit");
            e
        })?;

        let mut errors = validate_update(&input);
        if let Some(email) = &input.email {
            self.check_email_available(email, Some(actor.id), &mut errors)
                .await?;
        }
        if !errors.is_empty() {
            return Err(RosterError::Validation(errors).into());
        }

        let password_digest = match &input.password {
            Some(password) if input.changes_password() => {
                Some(self.auth_service.hash_password(password)?)
            }
            _ => None,
        };

        let user = self
            .storage
            .update_user(
                target,
                UserChanges {
                    name: input.name,
                    email: input.email,
                    password_digest,
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(Outcome {
            redirect: user_path(user.id),
            flash: Flash::success(PROFILE_UPDATED_MESSAGE),
            value: user,
        })
    }

    /// Delete another user's account; admins only
    ///
    /// Authorization is checked before existence so a refused caller learns
    /// nothing about which ids exist.
    pub async fn destroy(&self, actor: &Identity, target: UserId) -> Result<Outcome<()>> {
        let actor = policy::authorize(actor, Action::Delete(target)).map_err(|e| {
            tracing::warn!(
                actor_id = ?actor.user_id(),
                target_id = %target,
                "Refused user deletion"
            );
            e
        })?;

        self.storage.delete_user(target).await?;

        tracing::info!(actor_id = %actor.id, user_id = %target, "User deleted");

        Ok(Outcome {
            value: (),
            redirect: "/users".to_string(),
            flash: Flash::success(USER_DELETED_MESSAGE),
        })
    }

    /// One page of the users index as seen by `viewer`
    pub async fn list(&self, viewer: &User, page: u32) -> Result<UserIndex> {
        let request = PageRequest::new(page, self.pagination.users_per_page)?;
        let page = self.storage.list_users(request).await?;

        let pagination = page.info();
        let users = page
            .items
            .iter()
            .map(|user| UserEntry {
                user: PublicUser::new(user, INDEX_AVATAR_SIZE),
                deletable: policy::can_delete(viewer, user.id),
            })
            .collect();

        Ok(UserIndex { users, pagination })
    }

    /// A user's public profile with one page of microposts
    pub async fn profile(&self, id: UserId, page: u32) -> Result<Profile> {
        let user = self.storage.get_user(id).await?;
        let request = PageRequest::new(page, self.pagination.microposts_per_page)?;
        let microposts = self.storage.list_microposts(id, request).await?;

        Ok(Profile {
            user: PublicUser::new(&user, PROFILE_AVATAR_SIZE),
            micropost_count: microposts.total_count,
            pagination: microposts.info(),
            microposts: microposts.items,
        })
    }
}
