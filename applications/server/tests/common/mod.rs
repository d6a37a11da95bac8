//! Common test utilities and fixtures
#![allow(dead_code)]

use anyhow::Result;
use roster_core::{NewUser, RosterStorage, User};
use roster_server::{config::PaginationSettings, services::AuthService, state::AppState};
use roster_storage::LocalStorage;
use std::sync::Arc;

/// Lowest cost bcrypt accepts; keeps tests fast
pub const TEST_BCRYPT_COST: u32 = 4;
pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_PASSWORD: &str = "foobar";

/// A fresh in-memory database with migrations applied
pub async fn create_test_storage() -> Result<Arc<LocalStorage>> {
    let storage = LocalStorage::connect("sqlite::memory:").await?;
    Ok(Arc::new(storage))
}

pub fn create_test_auth_service() -> Arc<AuthService> {
    Arc::new(AuthService::new(
        TEST_SECRET.to_string(),
        1,
        TEST_BCRYPT_COST,
    ))
}

pub struct TestApp {
    pub state: AppState,
    pub storage: Arc<LocalStorage>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_pagination(PaginationSettings::default()).await
    }

    pub async fn with_pagination(pagination: PaginationSettings) -> Self {
        let storage = create_test_storage().await.unwrap();
        Self::build(storage, create_test_auth_service(), pagination)
    }

    pub async fn with_auth_service(auth_service: Arc<AuthService>) -> Self {
        let storage = create_test_storage().await.unwrap();
        Self::build(storage, auth_service, PaginationSettings::default())
    }

    /// Another app over the same database
    pub fn with_same_storage(&self, auth_service: Arc<AuthService>) -> Self {
        Self::build(self.storage.clone(), auth_service, PaginationSettings::default())
    }

    fn build(
        storage: Arc<LocalStorage>,
        auth_service: Arc<AuthService>,
        pagination: PaginationSettings,
    ) -> Self {
        let state = AppState::new(
            storage.clone() as Arc<dyn RosterStorage>,
            auth_service,
            pagination,
        );
        Self { state, storage }
    }

    /// Insert a user with `TEST_PASSWORD` directly through the store
    pub async fn create_user(&self, name: &str, email: &str, admin: bool) -> User {
        let password_digest = self.state.auth_service.hash_password(TEST_PASSWORD).unwrap();
        self.storage
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_digest,
                admin,
            })
            .await
            .unwrap()
    }

    pub async fn create_admin(&self) -> User {
        self.create_user("Admin", "admin@example.com", true).await
    }

    pub async fn create_member(&self, n: u32) -> User {
        self.create_user(
            &format!("Member {n}"),
            &format!("member-{n}@example.com"),
            false,
        )
        .await
    }

    /// Sign `user` in and return the bearer token
    pub async fn token_for(&self, user: &User) -> String {
        self.state.sessions.sign_in(user).await.unwrap().token
    }

    pub async fn user_count(&self) -> i64 {
        self.storage.count_users().await.unwrap()
    }
}

pub mod fixtures {
    use roster_core::validation::SignupInput;

    pub fn signup(name: &str, email: &str, password: &str, confirmation: &str) -> SignupInput {
        SignupInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    pub fn valid_signup() -> SignupInput {
        signup("Example User", "user@example.com", "password", "password")
    }
}
