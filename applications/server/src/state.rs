/// Shared application state
use crate::config::PaginationSettings;
use crate::services::{AuthService, SessionService, UserService};
use roster_core::RosterStorage;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn RosterStorage>,
    pub auth_service: Arc<AuthService>,
    pub sessions: Arc<SessionService>,
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn RosterStorage>,
        auth_service: Arc<AuthService>,
        pagination: PaginationSettings,
    ) -> Self {
        let sessions = Arc::new(SessionService::new(
            Arc::clone(&storage),
            Arc::clone(&auth_service),
        ));
        let users = Arc::new(UserService::new(
            Arc::clone(&storage),
            Arc::clone(&auth_service),
            Arc::clone(&sessions),
            pagination,
        ));

        Self {
            storage,
            auth_service,
            sessions,
            users,
        }
    }
}
