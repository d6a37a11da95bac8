/// Server services
pub mod auth;
pub mod sessions;
pub mod users;

pub use auth::AuthService;
pub use sessions::SessionService;
pub use users::UserService;
