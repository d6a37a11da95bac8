/// API route modules
pub mod health;
pub mod sessions;
pub mod users;

use crate::{middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// `?page=N` query; missing means the first page
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// Build the application router, everything mounted under `/api`
pub fn router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/users", get(users::index).post(users::create))
        .route(
            "/users/:id",
            get(users::show).patch(users::update).delete(users::destroy),
        )
        .route("/users/:id/edit", get(users::edit))
        .route("/sessions", post(sessions::create).delete(sessions::destroy))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.sessions),
            middleware::identity_middleware,
        ));

    Router::new()
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
