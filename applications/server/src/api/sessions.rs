/// Session API routes
use crate::{
    error::Result,
    middleware::{AuthenticatedUser, BearerToken},
    services::users::user_path,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use roster_core::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub redirect: String,
}

/// POST /api/sessions
pub async fn create(
    State(app_state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<(StatusCode, Json<SignInResponse>)> {
    let user = app_state
        .sessions
        .authenticate(&req.email, &req.password)
        .await?;
    let session = app_state.sessions.sign_in(&user).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignInResponse {
            redirect: user_path(user.id),
            user,
            token: session.token,
            expires_at: session.expires_at,
        }),
    ))
}

/// DELETE /api/sessions
pub async fn destroy(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    BearerToken(token): BearerToken,
) -> Result<Json<SignOutResponse>> {
    app_state.sessions.sign_out(&token).await?;

    Ok(Json(SignOutResponse {
        redirect: "/".to_string(),
    }))
}
