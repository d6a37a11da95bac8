/// User API routes
use crate::{
    api::PageParams,
    error::{Result, ServerError},
    middleware::{AuthenticatedUser, CurrentIdentity},
    services::users::{Flash, Profile, UserIndex},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use roster_core::{
    validation::{SignupInput, UpdateUserInput},
    Identity, User, UserId,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub redirect: String,
    pub flash: Flash,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub user: User,
    pub redirect: String,
    pub flash: Flash,
}

#[derive(Debug, Serialize)]
pub struct DestroyResponse {
    pub redirect: String,
    pub flash: Flash,
}

/// GET /api/users?page=N
pub async fn index(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<PageParams>,
) -> Result<Json<UserIndex>> {
    let index = app_state.users.list(auth.user(), params.page).await?;
    Ok(Json(index))
}

/// POST /api/users
/// Sign up; refused for callers who are already signed in
pub async fn create(
    State(app_state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(input): Json<SignupInput>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
    if identity.is_signed_in() {
        return Err(ServerError::AlreadySignedIn);
    }

    let outcome = app_state.users.signup(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: outcome.value.user,
            token: outcome.value.session.token,
            expires_at: outcome.value.session.expires_at,
            redirect: outcome.redirect,
            flash: outcome.flash,
        }),
    ))
}

/// GET /api/users/:id?page=N
pub async fn show(
    State(app_state): State<AppState>,
    Path(id): Path<UserId>,
    Query(params): Query<PageParams>,
) -> Result<Json<Profile>> {
    let profile = app_state.users.profile(id, params.page).await?;
    Ok(Json(profile))
}

/// GET /api/users/:id/edit
pub async fn edit(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>> {
    let user = app_state
        .users
        .edit_form(&Identity::User(auth.0), id)
        .await?;
    Ok(Json(UserResponse { user }))
}

/// PATCH /api/users/:id
pub async fn update(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<UserId>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<UpdateResponse>> {
    let outcome = app_state
        .users
        .update(&Identity::User(auth.0), id, input)
        .await?;

    Ok(Json(UpdateResponse {
        user: outcome.value,
        redirect: outcome.redirect,
        flash: outcome.flash,
    }))
}

/// DELETE /api/users/:id
/// Admins only, and never their own account
pub async fn destroy(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<UserId>,
) -> Result<Json<DestroyResponse>> {
    let outcome = app_state
        .users
        .destroy(&Identity::User(auth.0), id)
        .await?;

    Ok(Json(DestroyResponse {
        redirect: outcome.redirect,
        flash: outcome.flash,
    }))
}
