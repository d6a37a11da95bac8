/// Identity middleware
use crate::{error::ServerError, services::SessionService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use roster_core::{Identity, User};
use std::convert::Infallible;
use std::sync::Arc;

/// Who is behind the request; `Anonymous` when no live session was presented
#[derive(Debug, Clone, Default)]
pub struct CurrentIdentity(pub Identity);

/// The raw bearer token, kept so sign out can revoke its session
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// A signed-in user; rejects anonymous requests with 401
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the caller's identity and store it in request extensions
///
/// Runs on every route. It never rejects; handlers decide what an anonymous
/// caller may do.
pub async fn identity_middleware(
    State(sessions): State<Arc<SessionService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_owned);
    let identity = sessions.resolve_identity(token.as_deref()).await;

    if let Some(token) = token {
        request.extensions_mut().insert(BearerToken(token));
    }
    request.extensions_mut().insert(CurrentIdentity(identity));

    next.run(request).await
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentIdentity>()
            .cloned()
            .unwrap_or_default())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BearerToken>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Missing bearer token".to_string()))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CurrentIdentity>() {
            Some(CurrentIdentity(Identity::User(user))) => Ok(AuthenticatedUser(user.clone())),
            _ => Err(ServerError::Auth("Please sign in.".to_string())),
        }
    }
}
