/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use common::{TestApp, TEST_PASSWORD};
use roster_core::RosterStorage;
use roster_server::router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn app_router(app: &TestApp) -> Router {
    router(app.state.clone())
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app_router(app).oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Test GET /api/health
#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = send(&app, request("GET", "/api/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

/// Test signup success returns a usable token
#[tokio::test]
async fn test_signup_flow() {
    let app = TestApp::new().await;

    let response = send(
        &app,
        request(
            "POST",
            "/api/users",
            None,
            Some(json!({
                "name": "Example User",
                "email": "user@example.com",
                "password": "password",
                "password_confirmation": "password"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    let id = body["user"]["id"].as_i64().unwrap();
    assert_eq!(body["user"]["admin"], false);
    assert_eq!(body["redirect"], format!("/users/{id}"));
    assert_eq!(body["flash"]["kind"], "success");
    assert!(body["flash"]["message"]
        .as_str()
        .unwrap()
        .contains("Welcome"));
    assert_eq!(app.user_count().await, 1);

    // The token signs the new user in
    let token = body["token"].as_str().unwrap();
    let response = send(&app, request("GET", "/api/users", Some(token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Test signup with invalid data returns every field error
#[tokio::test]
async fn test_signup_validation_errors() {
    let app = TestApp::new().await;

    let response = send(
        &app,
        request(
            "POST",
            "/api/users",
            None,
            Some(json!({
                "name": "",
                "email": "user@invalid",
                "password": "foo",
                "password_confirmation": "bar"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["error"], "The form contains 4 errors.");
    assert_eq!(body["errors"]["name"][0], "can't be blank");
    assert_eq!(body["errors"]["email"][0], "is invalid");
    assert_eq!(
        body["errors"]["password"][0],
        "is too short (minimum is 6 characters)"
    );
    assert_eq!(
        body["errors"]["password_confirmation"][0],
        "doesn't match Password"
    );
    assert!(body["messages"]
        .as_array()
        .unwrap()
        .contains(&json!("Name can't be blank")));
    assert_eq!(app.user_count().await, 0);
}

/// Test signed-in users are sent back to the root
#[tokio::test]
async fn test_signup_while_signed_in() {
    let app = TestApp::new().await;
    let user = app.create_member(1).await;
    let token = app.token_for(&user).await;

    let response = send(
        &app,
        request(
            "POST",
            "/api/users",
            Some(token.as_str()),
            Some(json!({
                "name": "Another",
                "email": "another@example.com",
                "password": "password",
                "password_confirmation": "password"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json_body(response).await;
    assert_eq!(body["redirect"], "/");
    assert_eq!(app.user_count().await, 1);
}

/// Test GET /api/users requires sign in
#[tokio::test]
async fn test_index_requires_sign_in() {
    let app = TestApp::new().await;

    let response = send(&app, request("GET", "/api/users", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        request("GET", "/api/users", Some("not-a-token"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test index pagination and delete hints
#[tokio::test]
async fn test_index_pagination() {
    let app = TestApp::new().await;
    let admin = app.create_admin().await;
    for n in 1..=30 {
        app.create_member(n).await;
    }
    let token = app.token_for(&admin).await;

    let response = send(&app, request("GET", "/api/users", Some(token.as_str()), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 30);
    assert_eq!(body["pagination"]["total_count"], 31);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["pagination"]["paginated"], true);

    let response = send(
        &app,
        request("GET", "/api/users?page=2", Some(token.as_str()), None),
    )
    .await;
    let body = json_body(response).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);

    for page in ["/api/users?page=1", "/api/users?page=2"] {
        let response = send(&app, request("GET", page, Some(token.as_str()), None)).await;
        let body = json_body(response).await;
        for entry in body["users"].as_array().unwrap() {
            let own_row = entry["id"].as_i64() == Some(admin.id.get());
            assert_eq!(entry["deletable"], !own_row);
        }
    }

    let response = send(
        &app,
        request("GET", "/api/users?page=0", Some(token.as_str()), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test GET /api/users/:id is public
#[tokio::test]
async fn test_show_profile() {
    let app = TestApp::new().await;
    let user = app.create_member(1).await;

    let response = send(
        &app,
        request("GET", &format!("/api/users/{}", user.id), None, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["user"]["name"], user.name);
    assert_eq!(body["micropost_count"], 0);
    assert!(body["user"].get("email").is_none());

    let response = send(&app, request("GET", "/api/users/9999", None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test edit form access rules
#[tokio::test]
async fn test_edit_form_access() {
    let app = TestApp::new().await;
    let user = app.create_member(1).await;
    let other = app.create_member(2).await;
    let token = app.token_for(&user).await;
    let edit_path = format!("/api/users/{}/edit", user.id);

    let response = send(&app, request("GET", &edit_path, None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, request("GET", &edit_path, Some(token.as_str()), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], user.email);

    let other_token = app.token_for(&other).await;
    let response = send(&app, request("GET", &edit_path, Some(other_token.as_str()), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Test PATCH /api/users/:id
#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new().await;
    let user = app.create_member(1).await;
    let other = app.create_member(2).await;
    let token = app.token_for(&user).await;
    let path = format!("/api/users/{}", user.id);

    let response = send(
        &app,
        request(
            "PATCH",
            &path,
            Some(token.as_str()),
            Some(json!({ "name": "Renamed", "admin": true })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["name"], "Renamed");
    assert_eq!(body["user"]["admin"], false);
    assert_eq!(body["redirect"], format!("/users/{}", user.id));
    assert_eq!(body["flash"]["message"], "Profile updated");

    let response = send(
        &app,
        request(
            "PATCH",
            &path,
            Some(token.as_str()),
            Some(json!({ "email": "foo@invalid" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send(
        &app,
        request("PATCH", &path, None, Some(json!({ "name": "Anon" }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        request(
            "PATCH",
            &format!("/api/users/{}", other.id),
            Some(token.as_str()),
            Some(json!({ "name": "Hijacked" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let reloaded = app.storage.get_user(other.id).await.unwrap();
    assert_eq!(reloaded.name, other.name);
}

/// Test DELETE /api/users/:id
#[tokio::test]
async fn test_destroy_user() {
    let app = TestApp::new().await;
    let admin = app.create_admin().await;
    let user = app.create_member(1).await;
    let admin_token = app.token_for(&admin).await;
    let user_token = app.token_for(&user).await;

    // Anonymous, non-admin and admin-on-self are all refused
    let response = send(
        &app,
        request("DELETE", &format!("/api/users/{}", user.id), None, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        request(
            "DELETE",
            &format!("/api/users/{}", admin.id),
            Some(user_token.as_str()),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        request(
            "DELETE",
            &format!("/api/users/{}", admin.id),
            Some(admin_token.as_str()),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.user_count().await, 2);

    let response = send(
        &app,
        request(
            "DELETE",
            &format!("/api/users/{}", user.id),
            Some(admin_token.as_str()),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["redirect"], "/users");
    assert_eq!(body["flash"]["message"], "User deleted.");
    assert_eq!(app.user_count().await, 1);

    // The deleted user's token no longer works
    let response = send(&app, request("GET", "/api/users", Some(user_token.as_str()), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        request("DELETE", "/api/users/9999", Some(admin_token.as_str()), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test sign in and sign out
#[tokio::test]
async fn test_session_flow() {
    let app = TestApp::new().await;
    let user = app.create_member(1).await;

    let response = send(
        &app,
        request(
            "POST",
            "/api/sessions",
            None,
            Some(json!({ "email": user.email, "password": "wrong-password" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid email/password combination");

    let response = send(
        &app,
        request(
            "POST",
            "/api/sessions",
            None,
            Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["redirect"], format!("/users/{}", user.id));
    let token = body["token"].as_str().unwrap().to_string();

    let response = send(&app, request("DELETE", "/api/sessions", Some(token.as_str()), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["redirect"], "/");

    let response = send(&app, request("GET", "/api/users", Some(token.as_str()), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, request("DELETE", "/api/sessions", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
