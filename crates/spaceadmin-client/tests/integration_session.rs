//! Integration tests for login, logout, session restore and permissions

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use spaceadmin_client::storage::keys;
use spaceadmin_client::{AppState, CancellationToken, FileStorage, RouteDecision, Storage};
use spaceadmin_core::permission::modules;
use spaceadmin_core::types::LoginRequest;
use spaceadmin_core::{Error, PermissionAction};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials(user_type: i64) -> LoginRequest {
    LoginRequest {
        email: "asha@example.com".to_string(),
        password: "s3cret".to_string(),
        user_type,
    }
}

async fn mount_login(server: &MockServer, token: &str, user_type: i64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/login"))
        .and(body_json(json!({
            "email": "asha@example.com",
            "password": "s3cret",
            "user_type": user_type,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body(token, user_type)))
        .expect(1)
        .mount(server)
        .await;
}

/// Login as user type 4 persists the session and loads that type's matrix
#[tokio::test]
async fn test_login_persists_session_and_fetches_permissions() {
    init_test_logging();
    let server = MockServer::start().await;
    mount_login(&server, "tok-4", 4).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/role-permission/user-type/4"))
        .and(header("authorization", "Bearer tok-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "ok",
            json!([
                {"moduleName": "blogs", "permissions": {"view": true, "create": true}},
                {"moduleName": "jobs", "permissions": {"view": false}},
            ]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, state) = test_state(&server);
    let user = state
        .login(&credentials(4), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(user.email, "asha@example.com");

    let snapshot = storage.snapshot();
    assert_eq!(snapshot.get(keys::ADMIN_TOKEN).map(String::as_str), Some("tok-4"));
    assert_eq!(snapshot.get(keys::USER_TYPE).map(String::as_str), Some("4"));
    assert!(snapshot.contains_key(keys::USER_DATA));

    assert!(state.has_permission(modules::BLOGS, PermissionAction::Create));
    assert!(!state.has_permission(modules::BLOGS, PermissionAction::Delete));
    assert!(!state.has_permission(modules::JOBS, PermissionAction::View));

    let titles: Vec<_> = state.navigation().into_iter().map(|item| item.title).collect();
    assert_eq!(titles, vec!["Dashboard", "Blogs"]);
}

/// A user record without a type keeps the type the login asked for
#[tokio::test]
async fn test_login_without_user_type_uses_requested_type() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "Login successful",
            json!({
                "token": "tok-4",
                "user": {"id": "a1", "name": "Asha Rao", "email": "asha@example.com"},
            }),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/role-permission/user-type/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("ok", json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, state) = test_state(&server);
    state
        .login(&credentials(4), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        storage.snapshot().get(keys::USER_TYPE).map(String::as_str),
        Some("4")
    );
    assert_eq!(state.session().user_type, Some(4));
}

/// A failed permission fetch still signs in, with nothing granted
#[tokio::test]
async fn test_login_survives_permission_failure() {
    init_test_logging();
    let server = MockServer::start().await;
    mount_login(&server, "tok-2", 2).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/role-permission/user-type/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (_, state) = test_state(&server);
    state
        .login(&credentials(2), &CancellationToken::new())
        .await
        .unwrap();

    assert!(state.is_authenticated());
    assert!(state.session().permissions.is_empty());
    assert_eq!(state.navigation().len(), 1);
    assert!(matches!(state.guard("/users"), RouteDecision::Forbidden { .. }));
}

/// A matrix that arrives after the session changed is not applied to it
#[tokio::test]
async fn test_permissions_from_previous_session_are_discarded() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/role-permission/user-type/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(
                    "ok",
                    json!([{"moduleName": "blogs", "permissions": {"view": true}}]),
                ))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let fetch = tokio::spawn({
        let state = state.clone();
        async move { state.fetch_user_permissions(&CancellationToken::new()).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    state.logout().unwrap();
    state
        .shared_session()
        .write()
        .login("other-token".to_string(), admin_user(Some(2)), None)
        .unwrap();

    let returned = fetch.await.unwrap();
    assert!(returned.is_empty());
    assert!(state.session().permissions.is_empty());
    assert!(!state.has_permission(modules::BLOGS, PermissionAction::View));
}

/// Rejected credentials surface the server's message and store nothing
#[tokio::test]
async fn test_login_rejected() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_body(401, "Invalid email or password")),
        )
        .mount(&server)
        .await;

    let (storage, state) = test_state(&server);
    let err = state
        .login(&credentials(1), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 401, .. }));
    assert_eq!(err.banner_message(), "Invalid email or password");
    assert!(!state.is_authenticated());
    assert!(storage.snapshot().is_empty());
}

/// Invalid input never reaches the backend
#[tokio::test]
async fn test_login_validates_before_sending() {
    let server = MockServer::start().await;
    let (_, state) = test_state(&server);

    let request = LoginRequest {
        email: "not-an-email".to_string(),
        password: "x".to_string(),
        user_type: 1,
    };
    let err = state
        .login(&request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { ref field, .. } if field == "email"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Logout wipes every session key and protected routes bounce to login
#[tokio::test]
async fn test_logout_then_protected_route_redirects() {
    let server = MockServer::start().await;
    let (storage, state) = signed_in_state(&server, vec![]);
    state.set_sidebar_visible(false).unwrap();
    assert_eq!(state.guard("/dashboard"), RouteDecision::Render);

    state.logout().unwrap();

    let snapshot = storage.snapshot();
    for key in keys::ALL {
        assert!(!snapshot.contains_key(key), "{key} should be removed");
    }
    assert_eq!(state.guard("/users"), RouteDecision::Redirect("/admin"));
    assert_eq!(state.guard("/login"), RouteDecision::Render);
}

/// A session persisted to disk survives a restart until logout
#[tokio::test]
async fn test_session_restored_from_file_after_restart() {
    init_test_logging();
    let server = MockServer::start().await;
    mount_login(&server, "tok-3", 3).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/role-permission/user-type/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "ok",
            json!([{"moduleName": "roles", "permissions": {"view": true}}]),
        )))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    let cancel = CancellationToken::new();

    let first = AppState::new(
        test_config(&server),
        Arc::new(FileStorage::open(&file).unwrap()) as Arc<dyn Storage>,
    )
    .unwrap();
    first.login(&credentials(3), &cancel).await.unwrap();
    drop(first);

    let second = AppState::new(
        test_config(&server),
        Arc::new(FileStorage::open(&file).unwrap()) as Arc<dyn Storage>,
    )
    .unwrap();
    assert!(second.bootstrap(&cancel).await);
    assert_eq!(second.session().user_type, Some(3));
    assert!(second.has_permission(modules::ROLES, PermissionAction::View));
    assert_eq!(second.guard("/login"), RouteDecision::Redirect("/dashboard"));

    second.logout().unwrap();

    let third = AppState::new(
        test_config(&server),
        Arc::new(FileStorage::open(&file).unwrap()) as Arc<dyn Storage>,
    )
    .unwrap();
    assert!(!third.bootstrap(&cancel).await);
    assert!(!third.is_authenticated());
}
