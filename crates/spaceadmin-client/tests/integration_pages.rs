//! Integration tests for list and form pages against a mock backend

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use spaceadmin_client::resources::{Blogs, Properties, Roles, Users};
use spaceadmin_client::{Banner, CancellationToken, PageState, SubmitOutcome};
use spaceadmin_core::error::UNEXPECTED_RESPONSE_MESSAGE;
use spaceadmin_core::types::{BlogDraft, RecordStatus};
use spaceadmin_core::Error;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Blogs page 2 searching "launch" sends the title key in wire order
#[tokio::test]
async fn test_blog_search_uses_title_key() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/blog/list"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("title", "launch"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(blogs(), 12, 2, 10)))
        .expect(1)
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut page = state.list_page::<Blogs>();
    page.set_search("launch");
    page.set_page(2);
    page.load(&CancellationToken::new()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=2&limit=10&title=launch"));

    let loaded = page.state().data().unwrap();
    assert_eq!(loaded.items.len(), 2);
    assert_eq!(loaded.total, 12);
    assert!(loaded.has_prev());
    assert!(!loaded.has_next());
}

/// Property lists carry the city filter under the generic search key
#[tokio::test]
async fn test_property_city_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/property/list"))
        .and(query_param("search", "loft"))
        .and(query_param("city", "Pune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([{"id": "p1", "title": "Loft", "city": "Pune", "images": []}]),
            1,
            1,
            10,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut page = state.list_page::<Properties>();
    page.set_search("loft");
    page.set_city("Pune");
    page.load(&CancellationToken::new()).await.unwrap();

    assert_eq!(page.items()[0].city.as_deref(), Some("Pune"));
}

/// Deleting a missing role shows the server message and keeps the list
#[tokio::test]
async fn test_delete_missing_role_keeps_list() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/role/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roles()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/role/delete/r9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(404, "Role not found")))
        .expect(1)
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut page = state.list_page::<Roles>();
    let cancel = CancellationToken::new();
    page.load(&cancel).await.unwrap();

    let err = page.delete("r9", &cancel).await.unwrap_err();

    assert!(matches!(err, Error::Api { status: 404, .. }));
    assert_eq!(page.banner(), Some(&Banner::Error("Role not found".to_string())));
    assert_eq!(page.items().len(), 2);
}

/// A confirmed delete removes the row locally
#[tokio::test]
async fn test_delete_role_removes_row() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/role/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roles()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/role/delete/r1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": true, "message": "Role deleted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut page = state.list_page::<Roles>();
    let cancel = CancellationToken::new();
    page.load(&cancel).await.unwrap();
    page.delete("r1", &cancel).await.unwrap();

    assert_eq!(page.banner(), Some(&Banner::Success("Role deleted".to_string())));
    let ids: Vec<_> = page.items().iter().map(|role| role.id.as_str()).collect();
    assert_eq!(ids, vec!["r2"]);
    assert_eq!(page.state().data().unwrap().total, 1);
}

/// A list body in the wrong shape is an error, not an empty table
#[tokio::test]
async fn test_shape_mismatch_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/role/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(roles(), 2, 1, 10)))
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut page = state.list_page::<Roles>();
    let err = page.load(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, Error::Decode { ref endpoint, .. } if endpoint == "/role/list"));
    assert_eq!(page.state(), &PageState::Error(UNEXPECTED_RESPONSE_MESSAGE.to_string()));
}

/// Status changes reach the local row only after the backend confirms
#[tokio::test]
async fn test_user_status_update() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(users(), 2, 1, 10)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/user/status/u1"))
        .and(body_json(json!({"status": "inactive"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope("Status updated", json!(null))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/user/status/u2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut page = state.list_page::<Users>();
    let cancel = CancellationToken::new();
    page.load(&cancel).await.unwrap();

    page.update_status("u1", RecordStatus::Inactive, |user, s| user.status = s, &cancel)
        .await
        .unwrap();
    assert_eq!(page.items()[0].status, RecordStatus::Inactive);
    assert_eq!(page.banner(), Some(&Banner::Success("Status updated".to_string())));

    page.update_status("u2", RecordStatus::Inactive, |user, s| user.status = s, &cancel)
        .await
        .unwrap_err();
    assert_eq!(page.items()[1].status, RecordStatus::Active);
    assert_eq!(
        page.banner(),
        Some(&Banner::Error(
            spaceadmin_core::error::GENERIC_ERROR_MESSAGE.to_string()
        ))
    );
}

/// Creating a blog redirects to the list after the configured delay
#[tokio::test]
async fn test_blog_create_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/blog/add"))
        .and(body_json(json!({"title": "Launch", "content": "We are live"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(
            "Blog created",
            json!({"id": "b9", "title": "Launch", "content": "We are live"}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut form = state.create_page::<Blogs>();
    let draft = BlogDraft {
        title: "Launch".to_string(),
        content: "We are live".to_string(),
        ..BlogDraft::default()
    };

    let outcome = form
        .submit_create(&draft, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Redirect {
            to: "/blogs".to_string(),
            after: Duration::from_millis(1500),
        }
    );
    assert!(!form.is_submitting());
    assert_eq!(form.banner(), Some(&Banner::Success("Blog created".to_string())));
    assert_eq!(form.state().data().unwrap().id, "b9");
}

/// Editing loads the record, then updates it in place
#[tokio::test]
async fn test_blog_edit_stays_on_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/blog/detail/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "ok",
            json!({"id": "b1", "title": "Launch week", "content": "Draft"}),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/blog/update/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("", json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut form = state.edit_page::<Blogs>("b1");
    let cancel = CancellationToken::new();
    form.load(&cancel).await.unwrap();
    assert_eq!(form.state().data().unwrap().title, "Launch week");

    let draft = BlogDraft {
        title: "Launch week".to_string(),
        content: "Final".to_string(),
        ..BlogDraft::default()
    };
    let outcome = form.submit(&draft, &cancel).await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Stay);
    assert_eq!(
        form.banner(),
        Some(&Banner::Success("Blog updated successfully".to_string()))
    );
}

/// Cancelling an in-flight load leaves the page as it was
#[tokio::test]
async fn test_cancel_in_flight_load() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/blog/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(paged(blogs(), 2, 1, 10))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let (_, state) = signed_in_state(&server, vec![]);
    let mut page = state.list_page::<Blogs>();
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = page.load(&cancel).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert_eq!(page.state(), &PageState::Idle);
}
