/// Navigation flow tests
///
/// The guard decisions are unit tested in the crate; these check the
/// session refreshes a navigation triggers over HTTP.
use bookmarker::{BookmarkerError, ClientConfig, InMemoryFlagStore, Route, RouterError};

use crate::common::{MockBackend, valid_credentials};

/// Paths of the requests the backend has seen, in order.
fn paths(backend: &MockBackend) -> Vec<String> {
    backend.requests().into_iter().map(|r| r.path).collect()
}

#[tokio::test]
async fn test_route_change_refreshes_csrf_then_user() {
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;

    app.navigate("/").await.unwrap();

    assert_eq!(paths(&backend), vec!["/api/set-cookie/", "/api/user/"]);
    assert!(app.auth().csrf_token.is_some());
}

#[tokio::test]
async fn test_same_route_name_issues_no_requests() {
    // Given a logged-in user on the library view
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;
    app.navigate("/login/").await.unwrap();
    app.login(&valid_credentials()).await.unwrap();
    backend.clear_requests();

    // When only the query changes
    let outcome = app.navigate("/app/?list=3").await.unwrap();

    // Then no refresh request is sent
    assert_eq!(outcome.route, Route::Library);
    assert!(!outcome.refreshed);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_stale_persisted_flag_falls_back_to_login() {
    // Given a client that remembers being logged in, but the server session is gone
    let backend = MockBackend::start().await;
    let mut app = backend.client_with_flag(Some(true)).await;

    // When opening the library
    let outcome = app.navigate("/app/").await.unwrap();

    // Then the refreshed session sends the user to login
    assert_eq!(outcome.route, Route::Login);
    assert_eq!(outcome.location.query_value("to"), Some("/app/"));
    assert!(!app.auth().authenticated);
    assert_eq!(app.auth().error_message, "");
}

#[tokio::test]
async fn test_authenticated_index_goes_to_library() {
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;
    app.navigate("/login/").await.unwrap();
    app.login(&valid_credentials()).await.unwrap();

    let outcome = app.navigate("/").await.unwrap();

    assert_eq!(outcome.route, Route::Library);
}

#[tokio::test]
async fn test_authenticated_login_view_applies_post_login_policy() {
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;
    app.navigate("/login/").await.unwrap();
    app.login(&valid_credentials()).await.unwrap();

    let outcome = app.navigate("/login/?to=%2Fapp%2Frename%2F2%2F").await.unwrap();

    assert_eq!(
        outcome.route,
        Route::RenameList {
            list_id: "2".to_string()
        }
    );
}

#[tokio::test]
async fn test_shared_link_disabled_is_not_found() {
    let backend = MockBackend::start().await;
    let config: ClientConfig = backend.config().with_share_link_route(false);
    let mut app = bookmarker::Bookmarker::new(config, std::sync::Arc::new(InMemoryFlagStore::new()))
        .await
        .unwrap();

    let result = app.navigate("/https://example.com/").await;

    assert!(matches!(
        result,
        Err(BookmarkerError::Router(RouterError::Denied { .. }))
    ));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_unconfirmed_user_is_sent_to_confirm() {
    let backend = MockBackend::start().await;
    backend.state().confirmed = false;
    let mut app = backend.client().await;
    app.navigate("/login/").await.unwrap();

    let outcome = app.login(&valid_credentials()).await.unwrap();

    assert_eq!(outcome.route, Route::Confirm);
    assert!(app.auth().authenticated);
}
