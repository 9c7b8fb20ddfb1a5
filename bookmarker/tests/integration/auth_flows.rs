/// Authentication flow tests
///
/// These drive login, registration, logout and the user-data refresh
/// against the mock backend and check both the returned navigation and the
/// committed session state.
use std::sync::Arc;

use bookmarker::{
    AuthError, AuthFlagStore, Bookmarker, BookmarkerError, Credentials, GENERIC_AUTH_ERROR,
    InMemoryFlagStore, Location, Route,
};

use crate::common::{CSRF_TOKEN, MockBackend, TEST_EMAIL, valid_credentials, wrong_password};

/// Opens the login view, which also fetches the CSRF token.
async fn on_login_view(backend: &MockBackend) -> Bookmarker {
    let mut app = backend.client().await;
    app.navigate("/login/")
        .await
        .expect("login view should be reachable");
    app
}

#[tokio::test]
async fn test_login_lands_on_library_without_pending_route() {
    let backend = MockBackend::start().await;
    let mut app = on_login_view(&backend).await;

    let outcome = app.login(&valid_credentials()).await.unwrap();

    assert_eq!(outcome.route, Route::Library);
    assert!(app.auth().authenticated);
    assert_eq!(
        app.auth().user_data.as_ref().map(|u| u.email.as_str()),
        Some(TEST_EMAIL)
    );
    assert_eq!(app.auth().error_message, "");
}

#[tokio::test]
async fn test_login_posts_form_with_csrf_header() {
    let backend = MockBackend::start().await;
    let mut app = on_login_view(&backend).await;

    app.login(&valid_credentials()).await.unwrap();

    let logins = backend.requests_to("POST", "login/");
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].csrf.as_deref(), Some(CSRF_TOKEN));
    assert!(logins[0].body.starts_with("email=reader%40example.com&password="));
}

/// Protected route → login → back to the original route
#[tokio::test]
async fn test_login_resumes_pending_to() {
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;

    // Given an anonymous visit to an edit view
    let redirected = app.navigate("/app/edit/5/").await.unwrap();
    assert_eq!(redirected.route, Route::Login);
    assert_eq!(redirected.location.query_value("to"), Some("/app/edit/5/"));

    // When the user logs in
    let outcome = app.login(&valid_credentials()).await.unwrap();

    // Then the edit view is opened
    assert_eq!(outcome.location, Location::new("/app/edit/5/"));
    assert_eq!(
        outcome.route,
        Route::EditBookmark {
            id: "5".to_string()
        }
    );
}

/// Shared link → login → create view pre-filled with the link
#[tokio::test]
async fn test_login_resumes_pending_save() {
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;

    let redirected = app.navigate("/https://example.com/article").await.unwrap();
    assert_eq!(redirected.route, Route::Login);
    assert_eq!(
        redirected.location.query_value("save"),
        Some("https://example.com/article")
    );

    let outcome = app.login(&valid_credentials()).await.unwrap();

    assert_eq!(
        outcome.location,
        Location::new("/app/create/").with_query("save", "https://example.com/article")
    );
    assert_eq!(outcome.route, Route::CreateBookmark);
}

#[tokio::test]
async fn test_login_failure_surfaces_detail() {
    let backend = MockBackend::start().await;
    let mut app = on_login_view(&backend).await;

    let result = app.login(&wrong_password()).await;

    assert!(matches!(
        result,
        Err(BookmarkerError::Auth(AuthError::Rejected { .. }))
    ));
    assert!(!app.auth().authenticated);
    assert_eq!(app.auth().error_message, "Invalid email or password");
    assert_eq!(
        app.current_route().map(|c| c.route.clone()),
        Some(Route::Login)
    );
}

#[tokio::test]
async fn test_login_without_csrf_token_is_anonymous_not_error() {
    // Given a backend that never sets the CSRF cookie
    let backend = MockBackend::start().await;
    backend.state().sets_csrf_cookie = false;
    let mut app = backend.client().await;

    // A missing cookie leaves the token unset without failing the fetch
    app.fetch_csrf_token().await.unwrap();
    assert_eq!(app.auth().csrf_token, None);

    // When logging in, the request goes out without the header and gets 403
    let result = app.login(&valid_credentials()).await;

    // Then the failure is treated as "not logged in" with no message
    assert!(result.is_err());
    assert_eq!(backend.requests_to("POST", "login/")[0].csrf, None);
    assert!(!app.auth().authenticated);
    assert_eq!(app.auth().error_message, "");
}

/// A 403 from `user/` is the anonymous case: no message, flag cleared
#[tokio::test]
async fn test_user_refresh_forbidden_clears_session_silently() {
    let backend = MockBackend::start().await;
    let flags = Arc::new(InMemoryFlagStore::with_flag(true));
    let mut app = Bookmarker::new(backend.config(), flags.clone())
        .await
        .unwrap();
    assert!(app.auth().authenticated);

    let result = app.refresh_user_data().await;

    assert!(result.is_err());
    assert!(!app.auth().authenticated);
    assert_eq!(app.auth().error_message, "");
    assert_eq!(flags.load().await.unwrap(), Some(false));
}

#[tokio::test]
async fn test_user_refresh_server_error_gets_message() {
    let backend = MockBackend::start().await;
    backend.state().fail("GET", "/api/user/");
    let mut app = backend.client().await;

    let result = app.refresh_user_data().await;

    assert!(result.is_err());
    assert_eq!(app.auth().error_message, "Server Error (500)");
    assert_ne!(app.auth().error_message, GENERIC_AUTH_ERROR);
}

#[tokio::test]
async fn test_register_lands_on_confirm_and_polls_status() {
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;
    app.navigate("/register/").await.unwrap();

    let outcome = app
        .register(&Credentials::new("new@example.com", "pw"))
        .await
        .unwrap();

    assert_eq!(outcome.route, Route::Confirm);
    assert!(app.auth().authenticated);
    assert!(!app.auth().is_confirmed());

    // Unconfirmed users are kept out of the library
    let blocked = app.navigate("/app/").await.unwrap();
    assert_eq!(blocked.route, Route::Confirm);

    // The confirmation arrives out of band
    assert!(!app.confirmed_status().await.unwrap());
    backend.state().confirmed = true;
    assert!(app.confirmed_status().await.unwrap());
    assert!(app.auth().is_confirmed());

    let library = app.navigate("/app/").await.unwrap();
    assert_eq!(library.route, Route::Library);
}

#[tokio::test]
async fn test_register_error_field_wins_over_detail() {
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;
    app.navigate("/register/").await.unwrap();

    let result = app.register(&Credentials::new("not-an-email", "pw")).await;

    assert!(result.is_err());
    assert_eq!(
        app.auth().error_message,
        "['Enter a valid email address.']"
    );
}

#[tokio::test]
async fn test_register_existing_account() {
    let backend = MockBackend::start().await;
    let mut app = backend.client().await;
    app.navigate("/register/").await.unwrap();

    let result = app.register(&valid_credentials()).await;

    assert!(result.is_err());
    assert_eq!(
        app.auth().error_message,
        "An account with this email already exists"
    );
}

#[tokio::test]
async fn test_resend_confirmation_sends_csrf() {
    let backend = MockBackend::start().await;
    let mut app = on_login_view(&backend).await;
    app.login(&valid_credentials()).await.unwrap();

    app.resend_confirmation().await.unwrap();

    let sent = backend.requests_to("POST", "resend-confirmation/");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].csrf.as_deref(), Some(CSRF_TOKEN));
}

#[tokio::test]
async fn test_logout_returns_to_index_and_clears_flag() {
    let backend = MockBackend::start().await;
    let flags = Arc::new(InMemoryFlagStore::new());
    let mut app = Bookmarker::new(backend.config(), flags.clone())
        .await
        .unwrap();
    app.navigate("/login/").await.unwrap();
    app.login(&valid_credentials()).await.unwrap();
    assert_eq!(flags.load().await.unwrap(), Some(true));

    let outcome = app.logout().await.unwrap();

    assert_eq!(outcome.route, Route::Index);
    assert!(!app.auth().authenticated);
    assert!(app.auth().user_data.is_none());
    assert_eq!(flags.load().await.unwrap(), Some(false));
}

#[tokio::test]
async fn test_logout_failure_keeps_session() {
    let backend = MockBackend::start().await;
    let mut app = on_login_view(&backend).await;
    app.login(&valid_credentials()).await.unwrap();
    backend.state().fail("POST", "/api/logout/");

    let result = app.logout().await;

    assert!(result.is_err());
    assert!(app.auth().authenticated);
    assert_eq!(app.auth().error_message, "Server Error (500)");
    assert_eq!(
        app.current_route().map(|c| c.route.clone()),
        Some(Route::Library)
    );
}
