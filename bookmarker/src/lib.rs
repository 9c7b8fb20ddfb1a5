//! bookmarker - client core for the Bookmarker web application
//!
//! This crate holds everything a Bookmarker front end needs besides
//! rendering: the HTTP adapter for the REST API, the session and library
//! state with their actions, and the navigation guard that gates views on
//! authentication and confirmation.
//!
//! [`Bookmarker`] wires the pieces together and is the usual entry point.

mod api;
mod app;
mod auth;
mod config;
mod library;
mod router;

pub use api::{ApiClient, ApiRequest, ApiResponse, HttpError};

pub use app::{Bookmarker, BookmarkerError};

pub use auth::{
    AuthError, AuthFlagStore, AuthState, AuthStore, Credentials, FileFlagStore, GENERIC_AUTH_ERROR,
    InMemoryFlagStore, StorageError, UserData, auth_error_message,
};

pub use config::{
    BOOKMARKER_API_URL, BOOKMARKER_CSRF_COOKIE_NAME, BOOKMARKER_CSRF_HEADER_NAME,
    BOOKMARKER_HTTP_TIMEOUT_SECS, BOOKMARKER_MARK_READ_TIMEOUT_MS, BOOKMARKER_SHARE_LINK_ROUTE,
    BOOKMARKER_STATE_FILE, ClientConfig,
};

pub use library::{
    Bookmark, BookmarkChanges, BookmarkList, Filters, LibraryError, LibraryState, LibraryStore,
    NewBookmark,
};

pub use router::{
    CurrentRoute, DenyReason, GuardOptions, Location, MAX_REDIRECTS, NavigationDecision,
    NavigationHooks, NavigationOutcome, Navigator, Route, RouteName, RouterError, SessionSnapshot,
    evaluate, post_login_target, post_logout_target, post_register_target,
};
