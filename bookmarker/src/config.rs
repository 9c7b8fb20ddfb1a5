//! Central configuration for the bookmarker crate

use std::sync::LazyLock;
use std::time::Duration;

/// Base URL of the Bookmarker REST API
///
/// Every endpoint path is resolved relative to this URL.
/// Default: "http://127.0.0.1:8000/api/"
pub static BOOKMARKER_API_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("BOOKMARKER_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/api/".to_string())
});

/// Name of the cookie set by `set-cookie/` that carries the CSRF token
/// Default: "csrftoken"
pub static BOOKMARKER_CSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("BOOKMARKER_CSRF_COOKIE_NAME").unwrap_or_else(|_| "csrftoken".to_string())
});

/// Header carrying the CSRF token on state-changing requests
/// Default: "X-CSRFToken"
pub static BOOKMARKER_CSRF_HEADER_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("BOOKMARKER_CSRF_HEADER_NAME").unwrap_or_else(|_| "X-CSRFToken".to_string())
});

/// Timeout applied to every API request, in seconds.
/// Default: 30
pub static BOOKMARKER_HTTP_TIMEOUT_SECS: LazyLock<u64> =
    LazyLock::new(|| env_u64("BOOKMARKER_HTTP_TIMEOUT_SECS", 30));

/// Upper bound for the fire-and-forget "mark as read" request.
/// Default: 1000 milliseconds
pub static BOOKMARKER_MARK_READ_TIMEOUT_MS: LazyLock<u64> =
    LazyLock::new(|| env_u64("BOOKMARKER_MARK_READ_TIMEOUT_MS", 1000));

/// Enables the `/<url>` catch-all route that turns a raw link into a
/// "create bookmark" navigation.
/// Default: true
pub static BOOKMARKER_SHARE_LINK_ROUTE: LazyLock<bool> =
    LazyLock::new(|| env_flag("BOOKMARKER_SHARE_LINK_ROUTE", true));

/// File used by [`crate::FileFlagStore`] to persist the authenticated flag.
/// Default: ".bookmarker_state.json"
pub static BOOKMARKER_STATE_FILE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("BOOKMARKER_STATE_FILE").unwrap_or_else(|_| ".bookmarker_state.json".to_string())
});

/// Per-instance client configuration.
///
/// `from_env()` picks up the process-wide defaults above; tests build one
/// explicitly with [`ClientConfig::new`] and the `with_*` setters.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub csrf_cookie_name: String,
    pub csrf_header_name: String,
    pub timeout: Duration,
    pub mark_read_timeout: Duration,
    pub share_link_route: bool,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(&api_url.into()),
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header_name: "X-CSRFToken".to_string(),
            timeout: Duration::from_secs(30),
            mark_read_timeout: Duration::from_millis(1000),
            share_link_route: true,
        }
    }

    pub fn from_env() -> Self {
        Self {
            api_url: normalize_base_url(BOOKMARKER_API_URL.as_str()),
            csrf_cookie_name: BOOKMARKER_CSRF_COOKIE_NAME.clone(),
            csrf_header_name: BOOKMARKER_CSRF_HEADER_NAME.clone(),
            timeout: Duration::from_secs(*BOOKMARKER_HTTP_TIMEOUT_SECS),
            mark_read_timeout: Duration::from_millis(*BOOKMARKER_MARK_READ_TIMEOUT_MS),
            share_link_route: *BOOKMARKER_SHARE_LINK_ROUTE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mark_read_timeout(mut self, timeout: Duration) -> Self {
        self.mark_read_timeout = timeout;
        self
    }

    pub fn with_share_link_route(mut self, enabled: bool) -> Self {
        self.share_link_route = enabled;
        self
    }

    pub fn with_csrf_names(mut self, cookie: impl Into<String>, header: impl Into<String>) -> Self {
        self.csrf_cookie_name = cookie.into();
        self.csrf_header_name = header.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

// Unset or unparsable values fall back to `default`.
fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

// Only "false" (any case) turns a default-on flag off, and only "true"
// turns a default-off flag on.
fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) if default => !val.eq_ignore_ascii_case("false"),
        Ok(val) => val.eq_ignore_ascii_case("true"),
        Err(_) => default,
    }
}

// Relative joins drop the last path segment unless the base ends in '/'.
fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
