use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::router::{Location, SessionSnapshot};

/// Profile returned by `user/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub is_confirmed: bool,
    /// Fields the client does not interpret, kept as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Form fields posted to `login/` and `register/`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub(crate) fn form_pairs(&self) -> [(&'static str, &str); 2] {
        [("email", self.email.as_str()), ("password", self.password.as_str())]
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Client-side session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub authenticated: bool,
    pub user_data: Option<UserData>,
    pub csrf_token: Option<String>,
    /// Last user-facing auth message. Empty means nothing to show.
    pub error_message: String,
    /// Last navigation target, consulted by the post-login redirect.
    pub route: Option<Location>,
}

impl AuthState {
    pub fn is_confirmed(&self) -> bool {
        self.user_data.as_ref().is_some_and(|u| u.is_confirmed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            authenticated: self.authenticated,
            confirmed: self.is_confirmed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub(crate) struct PersistedFlags {
    pub(crate) authenticated: bool,
}
