use std::sync::Arc;

use serde_json::Value;

use super::errors::AuthError;
use super::storage::AuthFlagStore;
use super::types::{AuthState, Credentials, UserData};
use crate::api::{ApiClient, HttpError};
use crate::router::{
    Location, SessionSnapshot, post_login_target, post_logout_target, post_register_target,
};

pub const GENERIC_AUTH_ERROR: &str = "An unknown error occurred during authentication.";

/// Owns the session slice of the client state and the actions that mutate it.
///
/// Every action commits its user-facing outcome into
/// [`AuthState::error_message`] and also returns it as a `Result`, so callers
/// can choose between rendering the message and handling the error.
pub struct AuthStore {
    state: AuthState,
    flags: Arc<dyn AuthFlagStore>,
    csrf_cookie_name: String,
}

impl AuthStore {
    /// Restores the persisted `authenticated` flag. Everything else starts
    /// empty and is rebuilt from `user/`.
    pub async fn new(flags: Arc<dyn AuthFlagStore>, csrf_cookie_name: impl Into<String>) -> Self {
        let authenticated = match flags.load().await {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                tracing::warn!("Could not restore authenticated flag: {}", e);
                false
            }
        };
        tracing::debug!("Auth state restored, authenticated: {}", authenticated);

        Self {
            state: AuthState {
                authenticated,
                ..Default::default()
            },
            flags,
            csrf_cookie_name: csrf_cookie_name.into(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.state.csrf_token.as_deref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    pub fn clear_error_message(&mut self) {
        self.state.error_message.clear();
    }

    /// Captures the latest navigation target as the pending route.
    pub fn record_route(&mut self, location: &Location) {
        self.state.route = Some(location.clone());
    }

    /// Asks the backend for a session cookie and keeps the CSRF token it carries.
    ///
    /// A response without the cookie is not an error: the token is left unset
    /// and mutating calls then fail with 403 downstream. Only a failed
    /// `set-cookie/` request is returned as `Err`.
    pub async fn fetch_csrf_token(&mut self, api: &ApiClient) -> Result<(), AuthError> {
        api.get("set-cookie/").send().await?;

        self.state.csrf_token = api.cookie(&self.csrf_cookie_name);
        if self.state.csrf_token.is_some() {
            tracing::debug!("CSRF token refreshed");
        } else {
            tracing::warn!("No '{}' cookie after set-cookie/", self.csrf_cookie_name);
        }
        Ok(())
    }

    /// Logs in and returns where the user should land next.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        credentials: &Credentials,
    ) -> Result<Location, AuthError> {
        tracing::debug!("Logging in {}", credentials.email);
        self.submit_credentials(api, "login/", credentials).await?;
        Ok(post_login_target(self.state.route.as_ref()))
    }

    /// Creates an account. New accounts land on the confirmation view.
    pub async fn register(
        &mut self,
        api: &ApiClient,
        credentials: &Credentials,
    ) -> Result<Location, AuthError> {
        tracing::debug!("Registering {}", credentials.email);
        self.submit_credentials(api, "register/", credentials).await?;
        Ok(post_register_target())
    }

    async fn submit_credentials(
        &mut self,
        api: &ApiClient,
        path: &str,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        let result = api
            .post(path)
            .form(credentials.form_pairs())
            .csrf(self.csrf_token())
            .send()
            .await;
        if let Err(e) = result {
            return Err(self.fail(e).await);
        }
        self.refresh_user_data(api).await
    }

    pub async fn refresh_user_data(&mut self, api: &ApiClient) -> Result<(), AuthError> {
        let result = match api.get("user/").send().await {
            Ok(response) => response.json::<UserData>(),
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                tracing::debug!("User data refreshed for {}", user.email);
                self.state.authenticated = true;
                self.state.user_data = Some(user);
                self.state.error_message.clear();
                self.persist(true).await;
                Ok(())
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// Ends the session. On failure the local session is kept as it was.
    pub async fn logout(&mut self, api: &ApiClient) -> Result<Location, AuthError> {
        let result = api
            .post("logout/")
            .form(std::iter::empty::<(&str, &str)>())
            .csrf(self.csrf_token())
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!("Logged out");
                self.state.authenticated = false;
                self.state.user_data = None;
                self.state.error_message.clear();
                self.persist(false).await;
                Ok(post_logout_target())
            }
            Err(e) => {
                tracing::warn!("Logout failed: {}", e);
                self.state.error_message = auth_error_message(&e);
                Err(e.into())
            }
        }
    }

    /// Asks the backend to send the confirmation email again.
    pub async fn resend_confirmation(&mut self, api: &ApiClient) -> Result<(), AuthError> {
        let result = api
            .post("resend-confirmation/")
            .form(std::iter::empty::<(&str, &str)>())
            .csrf(self.csrf_token())
            .send()
            .await;

        match result {
            Ok(_) => {
                self.state.error_message.clear();
                Ok(())
            }
            Err(e) => {
                self.state.error_message = auth_error_message(&e);
                Err(e.into())
            }
        }
    }

    /// Polls whether the account has been confirmed, updating the cached profile.
    pub async fn confirmed_status(&mut self, api: &ApiClient) -> Result<bool, AuthError> {
        let result = api.get("confirmed-status/").send().await.and_then(|response| {
            response
                .body
                .as_ref()
                .and_then(|body| body.get("detail"))
                .and_then(Value::as_bool)
                .ok_or_else(|| HttpError::Malformed("expected {\"detail\": bool}".to_string()))
        });

        match result {
            Ok(confirmed) => {
                if let Some(user) = self.state.user_data.as_mut() {
                    user.is_confirmed = confirmed;
                }
                Ok(confirmed)
            }
            Err(e) => {
                self.state.error_message = auth_error_message(&e);
                Err(e.into())
            }
        }
    }

    /// Shared failure path of login, register and user refresh: the session
    /// becomes anonymous and the message is extracted from the response.
    async fn fail(&mut self, err: HttpError) -> AuthError {
        let message = auth_error_message(&err);
        tracing::debug!("Auth action failed: {} ({:?})", err, message);

        self.state.authenticated = false;
        self.state.user_data = None;
        self.state.error_message = message.clone();
        self.persist(false).await;

        match err.status() {
            Some(status) => AuthError::Rejected {
                status: Some(status),
                message,
            },
            None => AuthError::Http(err),
        }
    }

    async fn persist(&self, authenticated: bool) {
        if let Err(e) = self.flags.store(authenticated).await {
            tracing::warn!("Could not persist authenticated flag: {}", e);
        }
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &self.state)
            .field("csrf_cookie_name", &self.csrf_cookie_name)
            .finish_non_exhaustive()
    }
}

/// Message shown for a failed auth call.
///
/// 403 means "anonymous" and yields an empty message. Otherwise the body's
/// `error` field wins over `detail`; anything else gets the generic text.
pub fn auth_error_message(err: &HttpError) -> String {
    if err.is_auth_required() {
        return String::new();
    }
    err.body()
        .and_then(body_message)
        .unwrap_or_else(|| GENERIC_AUTH_ERROR.to_string())
}

fn body_message(body: &Value) -> Option<String> {
    ["error", "detail"].iter().find_map(|key| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
    })
}
