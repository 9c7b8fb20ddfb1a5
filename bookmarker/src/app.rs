use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::api::{ApiClient, HttpError};
use crate::auth::{AuthError, AuthFlagStore, AuthState, AuthStore, Credentials, FileFlagStore};
use crate::config::ClientConfig;
use crate::library::{
    Bookmark, BookmarkChanges, BookmarkList, Filters, LibraryError, LibraryState, LibraryStore,
    NewBookmark,
};
use crate::router::{
    CurrentRoute, GuardOptions, Location, NavigationHooks, NavigationOutcome, Navigator,
    RouterError, SessionSnapshot,
};

/// Errors surfaced by [`Bookmarker`]
#[derive(Debug, Error, Clone)]
pub enum BookmarkerError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Router error: {0}")]
    Router(#[from] RouterError),
}

impl BookmarkerError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Http(err) => tracing::error!("HTTP error: {}", err),
            Self::Auth(err) => tracing::error!("Auth error: {}", err),
            Self::Library(err) => tracing::error!("Library error: {} ({})", err, err.http_error()),
            Self::Router(err) => tracing::error!("Router error: {}", err),
        }
        self
    }

    /// The message a view would display, if any.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Library(err) => Some(err.to_string()),
            Self::Auth(AuthError::Rejected { message, .. }) if !message.is_empty() => {
                Some(message.clone())
            }
            _ => None,
        }
    }
}

/// Application context: the HTTP client, both state slices and the navigator.
///
/// Views hold one of these and go through it for every action; auth actions
/// that end in a redirect are routed through the navigator before returning.
#[derive(Debug)]
pub struct Bookmarker {
    api: ApiClient,
    auth: AuthStore,
    library: LibraryStore,
    navigator: Navigator,
}

impl Bookmarker {
    pub async fn new(
        config: ClientConfig,
        flags: Arc<dyn AuthFlagStore>,
    ) -> Result<Self, BookmarkerError> {
        let api = ApiClient::new(&config)?;
        let auth = AuthStore::new(flags, config.csrf_cookie_name.clone()).await;
        let library = LibraryStore::new(config.mark_read_timeout);
        let navigator = Navigator::new(GuardOptions {
            share_links: config.share_link_route,
        });

        Ok(Self {
            api,
            auth,
            library,
            navigator,
        })
    }

    /// Configuration and flag file taken from the `BOOKMARKER_*` environment.
    pub async fn from_env() -> Result<Self, BookmarkerError> {
        Self::new(ClientConfig::from_env(), Arc::new(FileFlagStore::from_env())).await
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> &AuthState {
        self.auth.state()
    }

    pub fn library(&self) -> &LibraryState {
        self.library.state()
    }

    pub fn current_route(&self) -> Option<&CurrentRoute> {
        self.navigator.current()
    }

    pub fn clear_error_messages(&mut self) {
        self.auth.clear_error_message();
        self.library.clear_error_message();
    }

    pub async fn navigate(
        &mut self,
        target: impl Into<Location>,
    ) -> Result<NavigationOutcome, BookmarkerError> {
        let mut hooks = SessionHooks {
            api: &self.api,
            auth: &mut self.auth,
        };
        let outcome = self.navigator.navigate(target.into(), &mut hooks).await?;
        Ok(outcome)
    }

    // Auth actions

    pub async fn fetch_csrf_token(&mut self) -> Result<(), BookmarkerError> {
        Ok(self.auth.fetch_csrf_token(&self.api).await?)
    }

    /// Logs in and navigates to the post-login target.
    pub async fn login(
        &mut self,
        credentials: &Credentials,
    ) -> Result<NavigationOutcome, BookmarkerError> {
        let target = self.auth.login(&self.api, credentials).await?;
        self.navigate(target).await
    }

    /// Registers and navigates to the confirmation view.
    pub async fn register(
        &mut self,
        credentials: &Credentials,
    ) -> Result<NavigationOutcome, BookmarkerError> {
        let target = self.auth.register(&self.api, credentials).await?;
        self.navigate(target).await
    }

    pub async fn refresh_user_data(&mut self) -> Result<(), BookmarkerError> {
        Ok(self.auth.refresh_user_data(&self.api).await?)
    }

    /// Logs out and navigates to the public index.
    pub async fn logout(&mut self) -> Result<NavigationOutcome, BookmarkerError> {
        let target = self.auth.logout(&self.api).await?;
        self.navigate(target).await
    }

    pub async fn resend_confirmation(&mut self) -> Result<(), BookmarkerError> {
        Ok(self.auth.resend_confirmation(&self.api).await?)
    }

    pub async fn confirmed_status(&mut self) -> Result<bool, BookmarkerError> {
        Ok(self.auth.confirmed_status(&self.api).await?)
    }

    // Library actions

    pub async fn update_bookmarks(&mut self, filters: Filters) -> Result<(), BookmarkerError> {
        Ok(self.library.update_bookmarks(&self.api, filters).await?)
    }

    pub async fn refresh_bookmarks(&mut self) -> Result<(), BookmarkerError> {
        Ok(self.library.refresh_bookmarks(&self.api).await?)
    }

    pub async fn update_lists(&mut self) -> Result<(), BookmarkerError> {
        Ok(self.library.update_lists(&self.api).await?)
    }

    pub async fn create_bookmark(
        &mut self,
        bookmark: &NewBookmark,
    ) -> Result<Bookmark, BookmarkerError> {
        let csrf = self.auth.csrf_token();
        Ok(self.library.create_bookmark(&self.api, csrf, bookmark).await?)
    }

    pub async fn edit_bookmark(
        &mut self,
        id: i64,
        changes: &BookmarkChanges,
    ) -> Result<(), BookmarkerError> {
        let csrf = self.auth.csrf_token();
        Ok(self.library.edit_bookmark(&self.api, csrf, id, changes).await?)
    }

    pub async fn delete_bookmark(&mut self, id: i64) -> Result<(), BookmarkerError> {
        let csrf = self.auth.csrf_token();
        Ok(self.library.delete_bookmark(&self.api, csrf, id).await?)
    }

    pub async fn create_list(&mut self, name: &str) -> Result<BookmarkList, BookmarkerError> {
        let csrf = self.auth.csrf_token();
        Ok(self.library.create_list(&self.api, csrf, name).await?)
    }

    pub async fn edit_list(&mut self, id: i64, name: &str) -> Result<(), BookmarkerError> {
        let csrf = self.auth.csrf_token();
        Ok(self.library.edit_list(&self.api, csrf, id, name).await?)
    }

    pub async fn delete_list(
        &mut self,
        id: i64,
        include_related: bool,
    ) -> Result<(), BookmarkerError> {
        let csrf = self.auth.csrf_token();
        Ok(self
            .library
            .delete_list(&self.api, csrf, id, include_related)
            .await?)
    }

    /// Never fails; see [`LibraryStore::mark_as_read`].
    pub async fn mark_as_read(&mut self, id: i64) {
        let csrf = self.auth.csrf_token();
        self.library.mark_as_read(&self.api, csrf, id).await;
    }
}

/// Lets the navigator read and refresh the session without owning it.
struct SessionHooks<'a> {
    api: &'a ApiClient,
    auth: &'a mut AuthStore,
}

#[async_trait]
impl<'a> NavigationHooks for SessionHooks<'a> {
    type Error = AuthError;

    fn session(&self) -> SessionSnapshot {
        self.auth.snapshot()
    }

    fn record_route(&mut self, location: &Location) {
        self.auth.record_route(location);
    }

    async fn refresh_csrf_token(&mut self) -> Result<(), AuthError> {
        self.auth.fetch_csrf_token(self.api).await
    }

    async fn refresh_user_data(&mut self) -> Result<(), AuthError> {
        self.auth.refresh_user_data(self.api).await
    }
}
