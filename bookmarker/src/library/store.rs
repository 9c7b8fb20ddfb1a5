use std::time::Duration;

use serde_json::json;

use super::errors::LibraryError;
use super::types::{Bookmark, BookmarkChanges, BookmarkList, Filters, LibraryState, NewBookmark};
use crate::api::{ApiClient, HttpError};

/// Bookmark and list collections plus the actions that keep them in sync
/// with the backend.
///
/// Mutating actions take the CSRF token from the session; a missing token
/// is sent as no header and the backend rejects the call.
#[derive(Debug)]
pub struct LibraryStore {
    state: LibraryState,
    mark_read_timeout: Duration,
}

impl LibraryStore {
    pub fn new(mark_read_timeout: Duration) -> Self {
        Self {
            state: LibraryState::default(),
            mark_read_timeout,
        }
    }

    pub fn state(&self) -> &LibraryState {
        &self.state
    }

    pub fn clear_error_message(&mut self) {
        self.state.error_message.clear();
    }

    /// Replaces the bookmark collection with the filtered query result and
    /// remembers the filters.
    pub async fn update_bookmarks(
        &mut self,
        api: &ApiClient,
        filters: Filters,
    ) -> Result<(), LibraryError> {
        self.state.loading = true;
        let result = api
            .get("bookmarks/")
            .query(filters.query_pairs())
            .send()
            .await
            .and_then(|response| response.json::<Vec<Bookmark>>());
        self.state.loading = false;

        let bookmarks = self.settle(result, LibraryError::Fetch)?;
        tracing::debug!("Fetched {} bookmarks with {:?}", bookmarks.len(), filters);
        self.state.bookmarks = bookmarks;
        self.state.filters = filters;
        Ok(())
    }

    /// Re-runs the last bookmark query.
    pub async fn refresh_bookmarks(&mut self, api: &ApiClient) -> Result<(), LibraryError> {
        let filters = self.state.filters.clone();
        self.update_bookmarks(api, filters).await
    }

    pub async fn update_lists(&mut self, api: &ApiClient) -> Result<(), LibraryError> {
        self.state.loading = true;
        let result = api
            .get("lists/")
            .send()
            .await
            .and_then(|response| response.json::<Vec<BookmarkList>>());
        self.state.loading = false;

        self.state.lists = self.settle(result, LibraryError::Fetch)?;
        Ok(())
    }

    /// Creates a bookmark. The collection is left as is; views re-fetch.
    pub async fn create_bookmark(
        &mut self,
        api: &ApiClient,
        csrf_token: Option<&str>,
        bookmark: &NewBookmark,
    ) -> Result<Bookmark, LibraryError> {
        let result = api
            .post("bookmarks/")
            .json(bookmark)
            .csrf(csrf_token)
            .send()
            .await
            .and_then(|response| response.json::<Bookmark>());

        self.settle(result, LibraryError::SaveBookmark)
    }

    pub async fn edit_bookmark(
        &mut self,
        api: &ApiClient,
        csrf_token: Option<&str>,
        id: i64,
        changes: &BookmarkChanges,
    ) -> Result<(), LibraryError> {
        let result = api
            .patch(&format!("bookmarks/{id}/"))
            .json(changes)
            .csrf(csrf_token)
            .send()
            .await;

        self.settle(result, LibraryError::SaveBookmark).map(drop)
    }

    pub async fn delete_bookmark(
        &mut self,
        api: &ApiClient,
        csrf_token: Option<&str>,
        id: i64,
    ) -> Result<(), LibraryError> {
        let result = api
            .delete(&format!("bookmarks/{id}/"))
            .csrf(csrf_token)
            .send()
            .await;

        self.settle(result, LibraryError::DeleteBookmark)?;
        if self.state.remove_bookmark(id).is_none() {
            tracing::debug!("Deleted bookmark {} was not loaded locally", id);
        }
        Ok(())
    }

    pub async fn create_list(
        &mut self,
        api: &ApiClient,
        csrf_token: Option<&str>,
        name: &str,
    ) -> Result<BookmarkList, LibraryError> {
        let result = api
            .post("lists/")
            .json(&json!({ "name": name }))
            .csrf(csrf_token)
            .send()
            .await
            .and_then(|response| response.json::<BookmarkList>());

        self.settle(result, LibraryError::SaveList)
    }

    /// Renames a list.
    pub async fn edit_list(
        &mut self,
        api: &ApiClient,
        csrf_token: Option<&str>,
        id: i64,
        name: &str,
    ) -> Result<(), LibraryError> {
        let result = api
            .patch(&format!("lists/{id}/"))
            .json(&json!({ "name": name }))
            .csrf(csrf_token)
            .send()
            .await;

        self.settle(result, LibraryError::SaveList).map(drop)
    }

    /// Deletes a list. With `include_related` the backend also deletes the
    /// list's bookmarks; otherwise they are kept without a list.
    pub async fn delete_list(
        &mut self,
        api: &ApiClient,
        csrf_token: Option<&str>,
        id: i64,
        include_related: bool,
    ) -> Result<(), LibraryError> {
        let path = if include_related {
            format!("lists/{id}/include-related/")
        } else {
            format!("lists/{id}/")
        };
        let result = api.delete(&path).csrf(csrf_token).send().await;

        self.settle(result, LibraryError::DeleteList)?;
        self.state.remove_list(id, include_related);
        Ok(())
    }

    /// Flags a bookmark as read before the user follows it.
    ///
    /// Bounded by the mark-read timeout. Failures are logged and otherwise
    /// ignored; the error message is not touched.
    pub async fn mark_as_read(&mut self, api: &ApiClient, csrf_token: Option<&str>, id: i64) {
        let result = api
            .patch(&format!("bookmarks/{id}/"))
            .json(&json!({ "unread": false }))
            .csrf(csrf_token)
            .timeout(self.mark_read_timeout)
            .send()
            .await;

        match result {
            Ok(_) => self.state.mark_read(id),
            Err(e) => tracing::warn!("Ignoring failure to mark bookmark {} as read: {}", id, e),
        }
    }

    /// Commits the outcome of an action: success clears the message,
    /// failure sets the action's message.
    fn settle<T>(
        &mut self,
        result: Result<T, HttpError>,
        on_error: fn(HttpError) -> LibraryError,
    ) -> Result<T, LibraryError> {
        match result {
            Ok(value) => {
                self.state.error_message.clear();
                Ok(value)
            }
            Err(e) => {
                let err = on_error(e);
                tracing::debug!("Library action failed: {} ({})", err, err.http_error());
                self.state.error_message = err.to_string();
                Err(err)
            }
        }
    }
}

impl Default for LibraryStore {
    fn default() -> Self {
        Self::new(Duration::from_millis(*crate::config::BOOKMARKER_MARK_READ_TIMEOUT_MS))
    }
}
