use thiserror::Error;

use crate::api::HttpError;

/// Library failures. The display text is the message shown to the user.
#[derive(Debug, Error, Clone)]
pub enum LibraryError {
    #[error("Error fetching data.")]
    Fetch(#[source] HttpError),

    #[error("Error saving bookmark. Please check the fields and try again.")]
    SaveBookmark(#[source] HttpError),

    #[error("Error creating new list. Please check the fields and try again.")]
    SaveList(#[source] HttpError),

    #[error("Error deleting bookmark.")]
    DeleteBookmark(#[source] HttpError),

    #[error("Error deleting list.")]
    DeleteList(#[source] HttpError),
}

impl LibraryError {
    /// The underlying HTTP failure.
    pub fn http_error(&self) -> &HttpError {
        match self {
            Self::Fetch(e)
            | Self::SaveBookmark(e)
            | Self::SaveList(e)
            | Self::DeleteBookmark(e)
            | Self::DeleteList(e) => e,
        }
    }
}
