use thiserror::Error;

use crate::api::HttpError;

#[derive(Debug, Error, Clone)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Corrupt stored state: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error, Clone)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// A non-2xx answer from an auth endpoint, with the message shown to the user.
    #[error("Authentication failed: {message}")]
    Rejected {
        status: Option<http::StatusCode>,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Whether the backend answered 403, i.e. the session is anonymous.
    pub fn is_auth_required(&self) -> bool {
        match self {
            Self::Http(err) => err.is_auth_required(),
            Self::Rejected { status, .. } => *status == Some(http::StatusCode::FORBIDDEN),
            _ => false,
        }
    }
}
