use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum HttpError {
    /// The request never produced a response (connection failure, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// 403 from the backend. Expected for anonymous sessions.
    #[error("Authentication required")]
    AuthRequired { body: Option<Value> },

    #[error("Server responded with {status}")]
    Status {
        status: StatusCode,
        body: Option<Value>,
    },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HttpError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::AuthRequired { .. } => Some(StatusCode::FORBIDDEN),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// JSON body of the error response, if the server sent one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::AuthRequired { body } | Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }

    pub(crate) fn from_status(status: StatusCode, body: Option<Value>) -> Self {
        if status == StatusCode::FORBIDDEN {
            Self::AuthRequired { body }
        } else {
            Self::Status { status, body }
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
