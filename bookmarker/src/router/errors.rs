use thiserror::Error;

use super::guard::DenyReason;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Navigation to {target} denied: {reason:?}")]
    Denied { target: String, reason: DenyReason },

    #[error("Navigation to {target} exceeded {limit} redirects")]
    TooManyRedirects { target: String, limit: usize },
}
