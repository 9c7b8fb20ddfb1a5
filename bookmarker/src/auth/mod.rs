//! Session state: authentication flag, user profile, CSRF token and the
//! pending route used by the post-login redirect.

mod errors;
mod storage;
mod store;
mod types;

pub use errors::{AuthError, StorageError};
pub use storage::{AuthFlagStore, FileFlagStore, InMemoryFlagStore};
pub use store::{AuthStore, GENERIC_AUTH_ERROR, auth_error_message};
pub use types::{AuthState, Credentials, UserData};
