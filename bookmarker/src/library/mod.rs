//! Bookmark and list collections with their CRUD actions.

mod errors;
mod store;
mod types;

pub use errors::LibraryError;
pub use store::LibraryStore;
pub use types::{Bookmark, BookmarkChanges, BookmarkList, Filters, LibraryState, NewBookmark};
