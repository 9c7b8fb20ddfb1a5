use super::location::Location;
use super::route::Route;

/// Where to go once a user has logged in.
///
/// First match wins:
/// 1. `save` on the pending route: create-bookmark view pre-filled with it
/// 2. `to` on the pending route: that path
/// 3. the library view
pub fn post_login_target(pending: Option<&Location>) -> Location {
    if let Some(pending) = pending {
        if let Some(save) = pending.query_value("save") {
            return Route::CreateBookmark.location().with_query("save", save);
        }
        if let Some(to) = pending.query_value("to") {
            return Location::parse(to);
        }
    }
    Route::Library.location()
}

/// Where to go once a user has registered: the confirmation-required view.
pub fn post_register_target() -> Location {
    Route::Confirm.location()
}

/// Where to go once a user has logged out.
pub fn post_logout_target() -> Location {
    Route::Index.location()
}
