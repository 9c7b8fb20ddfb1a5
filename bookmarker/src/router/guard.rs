use super::location::Location;
use super::redirect::post_login_target;
use super::route::{Route, RouteName};

/// The parts of the session the guard looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOptions {
    /// Whether `/<url>` paths are turned into "save this link" navigations.
    pub share_links: bool,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self { share_links: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    RedirectTo(Location),
    Deny(DenyReason),
}

/// Decides what happens to a navigation before its view is entered.
pub fn evaluate(
    target: &Location,
    session: &SessionSnapshot,
    options: &GuardOptions,
) -> NavigationDecision {
    let Some(route) = Route::resolve(target.path(), options.share_links) else {
        return NavigationDecision::Deny(DenyReason::NotFound);
    };

    let name = match route {
        Route::SharedLink { url } => {
            return NavigationDecision::RedirectTo(
                Route::CreateBookmark.location().with_query("save", url),
            );
        }
        other => other.name(),
    };

    match name {
        Some(RouteName::Index) if session.authenticated => {
            NavigationDecision::RedirectTo(Route::Library.location())
        }
        Some(name) if name.requires_login() => require_login(target, session),
        Some(RouteName::Login | RouteName::Register) if session.authenticated => {
            NavigationDecision::RedirectTo(post_login_target(Some(target)))
        }
        _ => NavigationDecision::Allow,
    }
}

fn require_login(target: &Location, session: &SessionSnapshot) -> NavigationDecision {
    if session.authenticated {
        return if session.confirmed {
            NavigationDecision::Allow
        } else {
            NavigationDecision::RedirectTo(Route::Confirm.location())
        };
    }

    let mut login = Route::Login.location().with_query("to", target.path());
    if let Some(save) = target.query_value("save") {
        login = login.with_query("save", save);
    }
    NavigationDecision::RedirectTo(login)
}
