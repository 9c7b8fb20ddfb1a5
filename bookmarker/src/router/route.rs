use std::fmt;

use super::location::Location;

/// Names of the views a navigation can end on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Index,
    Library,
    EditBookmark,
    CreateBookmark,
    RenameList,
    Login,
    Register,
    Confirm,
    ConfirmSuccess,
}

impl RouteName {
    /// Views that require an authenticated, confirmed session.
    pub fn requires_login(self) -> bool {
        matches!(
            self,
            Self::Library | Self::EditBookmark | Self::CreateBookmark | Self::RenameList
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Library => "library",
            Self::EditBookmark => "editBookmark",
            Self::CreateBookmark => "createBookmark",
            Self::RenameList => "renameList",
            Self::Login => "login",
            Self::Register => "register",
            Self::Confirm => "confirm",
            Self::ConfirmSuccess => "confirmSuccess",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path matched against the route table.
///
/// | path                    | route            |
/// |-------------------------|------------------|
/// | `/`                     | `Index`          |
/// | `/app/`                 | `Library`        |
/// | `/app/edit/:id/`        | `EditBookmark`   |
/// | `/app/create/`          | `CreateBookmark` |
/// | `/app/rename/:listId/`  | `RenameList`     |
/// | `/login/`               | `Login`          |
/// | `/register/`            | `Register`       |
/// | `/confirm/`             | `Confirm`        |
/// | `/confirmed/`           | `ConfirmSuccess` |
/// | `/:url(http.*)`         | `SharedLink`     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Library,
    EditBookmark { id: String },
    CreateBookmark,
    RenameList { list_id: String },
    Login,
    Register,
    Confirm,
    ConfirmSuccess,
    /// Unnamed redirect-only route carrying a raw link to save.
    SharedLink { url: String },
}

impl Route {
    /// Matches a path. Trailing slashes are optional; `SharedLink` only
    /// matches when `share_links` is enabled.
    pub fn resolve(path: &str, share_links: bool) -> Option<Self> {
        let rest = path.strip_prefix('/').unwrap_or(path);

        if share_links && rest.starts_with("http") {
            // Links pasted after the slash usually arrive percent-encoded.
            let url = urlencoding::decode(rest)
                .map_or_else(|_| rest.to_string(), |decoded| decoded.into_owned());
            return Some(Self::SharedLink { url });
        }

        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Self::Index,
            ["app"] => Self::Library,
            ["app", "edit", id] => Self::EditBookmark { id: id.to_string() },
            ["app", "create"] => Self::CreateBookmark,
            ["app", "rename", list_id] => Self::RenameList {
                list_id: list_id.to_string(),
            },
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["confirm"] => Self::Confirm,
            ["confirmed"] => Self::ConfirmSuccess,
            _ => return None,
        };
        Some(route)
    }

    pub fn name(&self) -> Option<RouteName> {
        let name = match self {
            Self::Index => RouteName::Index,
            Self::Library => RouteName::Library,
            Self::EditBookmark { .. } => RouteName::EditBookmark,
            Self::CreateBookmark => RouteName::CreateBookmark,
            Self::RenameList { .. } => RouteName::RenameList,
            Self::Login => RouteName::Login,
            Self::Register => RouteName::Register,
            Self::Confirm => RouteName::Confirm,
            Self::ConfirmSuccess => RouteName::ConfirmSuccess,
            Self::SharedLink { .. } => return None,
        };
        Some(name)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Index => "/".to_string(),
            Self::Library => "/app/".to_string(),
            Self::EditBookmark { id } => format!("/app/edit/{id}/"),
            Self::CreateBookmark => "/app/create/".to_string(),
            Self::RenameList { list_id } => format!("/app/rename/{list_id}/"),
            Self::Login => "/login/".to_string(),
            Self::Register => "/register/".to_string(),
            Self::Confirm => "/confirm/".to_string(),
            Self::ConfirmSuccess => "/confirmed/".to_string(),
            Self::SharedLink { url } => format!("/{url}"),
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.path())
    }
}
