use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub unread: bool,
    /// Id of the list the bookmark belongs to, if any.
    #[serde(default)]
    pub list: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkList {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST bookmarks/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBookmark {
    pub name: String,
    pub url: String,
    pub unread: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<i64>,
}

impl NewBookmark {
    /// New bookmarks start unread and outside any list.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            unread: true,
            list: None,
        }
    }

    pub fn in_list(mut self, list: i64) -> Self {
        self.list = Some(list);
        self
    }
}

/// Body of `PATCH bookmarks/{id}/`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookmarkChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    /// `Some(None)` removes the bookmark from its list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Option<i64>>,
}

impl BookmarkChanges {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn unread(mut self, unread: bool) -> Self {
        self.unread = Some(unread);
        self
    }

    pub fn list(mut self, list: Option<i64>) -> Self {
        self.list = Some(list);
        self
    }
}

/// Last-used bookmark query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub list: Option<i64>,
    pub unread: Option<bool>,
    pub search: Option<String>,
}

impl Filters {
    pub fn list(mut self, list: i64) -> Self {
        self.list = Some(list);
        self
    }

    pub fn unread(mut self, unread: bool) -> Self {
        self.unread = Some(unread);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Query parameters in `list`, `unread`, `search` order.
    ///
    /// `unread=false` and an empty search are the same as no filter and are
    /// left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(list) = self.list {
            pairs.push(("list", list.to_string()));
        }
        if self.unread == Some(true) {
            pairs.push(("unread", "true".to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    pub bookmarks: Vec<Bookmark>,
    pub lists: Vec<BookmarkList>,
    pub filters: Filters,
    pub error_message: String,
    pub loading: bool,
}

impl LibraryState {
    /// Removes the first bookmark with `id`. Unknown ids leave the
    /// collection untouched.
    pub fn remove_bookmark(&mut self, id: i64) -> Option<Bookmark> {
        let index = self.bookmarks.iter().position(|b| b.id == id)?;
        Some(self.bookmarks.remove(index))
    }

    /// Removes a list and reconciles the bookmarks that pointed at it:
    /// dropped when the delete cascaded, detached otherwise.
    pub fn remove_list(&mut self, id: i64, include_related: bool) {
        self.lists.retain(|l| l.id != id);
        if include_related {
            self.bookmarks.retain(|b| b.list != Some(id));
        } else {
            for bookmark in self.bookmarks.iter_mut().filter(|b| b.list == Some(id)) {
                bookmark.list = None;
            }
        }
    }

    pub fn mark_read(&mut self, id: i64) {
        if let Some(bookmark) = self.bookmarks.iter_mut().find(|b| b.id == id) {
            bookmark.unread = false;
        }
    }
}
