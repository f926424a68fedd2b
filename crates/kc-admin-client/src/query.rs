//! Query parameters for collection endpoints.
//!
//! Each request builds a fresh value; nothing here is shared or mutated
//! between calls. Empty search terms are dropped so that they are never
//! sent as `search=`.

use serde::Serialize;

/// Normalizes a search term, treating blank input as no filter.
#[must_use]
pub fn search_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parameters for `GET groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupQuery {
    /// Offset of the first result.
    pub first: u32,
    /// Maximum number of results.
    pub max: u32,
    /// Name filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Parent group whose children are listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl GroupQuery {
    /// Creates a query for one window of top-level groups.
    #[must_use]
    pub fn top_level(first: u32, max: u32, search: Option<&str>) -> Self {
        Self {
            first,
            max,
            search: search_term(search),
            parent: None,
        }
    }

    /// Creates a query for the children of a group.
    #[must_use]
    pub fn children(parent: impl Into<String>, first: u32, max: u32) -> Self {
        Self {
            first,
            max,
            search: None,
            parent: Some(parent.into()),
        }
    }

    /// Creates a name lookup over the first `max` matches.
    ///
    /// The server matches substrings, so callers filter the page for the
    /// group they want.
    #[must_use]
    pub fn by_name(name: &str, max: u32) -> Self {
        Self::top_level(0, max, Some(name))
    }
}

/// Parameters for `GET groups/count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountQuery {
    /// Name filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Count only top-level groups.
    pub top: bool,
}

impl CountQuery {
    /// Creates a top-level count with the same filter as a listing.
    #[must_use]
    pub fn top_level(search: Option<&str>) -> Self {
        Self {
            search: search_term(search),
            top: true,
        }
    }
}

/// Parameters for user, member and client listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    /// Offset of the first result.
    pub first: u32,
    /// Maximum number of results.
    pub max: u32,
    /// Free-text filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl PageQuery {
    /// Creates a page query.
    #[must_use]
    pub fn new(first: u32, max: u32, search: Option<&str>) -> Self {
        Self {
            first,
            max,
            search: search_term(search),
        }
    }
}

/// Parameters for `GET clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuery {
    /// Offset of the first result.
    pub first: u32,
    /// Maximum number of results.
    pub max: u32,
    /// Client id filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Match `client_id` as a substring rather than exactly.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub search: bool,
}

impl ClientQuery {
    /// Creates a client query; a filter is matched as a substring.
    #[must_use]
    pub fn new(first: u32, max: u32, filter: Option<&str>) -> Self {
        let client_id = search_term(filter);
        Self {
            first,
            max,
            search: client_id.is_some(),
            client_id,
        }
    }
}
