//! Group representations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Group as returned by the listing and detail endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRepresentation {
    /// Unique identifier.
    pub id: String,
    /// Group name.
    pub name: String,
    /// Group path (e.g., "/parent/child").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether the group has children that were not included.
    #[serde(default)]
    pub has_child: bool,
    /// Custom group attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Vec<String>>,
    /// Realm roles assigned to this group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub realm_roles: Vec<String>,
    /// Client roles assigned to this group (client id -> role names).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub client_roles: BTreeMap<String, Vec<String>>,
    /// Child groups included inline by the server.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_groups: Vec<GroupRepresentation>,
}

impl GroupRepresentation {
    /// Creates a representation with only identity fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks the group as having children.
    #[must_use]
    pub const fn with_children_hint(mut self) -> Self {
        self.has_child = true;
        self
    }
}

/// Body for creating a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    /// Group name (unique within the same level).
    pub name: String,
    /// Custom group attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl NewGroup {
    /// Creates a body with a name only.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }
}

/// Body for re-parenting an existing group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMove {
    /// Id of the group being moved.
    pub id: String,
}

/// Response of `GET groups/count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    /// Number of matching groups.
    #[serde(default)]
    pub count: u64,
}
