//! Role representations.

use serde::{Deserialize, Serialize};

/// Role as returned by the role-mapping endpoints.
///
/// Grant and revoke bodies are arrays of this type; the server resolves
/// roles by `id` and checks `name` against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRepresentation {
    /// Unique identifier.
    pub id: String,
    /// Role name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the role aggregates other roles.
    #[serde(default)]
    pub composite: bool,
    /// Whether the role belongs to a client.
    #[serde(default)]
    pub client_role: bool,
    /// Owning realm id or client id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

impl RoleRepresentation {
    /// Creates a role with identity fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}
