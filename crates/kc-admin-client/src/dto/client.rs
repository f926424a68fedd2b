//! Client representations.

use serde::{Deserialize, Serialize};

/// Client summary used to scope client role mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
    /// Internal UUID used in role-mapping paths.
    pub id: String,
    /// Public client identifier.
    pub client_id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ClientRepresentation {
    /// Creates a client summary.
    #[must_use]
    pub fn new(id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            name: None,
        }
    }
}
