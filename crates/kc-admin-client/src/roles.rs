//! Group role-mapping resource methods.

use crate::client::segment;
use crate::dto::{ClientRepresentation, RoleRepresentation};
use crate::query::ClientQuery;
use crate::{ApiClient, ClientResult};

/// Which role container a mapping refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleScope<'a> {
    /// Realm-level roles.
    Realm,
    /// Roles of the client with this internal id.
    Client(&'a str),
}

/// Which view of a group's mappings to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingKind {
    /// Roles granted directly to the group.
    Assigned,
    /// Roles that could still be granted.
    Available,
    /// Effective roles, including those inherited through composites.
    Composite,
}

impl MappingKind {
    /// All kinds, in refresh order.
    pub const ALL: [Self; 3] = [Self::Assigned, Self::Available, Self::Composite];
}

fn mapping_path(group_id: &str, scope: RoleScope<'_>) -> String {
    match scope {
        RoleScope::Realm => format!("/groups/{}/role-mappings/realm", segment(group_id)),
        RoleScope::Client(client) => format!(
            "/groups/{}/role-mappings/clients/{}",
            segment(group_id),
            segment(client)
        ),
    }
}

fn view_path(group_id: &str, scope: RoleScope<'_>, kind: MappingKind) -> String {
    let base = mapping_path(group_id, scope);
    match kind {
        MappingKind::Assigned => base,
        MappingKind::Available => format!("{base}/available"),
        MappingKind::Composite => format!("{base}/composite"),
    }
}

impl ApiClient {
    /// Reads one view of a group's role mappings.
    pub async fn role_mappings(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        kind: MappingKind,
    ) -> ClientResult<Vec<RoleRepresentation>> {
        self.get(&view_path(group_id, scope, kind)).await
    }

    /// Grants a batch of roles to a group.
    pub async fn grant_roles(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> ClientResult<()> {
        tracing::info!(group_id, ?scope, count = roles.len(), "granting roles");
        self.post_no_response(&mapping_path(group_id, scope), roles)
            .await
    }

    /// Revokes a batch of roles from a group.
    pub async fn revoke_roles(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> ClientResult<()> {
        tracing::info!(group_id, ?scope, count = roles.len(), "revoking roles");
        self.delete_with_body(&mapping_path(group_id, scope), roles)
            .await
    }

    /// Lists clients, for picking the client whose roles are mapped.
    pub async fn list_clients(&self, query: &ClientQuery) -> ClientResult<Vec<ClientRepresentation>> {
        self.get_with_query("/clients", query).await
    }
}
