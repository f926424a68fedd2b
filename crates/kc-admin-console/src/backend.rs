//! Remote operations the controllers depend on.
//!
//! Controllers hold these traits rather than [`ApiClient`] so that views
//! can be driven by any transport. [`ApiClient`] implements all of them.

use async_trait::async_trait;
use kc_admin_client::dto::{
    ClientRepresentation, GroupRepresentation, NewGroup, RoleRepresentation, UserRepresentation,
};
use kc_admin_client::query::{ClientQuery, CountQuery, GroupQuery, PageQuery};
use kc_admin_client::{ApiClient, ClientResult, MappingKind, RoleScope};

/// Group collection and default-group operations.
#[async_trait]
pub trait GroupBackend: Send + Sync {
    /// Lists one window of groups.
    async fn list_groups(&self, query: &GroupQuery) -> ClientResult<Vec<GroupRepresentation>>;

    /// Counts groups matching a filter.
    async fn count_groups(&self, query: &CountQuery) -> ClientResult<u64>;

    /// Gets a group by id.
    async fn get_group(&self, id: &str) -> ClientResult<GroupRepresentation>;

    /// Creates a group, returning its id.
    async fn create_group(&self, parent_id: Option<&str>, group: &NewGroup) -> ClientResult<String>;

    /// Re-parents a group; `None` moves it to the top level.
    async fn move_group(&self, id: &str, new_parent_id: Option<&str>) -> ClientResult<()>;

    /// Replaces a group's name and attributes.
    async fn update_group(&self, group: &GroupRepresentation) -> ClientResult<()>;

    /// Deletes a group.
    async fn delete_group(&self, id: &str) -> ClientResult<()>;

    /// Lists the realm's default groups.
    async fn list_default_groups(&self) -> ClientResult<Vec<GroupRepresentation>>;

    /// Adds a default group.
    async fn add_default_group(&self, id: &str) -> ClientResult<()>;

    /// Removes a default group.
    async fn remove_default_group(&self, id: &str) -> ClientResult<()>;
}

/// User listing and group membership operations.
#[async_trait]
pub trait MembershipBackend: Send + Sync {
    /// Lists one window of users.
    async fn list_users(&self, query: &PageQuery) -> ClientResult<Vec<UserRepresentation>>;

    /// Lists one window of a group's members.
    async fn list_members(
        &self,
        group_id: &str,
        query: &PageQuery,
    ) -> ClientResult<Vec<UserRepresentation>>;

    /// Adds a user to a group.
    async fn join_group(&self, user_id: &str, group_id: &str) -> ClientResult<()>;

    /// Removes a user from a group.
    async fn leave_group(&self, user_id: &str, group_id: &str) -> ClientResult<()>;
}

/// Group role-mapping operations.
#[async_trait]
pub trait RoleMappingBackend: Send + Sync {
    /// Reads one view of a group's role mappings.
    async fn role_mappings(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        kind: MappingKind,
    ) -> ClientResult<Vec<RoleRepresentation>>;

    /// Grants a batch of roles.
    async fn grant_roles(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> ClientResult<()>;

    /// Revokes a batch of roles.
    async fn revoke_roles(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> ClientResult<()>;

    /// Lists clients whose roles can be mapped.
    async fn list_clients(&self, query: &ClientQuery) -> ClientResult<Vec<ClientRepresentation>>;
}

#[async_trait]
impl GroupBackend for ApiClient {
    async fn list_groups(&self, query: &GroupQuery) -> ClientResult<Vec<GroupRepresentation>> {
        ApiClient::list_groups(self, query).await
    }

    async fn count_groups(&self, query: &CountQuery) -> ClientResult<u64> {
        ApiClient::count_groups(self, query).await
    }

    async fn get_group(&self, id: &str) -> ClientResult<GroupRepresentation> {
        ApiClient::get_group(self, id).await
    }

    async fn create_group(&self, parent_id: Option<&str>, group: &NewGroup) -> ClientResult<String> {
        ApiClient::create_group(self, parent_id, group).await
    }

    async fn move_group(&self, id: &str, new_parent_id: Option<&str>) -> ClientResult<()> {
        ApiClient::move_group(self, id, new_parent_id).await
    }

    async fn update_group(&self, group: &GroupRepresentation) -> ClientResult<()> {
        ApiClient::update_group(self, group).await
    }

    async fn delete_group(&self, id: &str) -> ClientResult<()> {
        ApiClient::delete_group(self, id).await
    }

    async fn list_default_groups(&self) -> ClientResult<Vec<GroupRepresentation>> {
        ApiClient::list_default_groups(self).await
    }

    async fn add_default_group(&self, id: &str) -> ClientResult<()> {
        ApiClient::add_default_group(self, id).await
    }

    async fn remove_default_group(&self, id: &str) -> ClientResult<()> {
        ApiClient::remove_default_group(self, id).await
    }
}

#[async_trait]
impl MembershipBackend for ApiClient {
    async fn list_users(&self, query: &PageQuery) -> ClientResult<Vec<UserRepresentation>> {
        ApiClient::list_users(self, query).await
    }

    async fn list_members(
        &self,
        group_id: &str,
        query: &PageQuery,
    ) -> ClientResult<Vec<UserRepresentation>> {
        self.list_group_members(group_id, query).await
    }

    async fn join_group(&self, user_id: &str, group_id: &str) -> ClientResult<()> {
        ApiClient::join_group(self, user_id, group_id).await
    }

    async fn leave_group(&self, user_id: &str, group_id: &str) -> ClientResult<()> {
        ApiClient::leave_group(self, user_id, group_id).await
    }
}

#[async_trait]
impl RoleMappingBackend for ApiClient {
    async fn role_mappings(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        kind: MappingKind,
    ) -> ClientResult<Vec<RoleRepresentation>> {
        ApiClient::role_mappings(self, group_id, scope, kind).await
    }

    async fn grant_roles(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> ClientResult<()> {
        ApiClient::grant_roles(self, group_id, scope, roles).await
    }

    async fn revoke_roles(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> ClientResult<()> {
        ApiClient::revoke_roles(self, group_id, scope, roles).await
    }

    async fn list_clients(&self, query: &ClientQuery) -> ClientResult<Vec<ClientRepresentation>> {
        ApiClient::list_clients(self, query).await
    }
}
