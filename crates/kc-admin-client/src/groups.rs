//! Group resource methods.

use crate::client::{id_from_location, segment};
use crate::dto::{GroupCount, GroupMove, GroupRepresentation, NewGroup, UserRepresentation};
use crate::query::{CountQuery, GroupQuery, PageQuery};
use crate::{ApiClient, ClientError, ClientResult};

/// Collection path a group is created in or moved to.
fn parent_path(parent_id: Option<&str>) -> String {
    match parent_id {
        Some(pid) => format!("/groups/{}/children", segment(pid)),
        None => "/groups".to_string(),
    }
}

impl ApiClient {
    /// Lists one window of groups.
    pub async fn list_groups(&self, query: &GroupQuery) -> ClientResult<Vec<GroupRepresentation>> {
        tracing::debug!(?query, "listing groups");
        self.get_with_query("/groups", query).await
    }

    /// Counts groups matching a filter.
    pub async fn count_groups(&self, query: &CountQuery) -> ClientResult<u64> {
        let count: GroupCount = self.get_with_query("/groups/count", query).await?;
        Ok(count.count)
    }

    /// Gets a group by id.
    pub async fn get_group(&self, id: &str) -> ClientResult<GroupRepresentation> {
        self.get(&format!("/groups/{}", segment(id))).await
    }

    /// Creates a group at the top level or under a parent, returning its id.
    pub async fn create_group(
        &self,
        parent_id: Option<&str>,
        group: &NewGroup,
    ) -> ClientResult<String> {
        let location = self
            .post_created(&parent_path(parent_id), group)
            .await?
            .ok_or_else(|| {
                ClientError::InvalidResponse("created group without Location header".to_string())
            })?;

        id_from_location(&location)
            .map(str::to_string)
            .ok_or_else(|| ClientError::InvalidResponse(format!("unusable Location: {location}")))
    }

    /// Moves an existing group to the top level or under a new parent.
    pub async fn move_group(&self, id: &str, new_parent_id: Option<&str>) -> ClientResult<()> {
        let body = GroupMove { id: id.to_string() };
        self.post_no_response(&parent_path(new_parent_id), &body)
            .await
    }

    /// Replaces a group's name and attributes.
    pub async fn update_group(&self, group: &GroupRepresentation) -> ClientResult<()> {
        self.put(&format!("/groups/{}", segment(&group.id)), group)
            .await
    }

    /// Deletes a group.
    pub async fn delete_group(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/groups/{}", segment(id))).await
    }

    /// Lists members of a group.
    pub async fn list_group_members(
        &self,
        group_id: &str,
        query: &PageQuery,
    ) -> ClientResult<Vec<UserRepresentation>> {
        self.get_with_query(&format!("/groups/{}/members", segment(group_id)), query)
            .await
    }

    /// Lists the realm's default groups.
    pub async fn list_default_groups(&self) -> ClientResult<Vec<GroupRepresentation>> {
        self.get("/default-groups").await
    }

    /// Adds a group to the realm's default groups.
    pub async fn add_default_group(&self, group_id: &str) -> ClientResult<()> {
        self.put_empty(&format!("/default-groups/{}", segment(group_id)))
            .await
    }

    /// Removes a group from the realm's default groups.
    pub async fn remove_default_group(&self, group_id: &str) -> ClientResult<()> {
        self.delete(&format!("/default-groups/{}", segment(group_id)))
            .await
    }
}
