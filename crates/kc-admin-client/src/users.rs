//! User resource methods.

use crate::client::segment;
use crate::dto::UserRepresentation;
use crate::query::PageQuery;
use crate::{ApiClient, ClientResult};

fn membership_path(user_id: &str, group_id: &str) -> String {
    format!("/users/{}/groups/{}", segment(user_id), segment(group_id))
}

impl ApiClient {
    /// Lists one window of users.
    pub async fn list_users(&self, query: &PageQuery) -> ClientResult<Vec<UserRepresentation>> {
        self.get_with_query("/users", query).await
    }

    /// Adds a user to a group.
    pub async fn join_group(&self, user_id: &str, group_id: &str) -> ClientResult<()> {
        tracing::info!(user_id, group_id, "adding group membership");
        self.put_empty(&membership_path(user_id, group_id)).await
    }

    /// Removes a user from a group.
    pub async fn leave_group(&self, user_id: &str, group_id: &str) -> ClientResult<()> {
        tracing::info!(user_id, group_id, "removing group membership");
        self.delete(&membership_path(user_id, group_id)).await
    }
}
