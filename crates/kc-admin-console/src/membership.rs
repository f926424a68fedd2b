//! Group membership view.
//!
//! Shows two independently paginated lists: candidate users and the
//! members of the selected group. Users are added to or removed from the
//! selected group one at a time.

use std::sync::Arc;

use kc_admin_client::dto::{GroupRepresentation, UserRepresentation};
use kc_admin_client::query::{search_term, GroupQuery, PageQuery};

use crate::backend::{GroupBackend, MembershipBackend};
use crate::config::PagingConfig;
use crate::error::{ConsoleError, ConsoleResult, Guard};
use crate::notify::{reported, Notifier};
use crate::page::PageCursor;

/// Page navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    /// Back to offset 0.
    First,
    /// One page back, stopping at 0.
    Previous,
    /// One page forward.
    Next,
}

/// One window of a searchable listing.
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    items: Vec<T>,
    cursor: PageCursor,
    search: Option<String>,
}

impl<T> PagedList<T> {
    fn new(max: u32) -> Self {
        Self {
            items: Vec::new(),
            cursor: PageCursor::new(max),
            search: None,
        }
    }

    /// Items of the current window.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Window position.
    #[must_use]
    pub const fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Active filter.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn query(&self) -> PageQuery {
        PageQuery::new(self.cursor.first(), self.cursor.max(), self.search.as_deref())
    }

    fn step(&mut self, step: PageMove) {
        match step {
            PageMove::First => self.cursor.first_page(),
            PageMove::Previous => self.cursor.previous_page(),
            PageMove::Next => self.cursor.next_page(),
        }
    }

    fn set_search(&mut self, term: &str) {
        self.search = search_term(Some(term));
        self.cursor.first_page();
    }
}

/// Group whose members are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    /// Group id.
    pub id: String,
    /// Group name.
    pub name: String,
}

impl GroupRef {
    /// Creates a group reference.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// User to group membership binder.
pub struct MembershipBinder {
    groups: Arc<dyn GroupBackend>,
    backend: Arc<dyn MembershipBackend>,
    notifier: Arc<dyn Notifier>,
    group: Option<GroupRef>,
    users: PagedList<UserRepresentation>,
    members: PagedList<UserRepresentation>,
    lookup_size: u32,
}

/// Finds the group at `path` in a search result, descending into the
/// nested matches the server returns for sub-groups.
fn find_by_path<'a>(
    groups: &'a [GroupRepresentation],
    parent: &str,
    path: &str,
) -> Option<&'a GroupRepresentation> {
    groups.iter().find_map(|g| {
        let own = g
            .path
            .clone()
            .unwrap_or_else(|| format!("{}/{}", parent, g.name));
        if own == path {
            Some(g)
        } else {
            find_by_path(&g.sub_groups, &own, path)
        }
    })
}

impl MembershipBinder {
    /// Creates a binder with no group selected.
    #[must_use]
    pub fn new(
        groups: Arc<dyn GroupBackend>,
        backend: Arc<dyn MembershipBackend>,
        notifier: Arc<dyn Notifier>,
        paging: &PagingConfig,
    ) -> Self {
        Self {
            groups,
            backend,
            notifier,
            group: None,
            users: PagedList::new(paging.user_page_size),
            members: PagedList::new(paging.member_page_size),
            lookup_size: paging.group_page_size,
        }
    }

    /// The selected group.
    #[must_use]
    pub const fn group(&self) -> Option<&GroupRef> {
        self.group.as_ref()
    }

    /// Candidate users.
    #[must_use]
    pub const fn users(&self) -> &PagedList<UserRepresentation> {
        &self.users
    }

    /// Members of the selected group.
    #[must_use]
    pub const fn members(&self) -> &PagedList<UserRepresentation> {
        &self.members
    }

    /// Selects a group and loads the first page of its members.
    pub async fn select_group(&mut self, group: GroupRef) -> ConsoleResult<()> {
        self.group = Some(group);
        self.members = PagedList::new(self.members.cursor.max());
        self.load_members().await
    }

    /// Deselects the group and drops its members.
    pub fn clear_group(&mut self) {
        self.group = None;
        self.members.items.clear();
    }

    /// Fetches the current window of candidate users.
    pub async fn load_users(&mut self) -> ConsoleResult<()> {
        let query = self.users.query();
        let users = self
            .backend
            .list_users(&query)
            .await
            .map_err(|e| self.report(ConsoleError::fetch("users", e)))?;
        tracing::debug!(count = users.len(), first = query.first, "loaded users");
        self.users.items = users;
        Ok(())
    }

    /// Filters candidate users, starting from the first page.
    pub async fn search_users(&mut self, term: &str) -> ConsoleResult<()> {
        self.users.set_search(term);
        self.load_users().await
    }

    /// Moves through the candidate users.
    pub async fn users_page(&mut self, step: PageMove) -> ConsoleResult<()> {
        self.users.step(step);
        self.load_users().await
    }

    /// Fetches the current window of members of the selected group.
    pub async fn load_members(&mut self) -> ConsoleResult<()> {
        let group_id = self.require_group()?.id.clone();
        let query = self.members.query();
        let members = self
            .backend
            .list_members(&group_id, &query)
            .await
            .map_err(|e| self.report(ConsoleError::fetch("group members", e)))?;
        tracing::debug!(group_id = %group_id, count = members.len(), "loaded group members");
        self.members.items = members;
        Ok(())
    }

    /// Filters members, starting from the first page.
    pub async fn search_members(&mut self, term: &str) -> ConsoleResult<()> {
        self.members.set_search(term);
        self.load_members().await
    }

    /// Moves through the members.
    pub async fn members_page(&mut self, step: PageMove) -> ConsoleResult<()> {
        self.members.step(step);
        self.load_members().await
    }

    /// Adds a candidate user to the selected group.
    ///
    /// A user is kept in one group at a time: if the user lists another
    /// group, that membership is removed first. The removal is best
    /// effort; failures are logged and the join proceeds.
    pub async fn join(&mut self, user_id: &str) -> ConsoleResult<()> {
        let group = self.require_group()?.clone();
        if self.members.items.iter().any(|m| m.id == user_id) {
            return Err(self.report(Guard::AlreadyMember.into()));
        }
        let Some(user) = self.users.items.iter().find(|u| u.id == user_id).cloned() else {
            return Err(self.report(Guard::UnknownUser(user_id.to_string()).into()));
        };

        if let Some(current) = user.groups.first() {
            self.leave_stale_group(&user.id, current, &group).await;
        }

        self.backend
            .join_group(&user.id, &group.id)
            .await
            .map_err(|e| self.report(ConsoleError::mutation("add group member", e)))?;
        tracing::info!(user_id, group_id = %group.id, "user joined group");
        self.notifier.success("The user has been added to the group.");
        self.members.items.push(user);
        Ok(())
    }

    /// Removes a member from the selected group.
    pub async fn leave(&mut self, user_id: &str) -> ConsoleResult<()> {
        let group_id = self.require_group()?.id.clone();
        let Some(position) = self.members.items.iter().position(|m| m.id == user_id) else {
            return Err(self.report(Guard::NoMemberSelected.into()));
        };

        self.backend
            .leave_group(user_id, &group_id)
            .await
            .map_err(|e| self.report(ConsoleError::mutation("remove group member", e)))?;
        tracing::info!(user_id, group_id = %group_id, "user left group");
        self.notifier.success("The user has been removed from the group.");
        self.members.items.remove(position);
        Ok(())
    }

    async fn leave_stale_group(&self, user_id: &str, current: &str, target: &GroupRef) {
        let path = if current.starts_with('/') {
            current.to_string()
        } else {
            format!("/{current}")
        };
        let name = path.rsplit('/').next().unwrap_or_default();
        if name.is_empty() {
            return;
        }

        let query = GroupQuery::by_name(name, self.lookup_size);
        let stale = match self.groups.list_groups(&query).await {
            Ok(found) => find_by_path(&found, "", &path).map(|g| g.id.clone()),
            Err(e) => {
                tracing::warn!(user_id, path = %path, "failed to look up previous group: {}", e);
                return;
            }
        };
        let Some(stale_id) = stale else {
            tracing::debug!(user_id, path = %path, "previous group not found");
            return;
        };
        if stale_id == target.id {
            return;
        }
        match self.backend.leave_group(user_id, &stale_id).await {
            Ok(()) => tracing::info!(user_id, group_id = %stale_id, "removed previous membership"),
            Err(e) => tracing::warn!(user_id, group_id = %stale_id, "failed to remove previous membership: {}", e),
        }
    }

    fn require_group(&self) -> ConsoleResult<&GroupRef> {
        self.group
            .as_ref()
            .ok_or_else(|| self.report(Guard::NoGroupSelected.into()))
    }

    fn report(&self, err: ConsoleError) -> ConsoleError {
        reported(self.notifier.as_ref(), err)
    }
}
