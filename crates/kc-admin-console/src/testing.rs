//! In-memory backend for controller tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use kc_admin_client::dto::{
    ClientRepresentation, GroupRepresentation, NewGroup, RoleRepresentation, UserRepresentation,
};
use kc_admin_client::query::{ClientQuery, CountQuery, GroupQuery, PageQuery};
use kc_admin_client::{ClientError, ClientResult, MappingKind, RoleScope};
use parking_lot::Mutex;

use crate::backend::{GroupBackend, MembershipBackend, RoleMappingBackend};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListGroups(GroupQuery),
    CountGroups(CountQuery),
    GetGroup(String),
    CreateGroup {
        parent: Option<String>,
        name: String,
    },
    MoveGroup {
        id: String,
        parent: Option<String>,
    },
    UpdateGroup(GroupRepresentation),
    DeleteGroup(String),
    ListDefaultGroups,
    AddDefaultGroup(String),
    RemoveDefaultGroup(String),
    ListUsers(PageQuery),
    ListMembers(String, PageQuery),
    JoinGroup {
        user: String,
        group: String,
    },
    LeaveGroup {
        user: String,
        group: String,
    },
    RoleMappings {
        group: String,
        client: Option<String>,
        kind: MappingKind,
    },
    GrantRoles {
        group: String,
        client: Option<String>,
        roles: Vec<String>,
    },
    RevokeRoles {
        group: String,
        client: Option<String>,
        roles: Vec<String>,
    },
    ListClients(ClientQuery),
}

impl Call {
    /// Checks if the call changes remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateGroup { .. }
                | Self::MoveGroup { .. }
                | Self::UpdateGroup(_)
                | Self::DeleteGroup(_)
                | Self::AddDefaultGroup(_)
                | Self::RemoveDefaultGroup(_)
                | Self::JoinGroup { .. }
                | Self::LeaveGroup { .. }
                | Self::GrantRoles { .. }
                | Self::RevokeRoles { .. }
        )
    }
}

#[derive(Default)]
struct State {
    top: Vec<GroupRepresentation>,
    children: HashMap<String, Vec<GroupRepresentation>>,
    defaults: Vec<String>,
    users: Vec<UserRepresentation>,
    members: HashMap<String, Vec<UserRepresentation>>,
    mappings: HashMap<(Option<String>, MappingKind), Vec<RoleRepresentation>>,
    clients: Vec<ClientRepresentation>,
    failing: HashSet<&'static str>,
    calls: Vec<Call>,
    next_id: u32,
}

/// Backend keeping groups, users and role mappings in memory.
///
/// Groups created with names get the id `<name>-id`. A search matches
/// group names at any depth and returns the matching top-level groups
/// with their matching descendants nested under them.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<State>,
}

pub fn group(name: &str) -> GroupRepresentation {
    let mut group = GroupRepresentation::new(format!("{name}-id"), name);
    group.path = Some(format!("/{name}"));
    group
}

pub fn user(name: &str) -> UserRepresentation {
    UserRepresentation::new(format!("{name}-id"), name)
}

pub fn role(name: &str) -> RoleRepresentation {
    RoleRepresentation::new(format!("{name}-id"), name)
}

fn scope_key(scope: RoleScope<'_>) -> Option<String> {
    match scope {
        RoleScope::Realm => None,
        RoleScope::Client(id) => Some(id.to_string()),
    }
}

fn names(roles: &[RoleRepresentation]) -> Vec<String> {
    roles.iter().map(|r| r.name.clone()).collect()
}

fn server_error() -> ClientError {
    ClientError::Api {
        status: 500,
        message: "injected failure".to_string(),
    }
}

fn window<T: Clone>(items: &[T], first: u32, max: u32) -> Vec<T> {
    items
        .iter()
        .skip(first as usize)
        .take(max as usize)
        .cloned()
        .collect()
}

fn matches_search(name: &str, search: Option<&str>) -> bool {
    search.map_or(true, |s| name.to_lowercase().contains(&s.to_lowercase()))
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_top_level(names: &[&str]) -> Arc<Self> {
        let backend = Self::new();
        backend.state.lock().top = names.iter().map(|n| group(n)).collect();
        backend
    }

    /// Replaces the children of a group and sets its hint.
    pub fn set_children(&self, parent_id: &str, names: &[&str]) {
        let mut state = self.state.lock();
        let has_child = !names.is_empty();
        Self::with_group(&mut state, parent_id, |g| g.has_child = has_child);
        let parent_path = Self::path_of(&state, Some(parent_id));
        let children = names
            .iter()
            .map(|n| {
                let mut child = group(n);
                child.path = Some(format!("{parent_path}/{n}"));
                child
            })
            .collect();
        state.children.insert(parent_id.to_string(), children);
    }

    /// Sets the hint without adding children.
    pub fn set_hint(&self, id: &str) {
        let mut state = self.state.lock();
        Self::with_group(&mut state, id, |g| g.has_child = true);
    }

    pub fn set_users(&self, users: Vec<UserRepresentation>) {
        self.state.lock().users = users;
    }

    pub fn set_members(&self, group_id: &str, members: Vec<UserRepresentation>) {
        self.state.lock().members.insert(group_id.to_string(), members);
    }

    pub fn set_mappings(&self, client: Option<&str>, kind: MappingKind, roles: Vec<RoleRepresentation>) {
        self.state
            .lock()
            .mappings
            .insert((client.map(str::to_string), kind), roles);
    }

    pub fn set_clients(&self, clients: Vec<ClientRepresentation>) {
        self.state.lock().clients = clients;
    }

    pub fn set_defaults(&self, ids: &[&str]) {
        self.state.lock().defaults = ids.iter().map(|s| (*s).to_string()).collect();
    }

    /// Makes every call to the named operation fail.
    pub fn fail(&self, operation: &'static str) {
        self.state.lock().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().failing.remove(operation);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn members_of(&self, group_id: &str) -> Vec<String> {
        self.state
            .lock()
            .members
            .get(group_id)
            .map(|m| m.iter().map(|u| u.id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn top_level_names(&self) -> Vec<String> {
        self.state.lock().top.iter().map(|g| g.name.clone()).collect()
    }

    fn record(&self, call: Call, operation: &'static str) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.calls.push(call);
        if state.failing.contains(operation) {
            return Err(server_error());
        }
        Ok(())
    }

    fn with_group(state: &mut State, id: &str, f: impl FnOnce(&mut GroupRepresentation)) -> bool {
        if let Some(g) = state.top.iter_mut().find(|g| g.id == id) {
            f(g);
            return true;
        }
        for list in state.children.values_mut() {
            if let Some(g) = list.iter_mut().find(|g| g.id == id) {
                f(g);
                return true;
            }
        }
        false
    }

    fn path_of(state: &State, id: Option<&str>) -> String {
        id.and_then(|id| Self::find_group(state, id))
            .and_then(|g| g.path)
            .unwrap_or_default()
    }

    /// Returns `group` with its matching descendants if it or any of them
    /// matches the search.
    fn search_tree(
        state: &State,
        group: &GroupRepresentation,
        search: &str,
    ) -> Option<GroupRepresentation> {
        let nested: Vec<GroupRepresentation> = state
            .children
            .get(&group.id)
            .into_iter()
            .flatten()
            .filter_map(|child| Self::search_tree(state, child, search))
            .collect();
        if nested.is_empty() && !matches_search(&group.name, Some(search)) {
            return None;
        }
        let mut found = group.clone();
        found.sub_groups = nested;
        Some(found)
    }

    fn search_top_level(state: &State, search: Option<&str>) -> Vec<GroupRepresentation> {
        match search {
            None => state.top.clone(),
            Some(search) => state
                .top
                .iter()
                .filter_map(|g| Self::search_tree(state, g, search))
                .collect(),
        }
    }

    fn find_group(state: &State, id: &str) -> Option<GroupRepresentation> {
        state
            .top
            .iter()
            .chain(state.children.values().flatten())
            .find(|g| g.id == id)
            .cloned()
    }

    fn detach(state: &mut State, id: &str) -> Option<GroupRepresentation> {
        if let Some(pos) = state.top.iter().position(|g| g.id == id) {
            return Some(state.top.remove(pos));
        }
        let mut emptied = None;
        let mut found = None;
        for (parent, list) in &mut state.children {
            if let Some(pos) = list.iter().position(|g| g.id == id) {
                found = Some(list.remove(pos));
                if list.is_empty() {
                    emptied = Some(parent.clone());
                }
                break;
            }
        }
        if let Some(parent) = emptied {
            Self::with_group(state, &parent, |g| g.has_child = false);
        }
        found
    }

    fn attach(state: &mut State, parent: Option<&str>, mut group: GroupRepresentation) {
        group.path = Some(format!("{}/{}", Self::path_of(state, parent), group.name));
        match parent {
            None => state.top.push(group),
            Some(parent) => {
                Self::with_group(state, parent, |g| g.has_child = true);
                state
                    .children
                    .entry(parent.to_string())
                    .or_default()
                    .push(group);
            }
        }
    }
}

#[async_trait]
impl GroupBackend for MockBackend {
    async fn list_groups(&self, query: &GroupQuery) -> ClientResult<Vec<GroupRepresentation>> {
        self.record(Call::ListGroups(query.clone()), "list_groups")?;
        let state = self.state.lock();
        let source: Vec<GroupRepresentation> = match &query.parent {
            Some(parent) => state.children.get(parent).cloned().unwrap_or_default(),
            None => Self::search_top_level(&state, query.search.as_deref()),
        };
        Ok(window(&source, query.first, query.max))
    }

    async fn count_groups(&self, query: &CountQuery) -> ClientResult<u64> {
        self.record(Call::CountGroups(query.clone()), "count_groups")?;
        let state = self.state.lock();
        let count = Self::search_top_level(&state, query.search.as_deref()).len();
        Ok(count as u64)
    }

    async fn get_group(&self, id: &str) -> ClientResult<GroupRepresentation> {
        self.record(Call::GetGroup(id.to_string()), "get_group")?;
        Self::find_group(&self.state.lock(), id).ok_or_else(|| ClientError::Api {
            status: 404,
            message: "Could not find group by id".to_string(),
        })
    }

    async fn create_group(&self, parent_id: Option<&str>, group: &NewGroup) -> ClientResult<String> {
        self.record(
            Call::CreateGroup {
                parent: parent_id.map(str::to_string),
                name: group.name.clone(),
            },
            "create_group",
        )?;
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = format!("new-{}", state.next_id);
        let mut created = GroupRepresentation::new(id.clone(), group.name.clone());
        created.attributes = group.attributes.clone();
        Self::attach(&mut state, parent_id, created);
        Ok(id)
    }

    async fn move_group(&self, id: &str, new_parent_id: Option<&str>) -> ClientResult<()> {
        self.record(
            Call::MoveGroup {
                id: id.to_string(),
                parent: new_parent_id.map(str::to_string),
            },
            "move_group",
        )?;
        let mut state = self.state.lock();
        if let Some(group) = Self::detach(&mut state, id) {
            Self::attach(&mut state, new_parent_id, group);
        }
        Ok(())
    }

    async fn update_group(&self, group: &GroupRepresentation) -> ClientResult<()> {
        self.record(Call::UpdateGroup(group.clone()), "update_group")?;
        let mut state = self.state.lock();
        let (name, attributes) = (group.name.clone(), group.attributes.clone());
        Self::with_group(&mut state, &group.id, |g| {
            g.name = name;
            g.attributes = attributes;
        });
        Ok(())
    }

    async fn delete_group(&self, id: &str) -> ClientResult<()> {
        self.record(Call::DeleteGroup(id.to_string()), "delete_group")?;
        Self::detach(&mut self.state.lock(), id);
        Ok(())
    }

    async fn list_default_groups(&self) -> ClientResult<Vec<GroupRepresentation>> {
        self.record(Call::ListDefaultGroups, "list_default_groups")?;
        let state = self.state.lock();
        Ok(state
            .defaults
            .iter()
            .filter_map(|id| Self::find_group(&state, id))
            .collect())
    }

    async fn add_default_group(&self, id: &str) -> ClientResult<()> {
        self.record(Call::AddDefaultGroup(id.to_string()), "add_default_group")?;
        let mut state = self.state.lock();
        if !state.defaults.iter().any(|d| d == id) {
            state.defaults.push(id.to_string());
        }
        Ok(())
    }

    async fn remove_default_group(&self, id: &str) -> ClientResult<()> {
        self.record(Call::RemoveDefaultGroup(id.to_string()), "remove_default_group")?;
        self.state.lock().defaults.retain(|d| d != id);
        Ok(())
    }
}

#[async_trait]
impl MembershipBackend for MockBackend {
    async fn list_users(&self, query: &PageQuery) -> ClientResult<Vec<UserRepresentation>> {
        self.record(Call::ListUsers(query.clone()), "list_users")?;
        let state = self.state.lock();
        let matching: Vec<_> = state
            .users
            .iter()
            .filter(|u| matches_search(&u.username, query.search.as_deref()))
            .cloned()
            .collect();
        Ok(window(&matching, query.first, query.max))
    }

    async fn list_members(
        &self,
        group_id: &str,
        query: &PageQuery,
    ) -> ClientResult<Vec<UserRepresentation>> {
        self.record(
            Call::ListMembers(group_id.to_string(), query.clone()),
            "list_members",
        )?;
        let state = self.state.lock();
        let matching: Vec<_> = state
            .members
            .get(group_id)
            .into_iter()
            .flatten()
            .filter(|u| matches_search(&u.username, query.search.as_deref()))
            .cloned()
            .collect();
        Ok(window(&matching, query.first, query.max))
    }

    async fn join_group(&self, user_id: &str, group_id: &str) -> ClientResult<()> {
        self.record(
            Call::JoinGroup {
                user: user_id.to_string(),
                group: group_id.to_string(),
            },
            "join_group",
        )?;
        let mut state = self.state.lock();
        let user = state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .unwrap_or_else(|| UserRepresentation::new(user_id, user_id));
        let members = state.members.entry(group_id.to_string()).or_default();
        if !members.iter().any(|m| m.id == user_id) {
            members.push(user);
        }
        Ok(())
    }

    async fn leave_group(&self, user_id: &str, group_id: &str) -> ClientResult<()> {
        self.record(
            Call::LeaveGroup {
                user: user_id.to_string(),
                group: group_id.to_string(),
            },
            "leave_group",
        )?;
        if let Some(members) = self.state.lock().members.get_mut(group_id) {
            members.retain(|m| m.id != user_id);
        }
        Ok(())
    }
}

#[async_trait]
impl RoleMappingBackend for MockBackend {
    async fn role_mappings(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        kind: MappingKind,
    ) -> ClientResult<Vec<RoleRepresentation>> {
        let client = scope_key(scope);
        self.record(
            Call::RoleMappings {
                group: group_id.to_string(),
                client: client.clone(),
                kind,
            },
            "role_mappings",
        )?;
        Ok(self
            .state
            .lock()
            .mappings
            .get(&(client, kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn grant_roles(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> ClientResult<()> {
        let client = scope_key(scope);
        self.record(
            Call::GrantRoles {
                group: group_id.to_string(),
                client: client.clone(),
                roles: names(roles),
            },
            "grant_roles",
        )?;
        let mut state = self.state.lock();
        let mut moved: BTreeMap<String, RoleRepresentation> = BTreeMap::new();
        for role in roles {
            moved.insert(role.id.clone(), role.clone());
        }
        if let Some(available) = state.mappings.get_mut(&(client.clone(), MappingKind::Available)) {
            available.retain(|r| !moved.contains_key(&r.id));
        }
        for kind in [MappingKind::Assigned, MappingKind::Composite] {
            state
                .mappings
                .entry((client.clone(), kind))
                .or_default()
                .extend(moved.values().cloned());
        }
        Ok(())
    }

    async fn revoke_roles(
        &self,
        group_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> ClientResult<()> {
        let client = scope_key(scope);
        self.record(
            Call::RevokeRoles {
                group: group_id.to_string(),
                client: client.clone(),
                roles: names(roles),
            },
            "revoke_roles",
        )?;
        let mut state = self.state.lock();
        let ids: HashSet<&str> = roles.iter().map(|r| r.id.as_str()).collect();
        for kind in [MappingKind::Assigned, MappingKind::Composite] {
            if let Some(list) = state.mappings.get_mut(&(client.clone(), kind)) {
                list.retain(|r| !ids.contains(r.id.as_str()));
            }
        }
        state
            .mappings
            .entry((client, MappingKind::Available))
            .or_default()
            .extend(roles.iter().cloned());
        Ok(())
    }

    async fn list_clients(&self, query: &ClientQuery) -> ClientResult<Vec<ClientRepresentation>> {
        self.record(Call::ListClients(query.clone()), "list_clients")?;
        let state = self.state.lock();
        let matching: Vec<_> = state
            .clients
            .iter()
            .filter(|c| matches_search(&c.client_id, query.client_id.as_deref()))
            .cloned()
            .collect();
        Ok(window(&matching, query.first, query.max))
    }
}

/// Confirmation that always answers the same way and counts prompts.
pub struct FixedConfirm {
    answer: bool,
    asked: Mutex<u32>,
}

impl FixedConfirm {
    pub fn yes() -> Self {
        Self {
            answer: true,
            asked: Mutex::new(0),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            asked: Mutex::new(0),
        }
    }

    pub fn asked(&self) -> u32 {
        *self.asked.lock()
    }
}

impl crate::notify::Confirm for FixedConfirm {
    fn confirm(&self, _title: &str, _message: &str) -> bool {
        *self.asked.lock() += 1;
        self.answer
    }
}
