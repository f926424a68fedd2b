//! Role mappings of a group.
//!
//! The panel has a realm domain and a client domain. Each domain shows
//! the assigned, available and composite (effective) roles of the group;
//! the client domain is scoped to the selected client.

use std::sync::Arc;

use kc_admin_client::dto::{ClientRepresentation, RoleRepresentation};
use kc_admin_client::query::ClientQuery;
use kc_admin_client::{MappingKind, RoleScope};

use crate::backend::RoleMappingBackend;
use crate::error::{ConsoleError, ConsoleResult, Guard};
use crate::notify::{reported, Notifier};

/// Clients listed per picker search.
pub const CLIENT_PICKER_SIZE: u32 = 20;

/// Role container of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDomain {
    /// Realm roles.
    Realm,
    /// Roles of the selected client.
    Client,
}

/// The three role lists of one domain. `None` means not loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleLists {
    /// Roles granted to the group.
    pub assigned: Option<Vec<RoleRepresentation>>,
    /// Roles that can still be granted.
    pub available: Option<Vec<RoleRepresentation>>,
    /// Effective roles, including composites.
    pub composite: Option<Vec<RoleRepresentation>>,
}

impl RoleLists {
    /// Returns one list.
    #[must_use]
    pub fn get(&self, kind: MappingKind) -> Option<&[RoleRepresentation]> {
        match kind {
            MappingKind::Assigned => self.assigned.as_deref(),
            MappingKind::Available => self.available.as_deref(),
            MappingKind::Composite => self.composite.as_deref(),
        }
    }

    fn set(&mut self, kind: MappingKind, roles: Vec<RoleRepresentation>) {
        let slot = match kind {
            MappingKind::Assigned => &mut self.assigned,
            MappingKind::Available => &mut self.available,
            MappingKind::Composite => &mut self.composite,
        };
        *slot = Some(roles);
    }
}

/// Roles picked for the next grant or revoke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSelection {
    /// Available roles to grant.
    pub to_grant: Vec<RoleRepresentation>,
    /// Assigned roles to revoke.
    pub to_revoke: Vec<RoleRepresentation>,
}

impl RoleSelection {
    /// Checks if nothing is picked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_grant.is_empty() && self.to_revoke.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Change {
    Grant,
    Revoke,
}

impl Change {
    const fn action(self) -> &'static str {
        match self {
            Self::Grant => "grant roles",
            Self::Revoke => "revoke roles",
        }
    }

    const fn done(self) -> &'static str {
        match self {
            Self::Grant => "Role mapping updated.",
            Self::Revoke => "Role mapping removed.",
        }
    }
}

const fn list_name(kind: MappingKind) -> &'static str {
    match kind {
        MappingKind::Assigned => "assigned roles",
        MappingKind::Available => "available roles",
        MappingKind::Composite => "effective roles",
    }
}

/// Realm and client role mappings of one group.
pub struct RoleMappingPanel {
    backend: Arc<dyn RoleMappingBackend>,
    notifier: Arc<dyn Notifier>,
    group_id: String,
    realm: RoleLists,
    client: RoleLists,
    client_id: Option<String>,
    realm_selection: RoleSelection,
    client_selection: RoleSelection,
    clients: Vec<ClientRepresentation>,
}

impl RoleMappingPanel {
    /// Creates a panel for a group. Nothing is loaded yet.
    #[must_use]
    pub fn new(
        backend: Arc<dyn RoleMappingBackend>,
        notifier: Arc<dyn Notifier>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            notifier,
            group_id: group_id.into(),
            realm: RoleLists::default(),
            client: RoleLists::default(),
            client_id: None,
            realm_selection: RoleSelection::default(),
            client_selection: RoleSelection::default(),
            clients: Vec::new(),
        }
    }

    /// Group whose mappings are shown.
    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Role lists of a domain.
    #[must_use]
    pub const fn lists(&self, domain: RoleDomain) -> &RoleLists {
        match domain {
            RoleDomain::Realm => &self.realm,
            RoleDomain::Client => &self.client,
        }
    }

    /// Pending selection of a domain.
    #[must_use]
    pub const fn selection(&self, domain: RoleDomain) -> &RoleSelection {
        match domain {
            RoleDomain::Realm => &self.realm_selection,
            RoleDomain::Client => &self.client_selection,
        }
    }

    /// Pending selection of a domain, for editing.
    pub fn selection_mut(&mut self, domain: RoleDomain) -> &mut RoleSelection {
        match domain {
            RoleDomain::Realm => &mut self.realm_selection,
            RoleDomain::Client => &mut self.client_selection,
        }
    }

    /// Internal id of the selected client.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Clients found by the last picker search.
    #[must_use]
    pub fn clients(&self) -> &[ClientRepresentation] {
        &self.clients
    }

    /// Loads the realm lists, and the client lists if a client is selected.
    pub async fn load(&mut self) -> ConsoleResult<()> {
        let realm = self.refresh(RoleDomain::Realm, &MappingKind::ALL).await;
        let client = if self.client_id.is_some() {
            self.refresh(RoleDomain::Client, &MappingKind::ALL).await
        } else {
            Ok(())
        };
        realm.and(client)
    }

    /// Searches clients for the picker.
    pub async fn search_clients(&mut self, filter: Option<&str>) -> ConsoleResult<()> {
        let query = ClientQuery::new(0, CLIENT_PICKER_SIZE, filter);
        self.clients = self
            .backend
            .list_clients(&query)
            .await
            .map_err(|e| self.report(ConsoleError::fetch("clients", e)))?;
        Ok(())
    }

    /// Switches the client domain to another client, or clears it.
    ///
    /// All client lists and the client selection are reset before the
    /// new client's lists are loaded.
    pub async fn change_client(&mut self, client_id: Option<&str>) -> ConsoleResult<()> {
        self.client_id = client_id.filter(|id| !id.is_empty()).map(str::to_string);
        self.client = RoleLists::default();
        self.client_selection = RoleSelection::default();
        tracing::debug!(client_id = ?self.client_id, "role mapping client changed");

        if self.client_id.is_none() {
            return Ok(());
        }
        self.refresh(RoleDomain::Client, &MappingKind::ALL).await
    }

    /// Grants the roles picked in `to_grant` as one batch.
    pub async fn grant(&mut self, domain: RoleDomain) -> ConsoleResult<()> {
        self.apply(domain, Change::Grant).await
    }

    /// Revokes the roles picked in `to_revoke` as one batch.
    pub async fn revoke(&mut self, domain: RoleDomain) -> ConsoleResult<()> {
        self.apply(domain, Change::Revoke).await
    }

    async fn apply(&mut self, domain: RoleDomain, change: Change) -> ConsoleResult<()> {
        let scope = self.scope(domain)?;
        let selection = self.selection(domain);
        let roles = match change {
            Change::Grant => &selection.to_grant,
            Change::Revoke => &selection.to_revoke,
        };
        if roles.is_empty() {
            return Err(self.report(Guard::EmptySelection.into()));
        }

        let result = match change {
            Change::Grant => self.backend.grant_roles(&self.group_id, scope, roles).await,
            Change::Revoke => self.backend.revoke_roles(&self.group_id, scope, roles).await,
        };
        result.map_err(|e| self.report(ConsoleError::mutation(change.action(), e)))?;
        tracing::info!(group_id = %self.group_id, ?domain, count = roles.len(), "{}", change.action());

        let selection = self.selection_mut(domain);
        match change {
            Change::Grant => selection.to_grant.clear(),
            Change::Revoke => selection.to_revoke.clear(),
        }
        self.notifier.success(change.done());

        if let Err(e) = self.refresh_after_change(domain).await {
            tracing::warn!("role refresh after change failed: {}", e);
        }
        Ok(())
    }

    async fn refresh_after_change(&mut self, domain: RoleDomain) -> ConsoleResult<()> {
        match domain {
            RoleDomain::Realm => {
                let realm = self.refresh(RoleDomain::Realm, &MappingKind::ALL).await;
                let client = if self.client_id.is_some() {
                    self.refresh(RoleDomain::Client, &MappingKind::ALL).await
                } else {
                    Ok(())
                };
                realm.and(client)
            }
            RoleDomain::Client => {
                let client = self.refresh(RoleDomain::Client, &MappingKind::ALL).await;
                let realm = self
                    .refresh(
                        RoleDomain::Realm,
                        &[MappingKind::Available, MappingKind::Composite],
                    )
                    .await;
                client.and(realm)
            }
        }
    }

    /// Reloads some lists of a domain concurrently. Each list that loads
    /// is applied; failures are reported and the first is returned.
    async fn refresh(&mut self, domain: RoleDomain, kinds: &[MappingKind]) -> ConsoleResult<()> {
        let scope = self.scope(domain)?;
        let backend = &self.backend;
        let group_id = self.group_id.as_str();
        let results = futures::future::join_all(kinds.iter().map(|&kind| async move {
            (kind, backend.role_mappings(group_id, scope, kind).await)
        }))
        .await;

        let mut failure = None;
        for (kind, result) in results {
            match result {
                Ok(roles) => self.lists_mut(domain).set(kind, roles),
                Err(e) => {
                    let err = self.report(ConsoleError::fetch(list_name(kind), e));
                    failure.get_or_insert(err);
                }
            }
        }
        failure.map_or(Ok(()), Err)
    }

    fn scope(&self, domain: RoleDomain) -> ConsoleResult<RoleScope<'_>> {
        match domain {
            RoleDomain::Realm => Ok(RoleScope::Realm),
            RoleDomain::Client => self
                .client_id
                .as_deref()
                .map(RoleScope::Client)
                .ok_or_else(|| self.report(Guard::NoClientSelected.into())),
        }
    }

    fn lists_mut(&mut self, domain: RoleDomain) -> &mut RoleLists {
        match domain {
            RoleDomain::Realm => &mut self.realm,
            RoleDomain::Client => &mut self.client,
        }
    }

    fn report(&self, err: ConsoleError) -> ConsoleError {
        reported(self.notifier.as_ref(), err)
    }
}
