//! Default groups of the realm.
//!
//! New users join the default groups automatically. The view pairs a
//! group tree, for picking, with the current default list.

use std::sync::Arc;

use kc_admin_client::dto::GroupRepresentation;

use crate::backend::GroupBackend;
use crate::config::PagingConfig;
use crate::error::{ConsoleError, ConsoleResult, Guard};
use crate::notify::{reported, Notifier};
use crate::tree::TreeController;

/// Default-group management view.
pub struct DefaultGroupsView {
    tree: TreeController,
    backend: Arc<dyn GroupBackend>,
    notifier: Arc<dyn Notifier>,
    defaults: Vec<GroupRepresentation>,
}

impl DefaultGroupsView {
    /// Creates the view. Call [`load`](Self::load) to populate it.
    #[must_use]
    pub fn new(
        backend: Arc<dyn GroupBackend>,
        notifier: Arc<dyn Notifier>,
        paging: &PagingConfig,
    ) -> Self {
        Self {
            tree: TreeController::new(Arc::clone(&backend), Arc::clone(&notifier), paging),
            backend,
            notifier,
            defaults: Vec::new(),
        }
    }

    /// Group tree used to pick groups.
    #[must_use]
    pub const fn tree(&self) -> &TreeController {
        &self.tree
    }

    /// Group tree, for navigation and selection.
    pub fn tree_mut(&mut self) -> &mut TreeController {
        &mut self.tree
    }

    /// Current default groups.
    #[must_use]
    pub fn defaults(&self) -> &[GroupRepresentation] {
        &self.defaults
    }

    /// Loads the tree and the default list.
    pub async fn load(&mut self) -> ConsoleResult<()> {
        let tree = self.tree.reload().await;
        let defaults = self.refresh_defaults().await;
        tree.and(defaults)
    }

    /// Reloads the default list.
    pub async fn refresh_defaults(&mut self) -> ConsoleResult<()> {
        self.defaults = self
            .backend
            .list_default_groups()
            .await
            .map_err(|e| self.report(ConsoleError::fetch("default groups", e)))?;
        Ok(())
    }

    /// Makes the group selected in the tree a default group.
    pub async fn add_selected(&mut self) -> ConsoleResult<()> {
        let Some(selected) = self.tree.selected() else {
            return Err(self.report(Guard::NoGroupSelected.into()));
        };
        if selected.is_root() {
            return Err(self.report(Guard::RootNode("a default group").into()));
        }
        let id = selected.id.clone();

        self.backend
            .add_default_group(&id)
            .await
            .map_err(|e| self.report(ConsoleError::mutation("add default group", e)))?;
        tracing::info!(id = %id, "default group added");
        self.notifier.success("The group has been added to the default groups.");
        self.refresh_after_change().await;
        Ok(())
    }

    /// Removes a default group.
    pub async fn remove(&mut self, id: &str) -> ConsoleResult<()> {
        self.backend
            .remove_default_group(id)
            .await
            .map_err(|e| self.report(ConsoleError::mutation("remove default group", e)))?;
        tracing::info!(id, "default group removed");
        self.notifier.success("The group has been removed from the default groups.");
        self.refresh_after_change().await;
        Ok(())
    }

    async fn refresh_after_change(&mut self) {
        if let Err(e) = self.refresh_defaults().await {
            tracing::warn!("default group refresh failed: {}", e);
        }
    }

    fn report(&self, err: ConsoleError) -> ConsoleError {
        reported(self.notifier.as_ref(), err)
    }
}
