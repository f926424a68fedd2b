//! The group tree view.
//!
//! [`TreeController`] owns the visible forest under a synthetic root. The
//! top level is paginated and searchable; sub-groups are fetched when a
//! node is first expanded. Every mutation is followed by a full reload so
//! that the tree always shows one coherent server snapshot.
//!
//! Child expansion is split in two steps so a UI loop can await the fetch
//! without holding the controller:
//!
//! ```ignore
//! if let ToggleStep::Fetch(request) = tree.begin_toggle(&id)? {
//!     let response = request.load(&fetcher).await;
//!     tree.complete_expand(response)?;
//! }
//! ```
//!
//! Responses issued before the latest reload are discarded.

use std::collections::HashSet;
use std::sync::Arc;

use kc_admin_client::dto::{GroupRepresentation, NewGroup};
use kc_admin_client::query::search_term;
use kc_admin_client::ClientResult;

use crate::backend::GroupBackend;
use crate::config::PagingConfig;
use crate::editor;
use crate::error::{ConsoleError, ConsoleResult, Guard};
use crate::fetcher::PaginatedFetcher;
use crate::node::{default_name_order, sort_by_name, GroupNode, NameOrder, Parent};
use crate::notify::{reported, Confirm, Notifier};
use crate::page::Pagination;

/// Label of the synthetic root.
pub const DEFAULT_ROOT_LABEL: &str = "Groups";

/// Loading state of a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Children were never requested.
    Unexpanded,
    /// A child fetch is outstanding.
    Loading,
    /// Children were fetched (possibly none).
    Expanded,
}

/// First half of a toggle.
#[derive(Debug)]
pub enum ToggleStep {
    /// Only the collapsed flag changed.
    Toggled,
    /// A child fetch for this node is already outstanding.
    Pending,
    /// Children must be fetched.
    Fetch(ExpandRequest),
}

/// Ticket for one child fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandRequest {
    node_id: String,
    generation: u64,
    max: u32,
}

impl ExpandRequest {
    /// Node whose children are requested.
    #[must_use]
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Performs the fetch.
    pub async fn load(self, fetcher: &PaginatedFetcher) -> ExpandResponse {
        let result = fetcher.fetch_children(&self.node_id, self.max).await;
        ExpandResponse {
            request: self,
            result,
        }
    }
}

/// Result of an [`ExpandRequest`], applied with
/// [`TreeController::complete_expand`].
#[derive(Debug)]
pub struct ExpandResponse {
    request: ExpandRequest,
    result: ClientResult<Vec<GroupRepresentation>>,
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// The collapsed flag was flipped.
    Toggled,
    /// A fetch for this node was already outstanding.
    Pending,
    /// This many children were attached.
    Attached(usize),
    /// The node has no children; it stays unloaded.
    Empty,
    /// The response predates a reload and was dropped.
    Discarded,
}

/// Paginated, searchable group tree with lazy child loading.
pub struct TreeController {
    backend: Arc<dyn GroupBackend>,
    notifier: Arc<dyn Notifier>,
    fetcher: PaginatedFetcher,
    root: GroupNode,
    pagination: Pagination,
    search: Option<String>,
    selected: Option<String>,
    name_order: NameOrder,
    generation: u64,
    in_flight: HashSet<String>,
    probed: HashSet<String>,
}

impl std::fmt::Debug for TreeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeController")
            .field("root", &self.root)
            .field("pagination", &self.pagination)
            .field("search", &self.search)
            .field("selected", &self.selected)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl TreeController {
    /// Creates an empty tree. Call [`reload`](Self::reload) to populate it.
    #[must_use]
    pub fn new(
        backend: Arc<dyn GroupBackend>,
        notifier: Arc<dyn Notifier>,
        paging: &PagingConfig,
    ) -> Self {
        Self {
            fetcher: PaginatedFetcher::new(Arc::clone(&backend)),
            backend,
            notifier,
            root: GroupNode::root(DEFAULT_ROOT_LABEL),
            pagination: Pagination::new(paging.group_page_size),
            search: None,
            selected: None,
            name_order: default_name_order,
            generation: 0,
            in_flight: HashSet::new(),
            probed: HashSet::new(),
        }
    }

    /// Replaces the comparator used to order top-level groups.
    #[must_use]
    pub fn with_name_order(mut self, order: NameOrder) -> Self {
        self.name_order = order;
        self
    }

    /// Replaces the root label.
    #[must_use]
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root.name = label.into();
        self
    }

    /// The synthetic root; its children are the current page.
    #[must_use]
    pub const fn root(&self) -> &GroupNode {
        &self.root
    }

    /// Finds a visible node.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&GroupNode> {
        self.root.find(id)
    }

    /// Page state of the top level.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Active search term.
    #[must_use]
    pub fn search_criteria(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Fetcher for completing [`ExpandRequest`]s.
    #[must_use]
    pub const fn fetcher(&self) -> &PaginatedFetcher {
        &self.fetcher
    }

    /// The selected node.
    #[must_use]
    pub fn selected(&self) -> Option<&GroupNode> {
        self.selected.as_deref().and_then(|id| self.root.find(id))
    }

    /// Selects exactly one node.
    pub fn select(&mut self, id: &str) -> ConsoleResult<()> {
        if self.root.find(id).is_none() {
            return Err(self.report(Guard::UnknownGroup(id.to_string()).into()));
        }
        self.root.walk_mut(&mut |node| node.selected = node.id == id);
        self.selected = Some(id.to_string());
        Ok(())
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.root.walk_mut(&mut |node| node.selected = false);
        self.selected = None;
    }

    /// Editing needs a real group to be selected.
    #[must_use]
    pub fn is_edit_disabled(&self) -> bool {
        self.selected().map_or(true, GroupNode::is_root)
    }

    /// Where a new group goes: under the selected group, or at the top
    /// level when nothing or the root is selected.
    #[must_use]
    pub fn create_target(&self) -> Parent {
        self.selected().map_or(Parent::Root, Parent::of)
    }

    /// Parent of a visible node.
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<Parent> {
        self.root.parent_of(id).map(Parent::of)
    }

    /// Loading state of a visible node.
    #[must_use]
    pub fn load_state(&self, id: &str) -> Option<LoadState> {
        let node = self.root.find(id)?;
        let state = if self.in_flight.contains(id) {
            LoadState::Loading
        } else if node.sub_groups.is_some() || self.probed.contains(id) {
            LoadState::Expanded
        } else {
            LoadState::Unexpanded
        };
        Some(state)
    }

    /// Discards all nodes and per-node state, then fetches the current
    /// page with the current search.
    ///
    /// The listing and the count are applied independently; if either
    /// fails the error is reported and the other side is still applied.
    pub async fn reload(&mut self) -> ConsoleResult<()> {
        self.generation += 1;
        self.in_flight.clear();
        self.probed.clear();
        self.clear_selection();

        let fetch = self
            .fetcher
            .fetch_page(
                self.pagination.offset(),
                self.pagination.page_size(),
                self.search.as_deref(),
            )
            .await;

        let mut failure = None;
        match fetch.items {
            Ok(groups) => {
                let mut nodes: Vec<GroupNode> = groups.into_iter().map(GroupNode::from).collect();
                sort_by_name(&mut nodes, self.name_order);
                tracing::debug!(count = nodes.len(), page = self.pagination.current_page(), "loaded groups");
                self.root.sub_groups = Some(nodes);
            }
            Err(e) => failure = Some(self.report(ConsoleError::fetch("groups", e))),
        }
        match fetch.count {
            Ok(count) => self.pagination.set_count(count),
            Err(e) => {
                let err = self.report(ConsoleError::fetch("group count", e));
                failure.get_or_insert(err);
            }
        }
        failure.map_or(Ok(()), Err)
    }

    /// Moves to a 1-based page. Returns `false` without fetching when the
    /// page is already current.
    pub async fn set_page(&mut self, page: u32) -> ConsoleResult<bool> {
        if !self.pagination.go_to(page) {
            return Ok(false);
        }
        self.reload().await?;
        Ok(true)
    }

    /// Filters the top level by name, starting again from page 1.
    pub async fn search(&mut self, term: &str) -> ConsoleResult<()> {
        self.search = search_term(Some(term));
        self.pagination.go_to(1);
        self.reload().await
    }

    /// Drops the filter, starting again from page 1.
    pub async fn clear_search(&mut self) -> ConsoleResult<()> {
        self.search = None;
        self.pagination.go_to(1);
        self.reload().await
    }

    /// Starts a toggle. Nodes that still need their children fetched get
    /// an [`ExpandRequest`]; others just flip their collapsed flag.
    pub fn begin_toggle(&mut self, id: &str) -> ConsoleResult<ToggleStep> {
        let Some(node) = self.root.find_mut(id) else {
            return Err(self.report(Guard::UnknownGroup(id.to_string()).into()));
        };

        let needs_fetch = !node.is_root()
            && node.has_child
            && !node.has_loaded_children()
            && !self.probed.contains(id);
        if !needs_fetch {
            node.collapsed = !node.collapsed;
            return Ok(ToggleStep::Toggled);
        }

        if !self.in_flight.insert(id.to_string()) {
            tracing::debug!(id, "sub-group fetch already in flight");
            return Ok(ToggleStep::Pending);
        }
        Ok(ToggleStep::Fetch(ExpandRequest {
            node_id: id.to_string(),
            generation: self.generation,
            max: self.pagination.page_size(),
        }))
    }

    /// Applies a child fetch.
    ///
    /// Non-empty results are attached and the node expanded. An empty
    /// result leaves the children unloaded and stops further fetches for
    /// the node until the next reload.
    pub fn complete_expand(&mut self, response: ExpandResponse) -> ConsoleResult<ExpandOutcome> {
        let ExpandResponse { request, result } = response;
        if request.generation != self.generation {
            tracing::warn!(id = %request.node_id, "discarding sub-groups fetched before reload");
            return Ok(ExpandOutcome::Discarded);
        }
        self.in_flight.remove(&request.node_id);

        let children = result.map_err(|e| self.report(ConsoleError::fetch("sub-groups", e)))?;
        if children.is_empty() {
            self.probed.insert(request.node_id);
            return Ok(ExpandOutcome::Empty);
        }

        let Some(node) = self.root.find_mut(&request.node_id) else {
            return Ok(ExpandOutcome::Discarded);
        };
        let attached = children.len();
        node.sub_groups = Some(children.into_iter().map(GroupNode::from).collect());
        node.collapsed = false;
        Ok(ExpandOutcome::Attached(attached))
    }

    /// Toggles a node, fetching its children if needed.
    pub async fn toggle(&mut self, id: &str) -> ConsoleResult<ExpandOutcome> {
        match self.begin_toggle(id)? {
            ToggleStep::Toggled => Ok(ExpandOutcome::Toggled),
            ToggleStep::Pending => Ok(ExpandOutcome::Pending),
            ToggleStep::Fetch(request) => {
                let response = request.load(&self.fetcher).await;
                self.complete_expand(response)
            }
        }
    }

    /// Creates a group under [`create_target`](Self::create_target) and
    /// reloads. Returns the new group's id.
    pub async fn create_group(&mut self, group: NewGroup) -> ConsoleResult<String> {
        let parent = self.create_target();
        let id = editor::create_group(
            self.backend.as_ref(),
            self.notifier.as_ref(),
            &parent,
            group,
        )
        .await?;
        self.reload_after_mutation().await;
        Ok(id)
    }

    /// Deletes a childless group after confirmation, then reloads.
    ///
    /// Returns `false` if the user declined.
    pub async fn remove(&mut self, id: &str, confirm: &dyn Confirm) -> ConsoleResult<bool> {
        let Some(node) = self.root.find(id) else {
            return Err(self.report(Guard::UnknownGroup(id.to_string()).into()));
        };
        if node.is_root() {
            return Err(self.report(Guard::RootNode("deleted").into()));
        }
        if node.may_have_children() {
            return Err(self.report(Guard::HasChildren.into()));
        }

        let message = format!(
            "Are you sure you want to permanently delete the group {}?",
            node.name
        );
        if !confirm.confirm("Delete Group", &message) {
            tracing::debug!(id, "group deletion cancelled");
            return Ok(false);
        }

        self.backend
            .delete_group(id)
            .await
            .map_err(|e| self.report(ConsoleError::mutation("delete group", e)))?;
        tracing::info!(id, "group deleted");
        self.notifier.success("The group has been deleted.");

        self.reload_after_mutation().await;
        Ok(true)
    }

    /// Reloads after a successful mutation. The mutation stands even if
    /// the reload fails; that failure is already reported.
    pub(crate) async fn reload_after_mutation(&mut self) {
        if let Err(e) = self.reload().await {
            tracing::warn!("reload after mutation failed: {}", e);
        }
    }

    fn report(&self, err: ConsoleError) -> ConsoleError {
        reported(self.notifier.as_ref(), err)
    }
}
