//! Cut and paste re-parenting.

use std::sync::Arc;

use crate::backend::GroupBackend;
use crate::error::{ConsoleError, ConsoleResult, Guard};
use crate::node::Parent;
use crate::notify::{reported, Notifier};
use crate::tree::TreeController;

/// The node held on the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutNode {
    /// Group id.
    pub id: String,
    /// Group name, for display.
    pub name: String,
    /// Where the group was when it was cut.
    pub parent: Parent,
}

/// What a paste did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// The group was moved.
    Moved {
        /// Moved group.
        id: String,
        /// New parent.
        to: Parent,
    },
    /// Nothing was cut.
    NothingToPaste,
    /// The target is the cut node itself.
    SameNode,
    /// The target is already the cut node's parent.
    SameParent,
}

impl PasteOutcome {
    /// Checks if a move was performed.
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Single-slot clipboard moving one group at a time.
pub struct ClipboardMover {
    backend: Arc<dyn GroupBackend>,
    notifier: Arc<dyn Notifier>,
    cut: Option<CutNode>,
}

impl ClipboardMover {
    /// Creates an empty clipboard.
    #[must_use]
    pub fn new(backend: Arc<dyn GroupBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            cut: None,
        }
    }

    /// The node held on the clipboard.
    #[must_use]
    pub const fn cut_node(&self) -> Option<&CutNode> {
        self.cut.as_ref()
    }

    /// Id of the node held on the clipboard, for
    /// [`GroupNode::selection_mark`](crate::node::GroupNode::selection_mark).
    #[must_use]
    pub fn cut_id(&self) -> Option<&str> {
        self.cut.as_ref().map(|c| c.id.as_str())
    }

    /// Empties the clipboard.
    pub fn clear(&mut self) {
        self.cut = None;
    }

    /// Puts a visible group on the clipboard, replacing any previous one.
    /// The group stays where it is until pasted.
    pub fn cut(&mut self, tree: &TreeController, id: &str) -> ConsoleResult<&CutNode> {
        let Some(node) = tree.find(id) else {
            return Err(self.report(Guard::UnknownGroup(id.to_string()).into()));
        };
        if node.is_root() {
            return Err(self.report(Guard::RootNode("moved").into()));
        }
        let parent = tree.parent_of(id).unwrap_or(Parent::Root);

        tracing::debug!(id, ?parent, "group cut");
        Ok(self.cut.insert(CutNode {
            id: node.id.clone(),
            name: node.name.clone(),
            parent,
        }))
    }

    /// Moves the cut group under `target`.
    ///
    /// Pasting onto the root moves the group to the top level. Pasting
    /// onto the cut group itself or onto its current parent does nothing.
    /// On success the clipboard is emptied and the tree reloaded; on
    /// failure the clipboard is kept so the paste can be retried.
    pub async fn paste(
        &mut self,
        tree: &mut TreeController,
        target: Option<&str>,
    ) -> ConsoleResult<PasteOutcome> {
        let Some(target) = target else {
            return Err(self.report(Guard::NoGroupSelected.into()));
        };
        let Some(cut) = self.cut.as_ref() else {
            return Ok(PasteOutcome::NothingToPaste);
        };
        let Some(target_node) = tree.find(target) else {
            return Err(self.report(Guard::UnknownGroup(target.to_string()).into()));
        };

        if target_node.id == cut.id {
            return Ok(PasteOutcome::SameNode);
        }
        let to = Parent::of(target_node);
        if to == cut.parent {
            return Ok(PasteOutcome::SameParent);
        }

        let id = cut.id.clone();
        self.backend
            .move_group(&id, to.id())
            .await
            .map_err(|e| self.report(ConsoleError::mutation("move group", e)))?;
        tracing::info!(id = %id, ?to, "group moved");
        self.notifier.success("The group has been moved.");
        self.cut = None;

        tree.reload_after_mutation().await;
        Ok(PasteOutcome::Moved { id, to })
    }

    fn report(&self, err: ConsoleError) -> ConsoleError {
        reported(self.notifier.as_ref(), err)
    }
}
