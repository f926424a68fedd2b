//! Group tree nodes.
//!
//! Groups are organised in a forest that the console shows under one
//! synthetic root. Children are loaded lazily, so a node distinguishes
//! "children not loaded" (`sub_groups == None`) from "loaded"
//! (`Some(..)`).

use std::cmp::Ordering;

use kc_admin_client::dto::GroupRepresentation;

/// Id of the synthetic root node.
pub const ROOT_ID: &str = "realm";

/// A group in the visible tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    /// Group id, or [`ROOT_ID`] for the root.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Loaded children; `None` until fetched.
    pub sub_groups: Option<Vec<GroupNode>>,
    /// Backend hint that children exist.
    pub has_child: bool,
    /// Whether loaded children are hidden.
    pub collapsed: bool,
    /// Whether this is the selected node.
    pub selected: bool,
    root: bool,
}

/// How a node is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// The synthetic root.
    Root,
    /// Has (or may have) children that are hidden.
    Collapsed,
    /// Children are shown.
    Expanded,
    /// No children.
    Normal,
}

impl NodeClass {
    /// Stable name for renderers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Collapsed => "collapsed",
            Self::Expanded => "expanded",
            Self::Normal => "normal",
        }
    }
}

/// Highlight applied on top of the node class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMark {
    /// The selected node.
    Selected,
    /// The node held on the clipboard.
    Cut,
}

/// Where a group lives, or where it is created or moved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Top level of the realm.
    Root,
    /// Child of the group with this id.
    Group(String),
}

impl Parent {
    /// Returns the parent node as a target for create or move.
    #[must_use]
    pub fn of(node: &GroupNode) -> Self {
        if node.is_root() {
            Self::Root
        } else {
            Self::Group(node.id.clone())
        }
    }

    /// Group id, or `None` for the top level.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::Group(id) => Some(id),
        }
    }
}

/// Comparator used to order top-level groups by name.
pub type NameOrder = fn(&str, &str) -> Ordering;

/// Case-insensitive order, ties broken by exact comparison.
#[must_use]
pub fn default_name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorts sibling nodes by name.
pub fn sort_by_name(nodes: &mut [GroupNode], order: NameOrder) {
    nodes.sort_by(|a, b| order(&a.name, &b.name));
}

impl GroupNode {
    /// Creates the synthetic root with an empty loaded child list.
    #[must_use]
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            name: label.into(),
            sub_groups: Some(Vec::new()),
            has_child: false,
            collapsed: false,
            selected: false,
            root: true,
        }
    }

    /// Creates a group node with no loaded children.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sub_groups: None,
            has_child: false,
            collapsed: false,
            selected: false,
            root: false,
        }
    }

    /// Sets the children hint.
    #[must_use]
    pub const fn with_children_hint(mut self, has_child: bool) -> Self {
        self.has_child = has_child;
        self
    }

    /// Sets loaded children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<GroupNode>) -> Self {
        self.sub_groups = Some(children);
        self
    }

    /// Checks if this is the synthetic root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.root
    }

    /// A leaf is any real group without loaded children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.root && self.children().is_empty()
    }

    /// Loaded children, empty when none are loaded.
    #[must_use]
    pub fn children(&self) -> &[GroupNode] {
        self.sub_groups.as_deref().unwrap_or_default()
    }

    /// Checks if at least one child is loaded.
    #[must_use]
    pub fn has_loaded_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Checks if the group has children, loaded or hinted.
    #[must_use]
    pub fn may_have_children(&self) -> bool {
        self.has_child || self.has_loaded_children()
    }

    /// Classifies the node for display.
    ///
    /// Loaded children decide between expanded and collapsed. Without
    /// them the backend hint keeps the node collapsed pending a fetch.
    #[must_use]
    pub fn class(&self) -> NodeClass {
        if self.root {
            NodeClass::Root
        } else if self.has_loaded_children() {
            if self.collapsed {
                NodeClass::Collapsed
            } else {
                NodeClass::Expanded
            }
        } else if self.has_child {
            NodeClass::Collapsed
        } else {
            NodeClass::Normal
        }
    }

    /// Highlight for this node given the clipboard content.
    #[must_use]
    pub fn selection_mark(&self, cut_id: Option<&str>) -> Option<SelectionMark> {
        if self.selected {
            Some(SelectionMark::Selected)
        } else if cut_id == Some(self.id.as_str()) {
            Some(SelectionMark::Cut)
        } else {
            None
        }
    }

    /// Finds a node in this subtree.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&GroupNode> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Finds a node in this subtree for mutation.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut GroupNode> {
        if self.id == id {
            return Some(self);
        }
        self.sub_groups
            .as_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Finds the node whose children include `id`.
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<&GroupNode> {
        let children = self.children();
        if children.iter().any(|child| child.id == id) {
            return Some(self);
        }
        children.iter().find_map(|child| child.parent_of(id))
    }

    /// Applies `f` to every node of this subtree.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut GroupNode)) {
        f(self);
        if let Some(children) = self.sub_groups.as_mut() {
            for child in children {
                child.walk_mut(f);
            }
        }
    }
}

impl From<GroupRepresentation> for GroupNode {
    fn from(group: GroupRepresentation) -> Self {
        let children: Vec<GroupNode> = group.sub_groups.into_iter().map(Self::from).collect();
        let mut node = Self::new(group.id, group.name).with_children_hint(group.has_child);
        if !children.is_empty() {
            node.sub_groups = Some(children);
        }
        node
    }
}
