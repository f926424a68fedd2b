//! # kc-admin-console
//!
//! View-models for the group pages of the realm administration console.
//!
//! This crate provides:
//! - A paginated, searchable group tree with lazy sub-group loading
//! - Cut and paste re-parenting of groups
//! - Group creation, a detail editor and default-group management
//! - User membership and role mapping views for a selected group
//!
//! Controllers talk to the server through the [`backend`] traits, which
//! [`kc_admin_client::ApiClient`] implements, and report outcomes through
//! a [`Notifier`].
//!
//! ```ignore
//! let config = ConsoleConfig::load()?;
//! let client = Arc::new(ApiClient::new(&config.client)?);
//! let mut tree = TreeController::new(client, Arc::new(TerminalNotifier), &config.paging);
//! tree.reload().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod clipboard;
pub mod config;
pub mod default_groups;
pub mod editor;
pub mod error;
pub mod fetcher;
pub mod membership;
pub mod node;
pub mod notify;
pub mod page;
pub mod roles;
pub mod tree;

#[cfg(test)]
mod testing;

pub use backend::{GroupBackend, MembershipBackend, RoleMappingBackend};
pub use clipboard::{ClipboardMover, CutNode, PasteOutcome};
pub use config::{ConsoleConfig, PagingConfig};
pub use default_groups::DefaultGroupsView;
pub use editor::{create_group, GroupDraft, GroupEditor};
pub use error::{ConsoleError, ConsoleResult, Guard};
pub use fetcher::{PageFetch, PaginatedFetcher};
pub use membership::{GroupRef, MembershipBinder, PageMove, PagedList};
pub use node::{GroupNode, NodeClass, Parent, SelectionMark, ROOT_ID};
pub use notify::{Confirm, MemoryNotifier, Notifier, PromptConfirm, TerminalNotifier};
pub use page::{PageCursor, Pagination};
pub use roles::{RoleDomain, RoleLists, RoleMappingPanel, RoleSelection};
pub use tree::{ExpandOutcome, ExpandRequest, ExpandResponse, LoadState, ToggleStep, TreeController};
