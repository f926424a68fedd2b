//! Console error types.
//!
//! Every failure is terminal for the operation that raised it: it is
//! reported through the [`Notifier`](crate::notify::Notifier) and returned
//! to the caller, never retried automatically.

use kc_admin_client::ClientError;
use thiserror::Error;

/// Client-side precondition failures. These are detected before any
/// remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Guard {
    /// No group is selected.
    #[error("please select a group")]
    NoGroupSelected,

    /// The operation needs a member of the selected group.
    #[error("please select a group member")]
    NoMemberSelected,

    /// The operation needs a client to scope client roles.
    #[error("please select a client")]
    NoClientSelected,

    /// The synthetic tree root was targeted by an operation on real groups.
    #[error("the group tree root cannot be {0}")]
    RootNode(&'static str),

    /// The id does not name a node of the visible tree.
    #[error("group is not in the current view: {0}")]
    UnknownGroup(String),

    /// Groups with children cannot be removed.
    #[error("the group has children and cannot be deleted")]
    HasChildren,

    /// The user is already listed as a member.
    #[error("the user is already a member, please select another user")]
    AlreadyMember,

    /// The user is not among the loaded candidates.
    #[error("user is not in the current user list: {0}")]
    UnknownUser(String),

    /// A batch operation was requested with nothing selected.
    #[error("no roles selected")]
    EmptySelection,

    /// A required name was blank.
    #[error("{0} must not be empty")]
    Blank(&'static str),
}

/// Console error type.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A listing or count request failed.
    #[error("failed to fetch {what}: {source}")]
    Fetch {
        /// What was being fetched.
        what: &'static str,
        /// Underlying client error.
        source: ClientError,
    },

    /// A create, update, remove, move, grant, revoke or membership change failed.
    #[error("failed to {action}: {source}")]
    Mutation {
        /// The attempted action.
        action: &'static str,
        /// Underlying client error.
        source: ClientError,
    },

    /// A client-side precondition failed.
    #[error(transparent)]
    Guard(#[from] Guard),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ConsoleError {
    /// Wraps a failed read.
    #[must_use]
    pub const fn fetch(what: &'static str, source: ClientError) -> Self {
        Self::Fetch { what, source }
    }

    /// Wraps a failed write.
    #[must_use]
    pub const fn mutation(action: &'static str, source: ClientError) -> Self {
        Self::Mutation { action, source }
    }

    /// Returns the guard if this is a precondition failure.
    #[must_use]
    pub const fn guard(&self) -> Option<&Guard> {
        match self {
            Self::Guard(guard) => Some(guard),
            _ => None,
        }
    }

    /// Checks if this is a failed read.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// Checks if this is a failed write.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation { .. })
    }
}

/// Console result type.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
