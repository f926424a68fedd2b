//! Admin API representations.
//!
//! Field names follow the server's camelCase JSON. Optional fields are
//! omitted when serializing so partial updates stay partial.

pub mod client;
pub mod group;
pub mod role;
pub mod user;

pub use client::ClientRepresentation;
pub use group::{GroupCount, GroupMove, GroupRepresentation, NewGroup};
pub use role::RoleRepresentation;
pub use user::UserRepresentation;
