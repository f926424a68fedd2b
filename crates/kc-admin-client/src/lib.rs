//! # kc-admin-client
//!
//! REST client for the realm admin API of a Keycloak server.
//!
//! This crate provides:
//! - Connection configuration with file and environment sources
//! - Group listing, counting, creation, moves, updates and removal
//! - Group membership and default-group management
//! - Realm and client role mappings for groups
//!
//! Every request is built from a fresh parameter value (see [`query`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod groups;
pub mod query;
pub mod roles;
pub mod users;

pub use client::{id_from_location, ApiClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use roles::{MappingKind, RoleScope};
