//! Identity model for idpsync.
//!
//! This crate defines the types every other idpsync crate agrees on: the
//! [`User`] and [`Group`] records as the sync engine sees them, and the
//! [`Snapshot`] container that holds one system's complete account state.
//! Loaders shape backend-specific entries into these types; the engine
//! compares two snapshots without knowing where either came from.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod group;
pub mod snapshot;
pub mod user;

pub use group::Group;
pub use snapshot::{Snapshot, SnapshotBuilder, SnapshotError};
pub use user::{auth_types, User};
