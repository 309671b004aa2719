//! LDAP directory loader for idpsync.
//!
//! The directory is the identity provider's source of truth. This crate
//! connects to it, walks the configured user and group subtrees, and shapes
//! the entries into an [`idpsync_model::Snapshot`] through the configured
//! attribute mapping. The exported [`LdapSource`] implements
//! [`idpsync_engine::SnapshotLoader`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod connection;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod search;

pub use config::{AttributeMap, LdapConfig};
pub use connection::LdapConnection;
pub use error::{LdapError, LdapResult};
pub use loader::LdapSource;
pub use mapper::EntryMapper;
pub use search::LdapEntry;
