//! FreeIPA integration for idpsync.
//!
//! FreeIPA is the sync target. This crate wraps its JSON-RPC API behind
//! [`IpaClient`], loads the current account state through [`IpaLoader`]
//! (an [`idpsync_engine::SnapshotLoader`]), and performs plan actions through
//! [`IpaApplier`] (an [`idpsync_engine::ActionApplier`]). Authentication uses
//! password login against the session endpoint; the session cookie carries
//! every later call.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod applier;
pub mod client;
pub mod config;
pub mod error;
pub mod loader;

pub use applier::IpaApplier;
pub use client::IpaClient;
pub use config::IpaConfig;
pub use error::{IpaError, IpaResult};
pub use loader::IpaLoader;
