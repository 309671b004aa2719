//! Command line interface for idpsync.
//!
//! The binary reads a TOML configuration naming the directory and the FreeIPA
//! server, loads both snapshots, plans the difference and either reports it
//! (`--dry-run`) or applies it. All model, planning and backend logic lives in
//! the sibling crates; this one owns argument parsing, configuration files,
//! terminal output and the apply walk.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{OutputFormat, SyncConfig};
pub use error::{CliError, CliResult};
