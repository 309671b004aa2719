//! Argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

// ============================================================================
// CLI Definition
// ============================================================================

/// One-shot sync of directory accounts into FreeIPA.
#[derive(Debug, Parser)]
#[command(
    name = "idpsync",
    about = "Syncs users and groups from an identity provider's directory into FreeIPA",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(
        short,
        long,
        global = true,
        env = "IDPSYNC_CONFIG",
        default_value = "idpsync.toml"
    )]
    pub config: PathBuf,

    /// FreeIPA password. Prompted for when not given.
    #[arg(long, global = true, env = "IDPSYNC_IPA_PASSWORD", hide_env_values = true)]
    pub ipa_password: Option<String>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Enable verbose logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan the difference and apply it to FreeIPA.
    Sync {
        /// Report every action without changing anything.
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// Check that both the directory and FreeIPA are reachable.
    Status,
}

// ============================================================================
// Tests
// ============================================================================
