//! idpsync binary entry point.

#![forbid(unsafe_code)]

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idpsync_cli::commands::{status, sync};
use idpsync_cli::{Cli, Command, SyncConfig};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,idpsync_engine=debug,idpsync_ldap=debug,idpsync_freeipa=debug,idpsync_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match SyncConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            idpsync_cli::output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Sync { dry_run } => {
            sync::run_sync(&config, cli.ipa_password.as_deref(), dry_run, cli.output).await
        }
        Command::Status => status::run_status(&config, cli.ipa_password.as_deref()).await,
    };

    if let Err(e) = result {
        idpsync_cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
