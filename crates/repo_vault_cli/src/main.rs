//! RepoVault CLI: mirror every repository owned by the authenticated user
//! to local disk.

use std::path::{Path, PathBuf};

use clap::Parser;
use config_manager::BackupConfig;
use repo_vault_core::SystemGitRunner;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod errors;
use errors::Error;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// RepoVault CLI: back up GitHub repositories as local bare mirrors
#[derive(Parser)]
#[command(name = "repo-vault")]
#[command(about = "Back up the authenticated user's GitHub repositories", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("REPO_VAULT_LOG"))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli.config).await {
        error!("Error: {e}");
        std::process::exit(1);
    }
}

/// Loads the configuration, wires up the collaborators and runs one backup.
///
/// Per-repository failures do not surface here; they are reported in the
/// printed summary and the process still exits 0, because the run itself
/// completed.
async fn run(config_path: &Path) -> Result<(), Error> {
    let config = BackupConfig::load(config_path)?;
    let client = github_client::create_token_client(config.token())?;

    let summary = repo_vault_core::run_backup(&config, &client, &SystemGitRunner).await?;

    println!(
        "Backed up {} repositories ({} cloned, {} updated)",
        summary.cloned + summary.updated,
        summary.cloned,
        summary.updated
    );
    for failure in &summary.failures {
        println!("  failed: {} ({})", failure.repository, failure.reason);
    }

    Ok(())
}
