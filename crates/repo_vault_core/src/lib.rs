//! # RepoVault Core
//!
//! This crate provides the core backup pipeline for RepoVault, a tool that
//! mirrors every repository owned by an authenticated GitHub user to local
//! disk and is safe to re-run incrementally.
//!
//! ## Overview
//!
//! A backup run performs these steps:
//! 1. Ensure the backup root directory exists
//! 2. Resolve the authenticated user via the API
//! 3. Walk the paginated repository listing, one page at a time
//! 4. For each repository: validate its identifiers, ensure the owner
//!    subdirectory, and create or update the local bare mirror (including
//!    LFS objects)
//!
//! Repositories are processed strictly one at a time, in listing order.
//! Failures that prevent knowing what to back up (listing, identity, root
//! directory) abort the run; failures confined to one repository are logged,
//! tallied in the [`BackupSummary`] and skipped.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use config_manager::BackupConfig;
//! use repo_vault_core::{run_backup, SystemGitRunner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackupConfig::load(Path::new("./config.json"))?;
//! let client = github_client::create_token_client(config.token())?;
//!
//! let summary = run_backup(&config, &client, &SystemGitRunner).await?;
//! println!("{} cloned, {} updated", summary.cloned, summary.updated);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The crate follows a dependency injection pattern for testability: the
//! API client is handed in by the caller and all git work goes through the
//! [`GitRunner`] trait, so tests drive the pipeline against a mock HTTP
//! server and a recording runner.

use config_manager::BackupConfig;
use github_client::{GitHubClient, RepositoryRecord};
use secrecy::SecretString;
use tracing::{info, warn};

pub mod errors;
pub use errors::Error;

pub mod fs;
pub mod git;
pub mod identifier;
pub mod mirror;

pub use git::{GitRunner, SystemGitRunner};
pub use mirror::{MirrorAction, MirrorEngine, MirrorOutcome};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "lib_integration_tests.rs"]
mod integration_tests;

/// One repository the run could not fully back up, and why.
#[derive(Debug)]
pub struct BackupFailure {
    /// The repository in `owner/name` form, as reported by the listing.
    pub repository: String,
    /// A human-readable reason.
    pub reason: String,
}

/// Tallies for one backup run.
#[derive(Debug, Default)]
pub struct BackupSummary {
    /// Repositories mirrored for the first time.
    pub cloned: usize,
    /// Repositories updated in place.
    pub updated: usize,
    /// Repositories that were skipped or only partially backed up.
    pub failures: Vec<BackupFailure>,
}

/// Runs one full backup: every repository owned by the authenticated user is
/// mirrored under `<directory>/<owner_login>/<repo_name>.git`.
///
/// # Errors
///
/// Returns an error when the backup root cannot be prepared or when an API
/// call fails (configuration, identity or listing) — without those there is
/// no way to know what to back up. Per-repository problems are recorded in
/// the returned [`BackupSummary`] instead.
pub async fn run_backup(
    config: &BackupConfig,
    client: &GitHubClient,
    git: &dyn GitRunner,
) -> Result<BackupSummary, Error> {
    let root = config.directory()?;
    if fs::ensure_directory(&root)? {
        info!(path = %root.display(), "created backup directory");
    }

    let user = client.authenticated_user().await?;
    let engine = MirrorEngine::new(git);
    let mut summary = BackupSummary::default();

    let mut pages = client.user_repositories();
    while let Some(page) = pages.next_page().await? {
        for record in page {
            let full_name = format!("{}/{}", record.owner.login, record.name);
            match mirror_one(&engine, &record, &root, &user.login, config.token()).await {
                Ok(outcome) => {
                    match outcome.action {
                        MirrorAction::Cloned => summary.cloned += 1,
                        MirrorAction::Updated => summary.updated += 1,
                    }
                    if outcome.commands_failed > 0 {
                        summary.failures.push(BackupFailure {
                            repository: full_name,
                            reason: format!(
                                "{} git command(s) exited with failure",
                                outcome.commands_failed
                            ),
                        });
                    }
                }
                Err(error) => {
                    warn!(repository = %full_name, error = %error, "skipping repository");
                    summary.failures.push(BackupFailure {
                        repository: full_name,
                        reason: error.to_string(),
                    });
                }
            }
        }
    }

    info!(
        cloned = summary.cloned,
        updated = summary.updated,
        failed = summary.failures.len(),
        "backup run complete"
    );
    Ok(summary)
}

/// Backs up a single repository; any error here is isolated by the caller.
async fn mirror_one(
    engine: &MirrorEngine<'_>,
    record: &RepositoryRecord,
    root: &std::path::Path,
    username: &str,
    token: &SecretString,
) -> Result<MirrorOutcome, Error> {
    let name = identifier::validate(&record.name)?;
    let owner = identifier::validate(&record.owner.login)?;

    let owner_path = root.join(owner);
    fs::ensure_directory(&owner_path)?;

    engine
        .mirror(name, &record.clone_url, &owner_path, username, token)
        .await
}
