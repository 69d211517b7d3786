use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the RepoVault CLI application.
///
/// All of these terminate the process with a non-zero exit code: without a
/// configuration, a client or a complete listing there is nothing useful the
/// tool can do.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be loaded or interpreted.
    #[error("Configuration error: {0}")]
    Config(#[from] config_manager::Error),

    /// The GitHub client could not be constructed.
    #[error("GitHub client error: {0}")]
    Client(#[from] github_client::Error),

    /// The backup run failed before completing the listing.
    #[error(transparent)]
    Backup(#[from] repo_vault_core::Error),
}
