//! Error types for the backup pipeline.
//!
//! The taxonomy mirrors the propagation policy: failures that prevent
//! knowing *what* to back up (listing, identity, root directory) are fatal,
//! while failures that prevent backing up *one* repository are isolated by
//! the orchestrator and reported at the end of the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during a backup run.
#[derive(Error, Debug)]
pub enum Error {
    /// A repository or owner name failed the identifier safety check.
    ///
    /// Names are interpolated into filesystem paths, and the upstream
    /// listing is attacker-influenceable (a repository can be renamed to an
    /// arbitrary string before the next run). Processing of that single
    /// repository stops; the run continues.
    #[error("Invalid repository or owner name '{0}'")]
    InvalidName(String),

    /// A directory could not be created for a reason other than "already
    /// exists".
    ///
    /// Fatal when it concerns the backup root; isolated to the affected
    /// owner's repositories otherwise.
    #[error("Failed to create directory {path}")]
    Filesystem {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A git subprocess could not be spawned at all.
    ///
    /// Distinct from a command that ran and exited non-zero, which is
    /// observed and logged but never raised as an error.
    #[error("Failed to run {command}")]
    GitSpawn {
        /// The command that could not be spawned, without credentialed
        /// arguments.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The clone URL cannot carry a username/password pair.
    ///
    /// Raised before any subprocess runs when the URL has no authority
    /// component to inject credentials into.
    #[error("Clone URL '{0}' cannot carry credentials")]
    CredentialUrl(String),

    /// Configuration interpretation failed (home-directory expansion).
    #[error(transparent)]
    Config(#[from] config_manager::Error),

    /// A listing or identity call failed; the run cannot proceed.
    #[error(transparent)]
    GitHub(#[from] github_client::Error),
}
