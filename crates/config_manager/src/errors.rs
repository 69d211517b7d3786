//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while loading or interpreting the configuration.
///
/// All of these are fatal: a backup run cannot start without a token and a
/// target directory.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file does not exist at the given path.
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file {path}")]
    Read {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON or is missing required keys.
    #[error("Failed to parse configuration file {path}")]
    Parse {
        /// The path that was being parsed.
        path: PathBuf,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The directory value starts with `~` but no home directory could be
    /// determined for the current user.
    #[error("Cannot determine the home directory to expand '~'")]
    HomeDirectory,
}
