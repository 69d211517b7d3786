//! Configuration management for RepoVault.
//!
//! The configuration is a small JSON object with two required keys:
//!
//! ```json
//! {
//!     "token": "<personal access token>",
//!     "directory": "~/backups/github"
//! }
//! ```
//!
//! It is loaded once at startup and treated as immutable for the lifetime of
//! the process. The token is held in a [`SecretString`] so it never appears
//! in `Debug` output or log lines; the directory supports `~` expansion.

use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

pub mod errors;
pub use errors::Error;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The backup configuration: one bearer credential and one storage root.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use config_manager::BackupConfig;
///
/// let config = BackupConfig::load(Path::new("./config.json"))?;
/// let root = config.directory()?;
/// # Ok::<(), config_manager::Error>(())
/// ```
#[derive(Debug, Deserialize)]
pub struct BackupConfig {
    /// The bearer credential used for every API call and clone URL.
    token: SecretString,
    /// The backup root, as written in the file (possibly `~`-prefixed).
    directory: String,
}

impl BackupConfig {
    /// Loads the configuration from a JSON file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the file does not exist,
    /// [`Error::Read`] when it cannot be read, and [`Error::Parse`] when the
    /// content is not a JSON object with the required `token` and
    /// `directory` keys.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: BackupConfig =
            serde_json::from_str(&content).map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(config)
    }

    /// The bearer credential.
    ///
    /// Callers expose the secret only at the two points that genuinely need
    /// the raw string: client construction and clone-URL credential
    /// injection.
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// The backup root directory with `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HomeDirectory`] when the value is `~`-prefixed and
    /// the home directory cannot be determined.
    pub fn directory(&self) -> Result<PathBuf, Error> {
        expand_home(&self.directory)
    }
}

/// Expands a leading `~` or `~/` against the user's home directory.
///
/// Values without a leading `~` pass through unchanged; `~user` forms are
/// not supported.
fn expand_home(raw: &str) -> Result<PathBuf, Error> {
    if raw == "~" {
        return dirs::home_dir().ok_or(Error::HomeDirectory);
    }

    if let Some(rest) = raw.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(Error::HomeDirectory)?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(raw))
}
