//! Git command invocation using [`tokio::process::Command`].
//!
//! All repository work shells out to the system `git` binary: mirror clone,
//! remote reconfiguration, prune-aware update and LFS fetch. Commands run
//! with an explicit working directory, a null stdin and
//! `GIT_TERMINAL_PROMPT=0` so a credential prompt can never wedge an
//! unattended run.
//!
//! Argument lists may carry credentialed URLs; log lines and error values
//! must never include them verbatim.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::Error;

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;

/// Boundary for running `git` with an argument list in a working directory.
///
/// The mirror engine depends on this trait rather than on the system binary
/// so tests can record and script invocations.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Runs `git <args>` in `cwd`.
    ///
    /// Returns `Ok(true)` on a zero exit status and `Ok(false)` otherwise;
    /// a non-zero exit is an observation, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GitSpawn`] only when the process could not be
    /// started at all (e.g. no `git` binary on the PATH).
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<bool, Error>;
}

/// The production runner: spawns the system `git` binary.
pub struct SystemGitRunner;

#[async_trait]
impl GitRunner for SystemGitRunner {
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<bool, Error> {
        let label = command_label(args);
        debug!(command = %label, cwd = %cwd.display(), "spawning git");

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| Error::GitSpawn {
                command: label.clone(),
                source,
            })?;

        if output.status.success() {
            debug!(command = %label, "git command succeeded");
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                command = %label,
                status = ?output.status.code(),
                stderr = %redact_credentials(stderr.trim()),
                "git command exited with failure"
            );
        }

        Ok(output.status.success())
    }
}

/// A loggable form of a git invocation: the leading arguments up to the
/// first URL, which is where credentials can appear.
pub(crate) fn command_label(args: &[&str]) -> String {
    let safe: Vec<&str> = args
        .iter()
        .take_while(|arg| !arg.contains("://"))
        .copied()
        .collect();
    format!("git {}", safe.join(" "))
}

/// Strips `user:password@` authority components from URLs embedded in git
/// output before it reaches a log line.
pub(crate) fn redact_credentials(text: &str) -> String {
    let pattern = Regex::new(r"://[^/@\s]+@").unwrap();
    pattern.replace_all(text, "://").into_owned()
}
