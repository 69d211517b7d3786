//! The mirror engine: creates or updates one local bare mirror.
//!
//! A repository is stored at `<owner dir>/<name>.git`. The first backup is a
//! full `git clone --mirror`; every later run reassigns the remote URL and
//! performs a prune-aware `git remote update`. Both paths fetch LFS objects
//! afterward.
//!
//! The clone and update commands authenticate by embedding `user:token@` in
//! the remote URL, which git persists in the mirror's configuration. That
//! credential must never remain on disk: the engine unconditionally resets
//! the remote to the original token-free URL after the sync phase, whether
//! it succeeded, partially failed, or bailed out with a spawn error.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};
use url::Url;

use crate::errors::Error;
use crate::fs;
use crate::git::GitRunner;

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod tests;

/// Which of the two sync paths a mirror call took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorAction {
    /// The mirror did not exist yet and was cloned for the first time.
    Cloned,
    /// The mirror already existed and was updated in place.
    Updated,
}

/// The result of mirroring one repository.
#[derive(Debug)]
pub struct MirrorOutcome {
    /// Whether this was a first backup or an incremental update.
    pub action: MirrorAction,
    /// How many git commands exited non-zero. Non-zero exits are
    /// best-effort observations; the mirror may still be usable.
    pub commands_failed: usize,
}

/// Mirrors repositories through an injected [`GitRunner`].
pub struct MirrorEngine<'a> {
    git: &'a dyn GitRunner,
}

impl<'a> MirrorEngine<'a> {
    pub fn new(git: &'a dyn GitRunner) -> Self {
        Self { git }
    }

    /// Creates or updates the bare mirror for one repository.
    ///
    /// `repo_name` must already be validated; it becomes the `<name>.git`
    /// directory under `owner_path`. `username` and `token` form the
    /// transient credential embedded in the clone URL.
    ///
    /// Non-zero exits from the underlying git commands are logged and
    /// tallied in the outcome, never raised: one broken repository must not
    /// abort the whole run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialUrl`] when the clone URL cannot carry
    /// credentials, [`Error::Filesystem`] when the mirror directory cannot
    /// be created, and [`Error::GitSpawn`] when a git process cannot be
    /// started. The credential scrub runs before any of these are returned,
    /// provided the mirror directory was reached.
    pub async fn mirror(
        &self,
        repo_name: &str,
        repo_url: &Url,
        owner_path: &Path,
        username: &str,
        token: &SecretString,
    ) -> Result<MirrorOutcome, Error> {
        let authenticated = with_credentials(repo_url, username, token)?;

        let repo_dir = format!("{repo_name}.git");
        let repo_path = owner_path.join(&repo_dir);
        let created = fs::ensure_directory(&repo_path)?;

        let synced = self
            .sync(created, &repo_dir, &repo_path, owner_path, &authenticated)
            .await;

        // Always reset the stored remote to the token-free URL, regardless
        // of how the sync phase ended.
        let scrubbed = match self
            .git
            .run(
                &repo_path,
                &["remote", "set-url", "origin", repo_url.as_str()],
            )
            .await
        {
            Ok(ok) => ok,
            Err(error) => {
                warn!(path = %repo_path.display(), error = %error, "failed to reset remote URL");
                false
            }
        };

        let (action, mut commands_failed) = synced?;
        if !scrubbed {
            commands_failed += 1;
        }

        info!(path = %repo_path.display(), "done");
        Ok(MirrorOutcome {
            action,
            commands_failed,
        })
    }

    /// The fallible sync phase: clone or update, then LFS fetch.
    ///
    /// Returns the action taken and the number of commands that exited
    /// non-zero. An `Err` here means a process could not be spawned; the
    /// caller still scrubs before propagating it.
    async fn sync(
        &self,
        created: bool,
        repo_dir: &str,
        repo_path: &Path,
        owner_path: &Path,
        authenticated: &Url,
    ) -> Result<(MirrorAction, usize), Error> {
        let mut commands_failed = 0;

        let action = if created {
            info!(path = %repo_path.display(), "cloning new repository");
            if !self
                .git
                .run(
                    owner_path,
                    &["clone", "--mirror", authenticated.as_str(), repo_dir],
                )
                .await?
            {
                commands_failed += 1;
            }
            MirrorAction::Cloned
        } else {
            info!(path = %repo_path.display(), "updating existing repository");
            if !self
                .git
                .run(
                    repo_path,
                    &["remote", "set-url", "origin", authenticated.as_str()],
                )
                .await?
            {
                commands_failed += 1;
            }
            if !self
                .git
                .run(repo_path, &["remote", "update", "--prune"])
                .await?
            {
                commands_failed += 1;
            }
            MirrorAction::Updated
        };

        if !self
            .git
            .run(repo_path, &["lfs", "fetch", "--all", "--prune"])
            .await?
        {
            commands_failed += 1;
        }

        Ok((action, commands_failed))
    }
}

/// Returns `url` with `username:token@` injected into the authority
/// component. Scheme, host, path and query are untouched.
fn with_credentials(url: &Url, username: &str, token: &SecretString) -> Result<Url, Error> {
    let mut authenticated = url.clone();
    authenticated
        .set_username(username)
        .map_err(|()| Error::CredentialUrl(url.to_string()))?;
    authenticated
        .set_password(Some(token.expose_secret()))
        .map_err(|()| Error::CredentialUrl(url.to_string()))?;
    Ok(authenticated)
}
