//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides a client for making authenticated requests to GitHub
//! using a personal access token. It exposes the two read operations the
//! backup pipeline needs: resolving the authenticated user and walking the
//! paginated repository listing.

use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

pub mod errors;
pub use errors::Error;

pub mod models;
pub use models::{Account, AuthenticatedUser, RepositoryRecord};

pub mod pagination;
pub use pagination::RepoPages;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The listing route for the authenticated user's repositories.
///
/// `per_page=100` keeps the page count low; continuation past the first page
/// is driven entirely by the `Link` header of each response.
const USER_REPOS_ROUTE: &str = "/user/repos?per_page=100";

/// A client for interacting with the GitHub API, authenticated with a
/// personal access token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Wraps an already-built octocrab instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Resolves the authenticated user via the current-user endpoint.
    ///
    /// The returned login is used as the username component of authenticated
    /// clone URLs for the rest of the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] when the API answers with a
    /// non-success status (for example an expired token) and
    /// [`Error::InvalidResponse`] when the response carries no `login` field.
    #[instrument(skip(self))]
    pub async fn authenticated_user(&self) -> Result<AuthenticatedUser, Error> {
        let user: AuthenticatedUser = self
            .client
            .get("/user", None::<&()>)
            .await
            .map_err(|e| translate_octocrab_error("/user", e))?;

        info!(login = %user.login, "resolved authenticated user");
        Ok(user)
    }

    /// Starts a fresh pager over the authenticated user's repositories.
    ///
    /// Every call produces a new forward-only sequence beginning at the
    /// first page; see [`RepoPages::next_page`].
    pub fn user_repositories(&self) -> RepoPages {
        RepoPages::new(self.client.clone(), USER_REPOS_ROUTE.to_string())
    }
}

/// Creates a [`GitHubClient`] authenticated with the given personal access
/// token, targeting the public GitHub API.
///
/// # Errors
///
/// Returns [`Error::AuthError`] if the underlying client cannot be built.
pub fn create_token_client(token: &SecretString) -> Result<GitHubClient, Error> {
    let client = Octocrab::builder()
        .personal_token(token.expose_secret().to_string())
        .build()
        .map_err(|e| Error::AuthError(e.to_string()))?;

    Ok(GitHubClient::new(client))
}

/// Creates a [`GitHubClient`] against an alternate API base URI.
///
/// Used by tests to point the client at a mock server; also covers GitHub
/// Enterprise style deployments where the API lives under a different host.
///
/// # Errors
///
/// Returns [`Error::AuthError`] if the base URI is rejected or the client
/// cannot be built.
pub fn create_token_client_with_base_uri(
    token: &SecretString,
    base_uri: &str,
) -> Result<GitHubClient, Error> {
    let client = Octocrab::builder()
        .base_uri(base_uri)
        .map_err(|e| Error::AuthError(e.to_string()))?
        .personal_token(token.expose_secret().to_string())
        .build()
        .map_err(|e| Error::AuthError(e.to_string()))?;

    Ok(GitHubClient::new(client))
}

/// Translates an octocrab error into this crate's [`Error`] type.
///
/// GitHub-level errors keep their status code; deserialization problems map
/// to [`Error::InvalidResponse`]; everything else is reported as a transport
/// failure for the given route.
fn translate_octocrab_error(route: &str, e: octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } => Error::RequestFailed {
            status: source.status_code.as_u16(),
            route: route.to_string(),
        },
        octocrab::Error::Serde { source, .. } => Error::InvalidResponse(source.to_string()),
        octocrab::Error::Json { source, .. } => Error::InvalidResponse(source.to_string()),
        other => Error::Transport {
            route: route.to_string(),
            message: other.to_string(),
        },
    }
}
