//! # Models
//!
//! Data models for the repository listing and current-user endpoints.
//!
//! The structs here name exactly the fields the backup pipeline consumes.
//! Deserialization fails when a required field is absent, so schema drift in
//! the API surfaces as a clear error at the fetch boundary rather than deeper
//! in the mirror logic.

use serde::Deserialize;
use url::Url;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents the account that owns a repository.
///
/// Only the login name is consumed: it becomes the owner-scoped subdirectory
/// under the backup root, after validation.
#[derive(Clone, Debug, Deserialize)]
pub struct Account {
    /// The login name of the account
    pub login: String,
}

/// Represents the authenticated user, as returned by the current-user
/// endpoint.
///
/// The login is resolved once per run and used as the username component of
/// authenticated clone URLs.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthenticatedUser {
    /// The login name of the authenticated user
    pub login: String,
}

/// Represents one repository from a listing page.
///
/// # Examples
///
/// ```rust
/// use github_client::RepositoryRecord;
///
/// let record: RepositoryRecord = serde_json::from_str(
///     r#"{
///         "name": "proj",
///         "owner": { "login": "alice" },
///         "clone_url": "https://github.com/alice/proj.git"
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(record.name, "proj");
/// assert_eq!(record.owner.login, "alice");
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct RepositoryRecord {
    /// The name of the repository (without owner)
    pub name: String,
    /// The account that owns the repository
    pub owner: Account,
    /// The HTTPS clone URL of the repository
    pub clone_url: Url,
}
