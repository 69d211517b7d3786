//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when talking to the
//! GitHub API through the github_client crate. Listing and identity calls are
//! required to know what to back up, so callers treat these errors as fatal
//! for the whole run.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// Each variant carries enough context to report the failing call without
/// exposing the credential used to authenticate it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to construct or authenticate the GitHub client.
    ///
    /// This error occurs when the client cannot be built, for example because
    /// the base URI is malformed or the token cannot be installed as a
    /// default header.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// The GitHub API answered with a non-success status code.
    ///
    /// Contains the HTTP status and the route that was requested. For the
    /// repository listing and current-user routes this aborts the backup run,
    /// since without them there is no way to know what to mirror.
    #[error("GitHub API request to {route} failed with status {status}")]
    RequestFailed {
        /// The HTTP status code returned by the API.
        status: u16,
        /// The route that was requested, without credentials.
        route: String,
    },

    /// The request could not be completed at the transport level.
    ///
    /// Covers connection failures, invalid URIs and other conditions where no
    /// HTTP status was received from GitHub.
    #[error("GitHub API request to {route} failed: {message}")]
    Transport {
        /// The route that was requested, without credentials.
        route: String,
        /// A description of the transport failure.
        message: String,
    },

    /// The response body did not match the expected schema.
    ///
    /// Returned when a listing page or the current-user object is missing a
    /// required field such as `name`, `owner.login` or `clone_url`. The
    /// descriptor schema is deliberately explicit so a malformed response
    /// fails here instead of surfacing as a lookup panic later.
    #[error("GitHub response did not match the expected schema: {0}")]
    InvalidResponse(String),
}
