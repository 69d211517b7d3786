//! Identifier validation for repository and owner names.
//!
//! Every name that ends up in a filesystem path must pass this check first.
//! The pattern admits a word character followed by word, hyphen and dot
//! characters, which rules out path separators, parent-directory escapes and
//! shell metacharacters in one place.

use regex::Regex;

use crate::errors::Error;

#[cfg(test)]
#[path = "identifier_tests.rs"]
mod tests;

/// Validates a repository or owner identifier for safe filesystem use.
///
/// Returns the input unchanged when it matches `^\w[-.\w]*$`.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for anything else, including the empty
/// string, names starting with a dot or hyphen, and names containing path
/// separators.
pub fn validate(name: &str) -> Result<&str, Error> {
    let pattern = Regex::new(r"^\w[-.\w]*$").unwrap();
    if pattern.is_match(name) {
        Ok(name)
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
