//! forge::traits
//!
//! Forge trait definition for interacting with the source-control host.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully. A forge
//! instance is bound to one repository.
//!
//! # Example
//!
//! ```ignore
//! use gen_aws_changelog::forge::{Forge, ForgeError};
//!
//! async fn list(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     for commit in forge.compare_commits("bbb2222", "aaa1111").await? {
//!         println!("{} {}", commit.sha, commit.message);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::RepoRef;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// A commit returned by a revision comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit id
    pub sha: String,
    /// Full commit message (may be empty)
    pub message: String,
}

impl CommitRecord {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
        }
    }
}

/// Request to create a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReleaseRequest {
    /// Tag name (created on the default branch if it does not exist)
    pub tag: String,
    /// Release title
    pub title: String,
    /// Release notes
    pub body: String,
}

/// Release information returned from the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag name
    pub tag: String,
    /// Release URL (web URL for viewing)
    pub url: String,
}

/// The Forge trait for interacting with the source-control host.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `AuthRequired` / `AuthFailed`: Check the configured token
/// - `NotFound`: Resource doesn't exist
/// - `RateLimited`: Try again later
/// - `ApiError`: Display error message to user
/// - `NetworkError`: Check connectivity
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// The repository this forge is bound to.
    fn repo_ref(&self) -> &RepoRef;

    /// Get the decoded text of a file on the default branch.
    ///
    /// # Returns
    ///
    /// `Some(contents)` if the file exists, `None` if it is absent or has no
    /// content.
    async fn get_file(&self, path: &str) -> Result<Option<String>, ForgeError>;

    /// List the commits reachable from `head` but not from `base`.
    ///
    /// Commits are returned in the host's order (oldest first on GitHub).
    ///
    /// # Errors
    ///
    /// - `NotFound` if either revision doesn't exist
    async fn compare_commits(&self, base: &str, head: &str)
        -> Result<Vec<CommitRecord>, ForgeError>;

    /// Create a published release.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if lacking permissions
    /// - `ApiError` with status 422 if the tag already has a release
    async fn create_release(&self, request: CreateReleaseRequest) -> Result<Release, ForgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_record_new() {
        let commit = CommitRecord::new("abc", "msg");
        assert_eq!(commit.sha, "abc");
        assert_eq!(commit.message, "msg");
    }

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!("{}", ForgeError::AuthRequired),
            "authentication required"
        );
        assert_eq!(
            format!("{}", ForgeError::AuthFailed("expired token".into())),
            "authentication failed: expired token"
        );
        assert_eq!(
            format!("{}", ForgeError::NotFound("commit abc".into())),
            "not found: commit abc"
        );
        assert_eq!(format!("{}", ForgeError::RateLimited), "rate limited");
        assert_eq!(
            format!(
                "{}",
                ForgeError::ApiError {
                    status: 422,
                    message: "Validation failed".into()
                }
            ),
            "API error: 422 - Validation failed"
        );
        assert_eq!(
            format!("{}", ForgeError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
    }
}
