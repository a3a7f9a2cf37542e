//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RepoRef`] - Validated `owner/repository` reference
//! - [`StageCommit`] - Revision deployed at a pipeline stage
//! - [`StagePair`] - The two stages a changelog is generated between
//!
//! # Validation
//!
//! [`RepoRef`] enforces validity at construction time. A malformed
//! repository reference cannot be represented.
//!
//! # Examples
//!
//! ```
//! use gen_aws_changelog::core::types::RepoRef;
//!
//! let repo = RepoRef::parse("acme/widgets").unwrap();
//! assert_eq!(repo.owner(), "acme");
//! assert_eq!(repo.repository(), "widgets");
//!
//! assert!(RepoRef::parse("acme").is_err());
//! assert!(RepoRef::parse("acme/widgets/extra").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Length of an abbreviated commit id.
pub const SHORT_SHA_LEN: usize = 7;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoRefError {
    #[error("invalid repository format: {0}")]
    InvalidFormat(String),
}

/// A repository on the source-control host, as `owner/repository`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    repository: String,
}

impl RepoRef {
    /// Parse an `owner/repository` string.
    ///
    /// # Errors
    ///
    /// Returns `RepoRefError::InvalidFormat` unless the input splits on `/`
    /// into exactly two non-empty segments.
    pub fn parse(input: &str) -> Result<Self, RepoRefError> {
        let mut parts = input.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repository), None)
                if !owner.is_empty() && !repository.is_empty() =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repository: repository.to_string(),
                })
            }
            _ => Err(RepoRefError::InvalidFormat(input.to_string())),
        }
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn repository(&self) -> &str {
        &self.repository
    }
}

impl FromStr for RepoRef {
    type Err = RepoRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repository)
    }
}

/// Abbreviate a commit id to [`SHORT_SHA_LEN`] characters.
///
/// Ids shorter than that are returned whole.
pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(SHORT_SHA_LEN) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

/// The source revision deployed by the latest execution of a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommit {
    pub stage_name: String,
    pub pipeline_execution_id: String,
    pub revision_id: Option<String>,
    pub revision_summary: Option<String>,
    pub revision_url: Option<String>,
}

impl StageCommit {
    /// Stage name without the conventional `Deploy` marker.
    ///
    /// `DeployProduction` becomes `Production`.
    pub fn display_name(&self) -> String {
        self.stage_name.replacen("Deploy", "", 1)
    }
}

/// Lookup result for the two stages of a changelog run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePair {
    pub from_stage: StageCommit,
    pub to_stage: StageCommit,
}
