//! cli::prereq
//!
//! Environment checks performed before any network call.

use thiserror::Error;

use crate::auth::{self, AuthError, GitHubToken};

/// Environment variable identifying the AWS account of injected credentials.
pub const AWS_ACCOUNT_ENV: &str = "AWS_ACCOUNT_ID";

/// A required credential is missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrerequisiteError {
    #[error(
        "no AWS credentials found in the current environment (AWS_ACCOUNT_ID is not set). Inject them first and rerun the command."
    )]
    MissingAwsAccount,

    #[error(transparent)]
    GitHubAuth(#[from] AuthError),
}

/// Credentials confirmed present.
#[derive(Debug)]
pub struct Prerequisites {
    pub aws_account_id: String,
    pub github_token: GitHubToken,
}

/// Check the process environment.
///
/// # Errors
///
/// Returns the first missing prerequisite.
pub fn check_prerequisites() -> Result<Prerequisites, PrerequisiteError> {
    check_with(|name| std::env::var(name).ok(), auth::resolve_github_token)
}

/// Check with injectable sources.
pub fn check_with<E, T>(env: E, token: T) -> Result<Prerequisites, PrerequisiteError>
where
    E: Fn(&str) -> Option<String>,
    T: FnOnce() -> Result<GitHubToken, AuthError>,
{
    let aws_account_id = env(AWS_ACCOUNT_ENV)
        .filter(|v| !v.trim().is_empty())
        .ok_or(PrerequisiteError::MissingAwsAccount)?;

    let github_token = token()?;

    Ok(Prerequisites {
        aws_account_id,
        github_token,
    })
}
