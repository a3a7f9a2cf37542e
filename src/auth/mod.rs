//! auth
//!
//! GitHub token resolution.
//!
//! # Sources
//!
//! Searched in order:
//! 1. `$GITHUB_TOKEN`
//! 2. `$GH_TOKEN`
//! 3. `gh auth token` (the GitHub CLI's stored credential)
//!
//! # Security
//!
//! Tokens never appear in logs, errors, or debug output. [`GitHubToken`]
//! implements a redacting `Debug`.

use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Errors from authentication.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error(
        "no GitHub token found. Set GITHUB_TOKEN or GH_TOKEN, or run 'gh auth login'."
    )]
    NoToken,
}

/// Where a token was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Env(&'static str),
    GhCli,
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Env(name) => write!(f, "${}", name),
            TokenSource::GhCli => write!(f, "gh auth token"),
        }
    }
}

/// A resolved GitHub token.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubToken {
    value: String,
    source: TokenSource,
}

impl std::fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubToken")
            .field("value", &"[redacted]")
            .field("source", &self.source)
            .finish()
    }
}

impl GitHubToken {
    /// The bearer token.
    pub fn secret(&self) -> &str {
        &self.value
    }

    /// Where the token came from.
    pub fn source(&self) -> &TokenSource {
        &self.source
    }
}

/// Resolve a token from the process environment or the GitHub CLI.
///
/// # Errors
///
/// Returns `AuthError::NoToken` if no source yields a non-empty token.
pub fn resolve_github_token() -> Result<GitHubToken, AuthError> {
    resolve_with(|name| std::env::var(name).ok(), gh_auth_token)
}

/// Resolve a token with injectable sources.
pub fn resolve_with<E, G>(env: E, gh: G) -> Result<GitHubToken, AuthError>
where
    E: Fn(&str) -> Option<String>,
    G: FnOnce() -> Option<String>,
{
    for name in TOKEN_ENV_VARS {
        if let Some(value) = env(name).map(|v| v.trim().to_string()) {
            if !value.is_empty() {
                debug!(source = name, "using GitHub token from environment");
                return Ok(GitHubToken {
                    value,
                    source: TokenSource::Env(name),
                });
            }
        }
    }

    match gh().map(|v| v.trim().to_string()) {
        Some(value) if !value.is_empty() => {
            debug!("using GitHub token from gh CLI");
            Ok(GitHubToken {
                value,
                source: TokenSource::GhCli,
            })
        }
        _ => Err(AuthError::NoToken),
    }
}

/// Ask the GitHub CLI for its token. `None` if `gh` is missing or logged out.
fn gh_auth_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}
