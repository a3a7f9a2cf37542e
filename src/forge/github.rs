//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub:
//! - `get_file` uses the contents endpoint and decodes the base64 payload
//! - `compare_commits` uses the compare endpoint (`base...head`)
//! - `create_release` uses the releases endpoint
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation:
//! - Returns `ForgeError::RateLimited` when limits are hit
//! - Does not implement automatic retry (caller's responsibility)
//!
//! # Example
//!
//! ```ignore
//! use gen_aws_changelog::core::types::RepoRef;
//! use gen_aws_changelog::forge::github::GitHubForge;
//! use gen_aws_changelog::forge::Forge;
//!
//! let repo = RepoRef::parse("acme/widgets")?;
//! let forge = GitHubForge::new(token, repo);
//! let commits = forge.compare_commits("bbb2222", "aaa1111").await?;
//! ```

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{CommitRecord, CreateReleaseRequest, Forge, ForgeError, Release};
use crate::core::types::RepoRef;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "gen-aws-changelog";

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Bearer token
    token: String,
    /// Target repository
    repo: RepoRef,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &!self.token.is_empty())
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge for `repo` on github.com.
    pub fn new(token: impl Into<String>, repo: RepoRef) -> Self {
        Self::with_api_base(token, repo, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (`https://github.example.com/api/v3`)
    /// or to point at a test server.
    pub fn with_api_base(
        token: impl Into<String>,
        repo: RepoRef,
        api_base: impl Into<String>,
    ) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            token: token.into(),
            repo,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        if self.token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base,
            self.repo.owner(),
            self.repo.repository(),
            path
        )
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        // Rate limiting also shows up as 403 with an exhausted quota
        let rate_limited = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN if rate_limited => ForgeError::RateLimited,
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ForgeError> {
        request
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    fn repo_ref(&self) -> &RepoRef {
        &self.repo
    }

    async fn get_file(&self, path: &str) -> Result<Option<String>, ForgeError> {
        let url = self.repo_url(&format!("contents/{}", path));
        debug!(%url, "fetching file");

        let response = self.send(self.client.get(&url)).await?;
        let content: GitHubContent = match self.handle_response(response).await {
            Ok(content) => content,
            Err(ForgeError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        match content.content {
            Some(encoded) if !encoded.trim().is_empty() => decode_content(&encoded).map(Some),
            _ => Ok(None),
        }
    }

    async fn compare_commits(
        &self,
        base: &str,
        head: &str,
    ) -> Result<Vec<CommitRecord>, ForgeError> {
        let url = self.repo_url(&format!("compare/{}...{}", base, head));
        debug!(%url, "comparing revisions");

        let response = self.send(self.client.get(&url)).await?;
        let comparison: GitHubComparison = self.handle_response(response).await?;

        Ok(comparison.commits.into_iter().map(Into::into).collect())
    }

    async fn create_release(&self, request: CreateReleaseRequest) -> Result<Release, ForgeError> {
        let url = self.repo_url("releases");
        debug!(%url, tag = %request.tag, "creating release");

        let body = CreateReleaseBody {
            tag_name: &request.tag,
            name: &request.title,
            body: &request.body,
        };

        let response = self.send(self.client.post(&url).json(&body)).await?;
        let release: GitHubRelease = self.handle_response(response).await?;

        Ok(Release {
            tag: release.tag_name,
            url: release.html_url,
        })
    }
}

/// Decode a contents API payload.
///
/// GitHub wraps the base64 text at 60 columns, so whitespace is stripped
/// before decoding.
fn decode_content(encoded: &str) -> Result<String, ForgeError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ForgeError::ApiError {
            status: 200,
            message: format!("Failed to decode file content: {}", e),
        })?;

    String::from_utf8(bytes).map_err(|e| ForgeError::ApiError {
        status: 200,
        message: format!("File content is not UTF-8: {}", e),
    })
}

// --------------------------------------------------------------------------
// Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating a release.
#[derive(Serialize)]
struct CreateReleaseBody<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub file contents response format.
#[derive(Deserialize)]
struct GitHubContent {
    content: Option<String>,
}

/// GitHub compare response format.
#[derive(Deserialize)]
struct GitHubComparison {
    #[serde(default)]
    commits: Vec<GitHubCommit>,
}

/// Commit entry in a comparison.
#[derive(Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubCommitDetail,
}

#[derive(Deserialize)]
struct GitHubCommitDetail {
    message: Option<String>,
}

/// GitHub release response format.
#[derive(Deserialize)]
struct GitHubRelease {
    tag_name: String,
    html_url: String,
}

impl From<GitHubCommit> for CommitRecord {
    fn from(commit: GitHubCommit) -> Self {
        CommitRecord {
            sha: commit.sha,
            message: commit.commit.message.unwrap_or_default(),
        }
    }
}
