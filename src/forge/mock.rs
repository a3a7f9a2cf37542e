//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge` trait
//! for use in tests. It serves files and comparisons from memory, stores
//! created releases, and allows configuring failure scenarios.
//!
//! # Example
//!
//! ```
//! use gen_aws_changelog::core::types::RepoRef;
//! use gen_aws_changelog::forge::mock::MockForge;
//! use gen_aws_changelog::forge::{CommitRecord, Forge};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new(RepoRef::parse("acme/widgets").unwrap())
//!     .with_comparison("bbb2222", "aaa1111", vec![CommitRecord::new("ccc3333", "Add feature")]);
//!
//! let commits = forge.compare_commits("bbb2222", "aaa1111").await.unwrap();
//! assert_eq!(commits.len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{CommitRecord, CreateReleaseRequest, Forge, ForgeError, Release};
use crate::core::types::RepoRef;

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockForge {
    repo: RepoRef,
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// File contents by path.
    files: HashMap<String, String>,
    /// Commits by `(base, head)`.
    comparisons: HashMap<(String, String), Vec<CommitRecord>>,
    /// Created releases.
    releases: Vec<CreateReleaseRequest>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail get_file with the given error.
    GetFile(ForgeError),
    /// Fail compare_commits with the given error.
    CompareCommits(ForgeError),
    /// Fail create_release with the given error.
    CreateRelease(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetFile { path: String },
    CompareCommits { base: String, head: String },
    CreateRelease { tag: String, title: String },
}

impl MockForge {
    /// Create a new empty mock forge bound to `repo`.
    pub fn new(repo: RepoRef) -> Self {
        Self {
            repo,
            inner: Arc::new(Mutex::new(MockForgeInner::default())),
        }
    }

    /// Serve `contents` for `path`.
    pub fn with_file(self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.files.insert(path.into(), contents.into());
        }
        self
    }

    /// Serve `commits` for a comparison of `base...head`.
    pub fn with_comparison(
        self,
        base: impl Into<String>,
        head: impl Into<String>,
        commits: Vec<CommitRecord>,
    ) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.comparisons.insert((base.into(), head.into()), commits);
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use gen_aws_changelog::core::types::RepoRef;
    /// use gen_aws_changelog::forge::mock::{FailOn, MockForge};
    /// use gen_aws_changelog::forge::ForgeError;
    ///
    /// let forge = MockForge::new(RepoRef::parse("acme/widgets").unwrap())
    ///     .fail_on(FailOn::CreateRelease(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Get all created releases (for test verification).
    pub fn releases(&self) -> Vec<CreateReleaseRequest> {
        let inner = self.inner.lock().unwrap();
        inner.releases.clone()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str) -> Option<ForgeError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::GetFile(e)) if expected == "get_file" => Some(e.clone()),
            Some(FailOn::CompareCommits(e)) if expected == "compare_commits" => Some(e.clone()),
            Some(FailOn::CreateRelease(e)) if expected == "create_release" => Some(e.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn repo_ref(&self) -> &RepoRef {
        &self.repo
    }

    async fn get_file(&self, path: &str) -> Result<Option<String>, ForgeError> {
        self.record(MockOperation::GetFile {
            path: path.to_string(),
        });

        if let Some(err) = self.check_fail("get_file") {
            return Err(err);
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner.files.get(path).cloned())
    }

    async fn compare_commits(
        &self,
        base: &str,
        head: &str,
    ) -> Result<Vec<CommitRecord>, ForgeError> {
        self.record(MockOperation::CompareCommits {
            base: base.to_string(),
            head: head.to_string(),
        });

        if let Some(err) = self.check_fail("compare_commits") {
            return Err(err);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .comparisons
            .get(&(base.to_string(), head.to_string()))
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("comparison {}...{}", base, head)))
    }

    async fn create_release(&self, request: CreateReleaseRequest) -> Result<Release, ForgeError> {
        self.record(MockOperation::CreateRelease {
            tag: request.tag.clone(),
            title: request.title.clone(),
        });

        if let Some(err) = self.check_fail("create_release") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.releases.iter().any(|r| r.tag == request.tag) {
            return Err(ForgeError::ApiError {
                status: 422,
                message: format!("release {} already exists", request.tag),
            });
        }

        let release = Release {
            tag: request.tag.clone(),
            url: format!(
                "https://github.com/{}/releases/tag/{}",
                self.repo, request.tag
            ),
        };
        inner.releases.push(request);
        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forge() -> MockForge {
        MockForge::new(RepoRef::parse("acme/widgets").unwrap())
    }

    #[tokio::test]
    async fn get_file_returns_none_when_absent() {
        let forge = forge();
        assert_eq!(forge.get_file("missing.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_file_returns_contents() {
        let forge = forge().with_file("a.json", "{}");
        assert_eq!(
            forge.get_file("a.json").await.unwrap().as_deref(),
            Some("{}")
        );
    }

    #[tokio::test]
    async fn unknown_comparison_is_not_found() {
        let forge = forge();
        let err = forge.compare_commits("a", "b").await.unwrap_err();
        assert!(matches!(err, ForgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_release_records_and_rejects_duplicates() {
        let forge = forge();
        let request = CreateReleaseRequest {
            tag: "release-1-2-2026".into(),
            title: "t".into(),
            body: "b".into(),
        };

        let release = forge.create_release(request.clone()).await.unwrap();
        assert_eq!(
            release.url,
            "https://github.com/acme/widgets/releases/tag/release-1-2-2026"
        );
        assert_eq!(forge.releases(), vec![request.clone()]);

        let err = forge.create_release(request).await.unwrap_err();
        assert!(matches!(err, ForgeError::ApiError { status: 422, .. }));
    }

    #[tokio::test]
    async fn fail_on_only_affects_target() {
        let forge = forge()
            .with_file("a.json", "{}")
            .fail_on(FailOn::CompareCommits(ForgeError::RateLimited));

        assert!(forge.get_file("a.json").await.is_ok());
        assert!(matches!(
            forge.compare_commits("a", "b").await,
            Err(ForgeError::RateLimited)
        ));
        assert_eq!(
            forge.operations(),
            vec![
                MockOperation::GetFile {
                    path: "a.json".into()
                },
                MockOperation::CompareCommits {
                    base: "a".into(),
                    head: "b".into()
                },
            ]
        );
    }
}
