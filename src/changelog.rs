//! changelog
//!
//! Build the changelog between the revisions of two stages.
//!
//! # Design
//!
//! [`generate`] is the only function that talks to the forge. Everything
//! else is pure formatting:
//! - Take immutable inputs (commits, stage pair)
//! - Return formatted strings
//! - Have no side effects
//!
//! # Example Output
//!
//! ```markdown
//!
//! ### Changes for release DeployStaging (aaa1111) to DeployProduction (bbb2222):
//!
//! - ccc3333 Add feature
//! - ddd4444 Fix login redirect
//!
//! ```

use thiserror::Error;

use crate::core::types::{short_sha, StageCommit, StagePair};
use crate::forge::{CommitRecord, Forge, ForgeError};

/// Errors from changelog generation.
#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("stage \"{stage}\" has no source revision to compare")]
    MissingRevision { stage: String },

    #[error("failed to compare revisions: {0}")]
    Compare(#[from] ForgeError),
}

/// The revision ids to compare, as `(from, to)`.
///
/// # Errors
///
/// Returns `ChangelogError::MissingRevision` for a stage whose latest
/// execution carried no source revision.
pub fn revisions(pair: &StagePair) -> Result<(&str, &str), ChangelogError> {
    fn revision(commit: &StageCommit) -> Result<&str, ChangelogError> {
        commit
            .revision_id
            .as_deref()
            .ok_or_else(|| ChangelogError::MissingRevision {
                stage: commit.stage_name.clone(),
            })
    }

    Ok((revision(&pair.from_stage)?, revision(&pair.to_stage)?))
}

/// Format one commit as a changelog entry.
///
/// Only the first line of the message is kept. A commit without a message
/// renders as the abbreviated id alone.
///
/// # Example
///
/// ```
/// use gen_aws_changelog::changelog::format_entry;
/// use gen_aws_changelog::forge::CommitRecord;
///
/// let commit = CommitRecord::new("abcdef1234567", "Fix bug\nmore detail");
/// assert_eq!(format_entry(&commit), "- abcdef1 Fix bug");
/// ```
pub fn format_entry(commit: &CommitRecord) -> String {
    let sha = short_sha(&commit.sha);
    let subject = commit.message.lines().next().unwrap_or("").trim_end();

    if subject.is_empty() {
        format!("- {}", sha)
    } else {
        format!("- {} {}", sha, subject)
    }
}

/// Compare `to_revision...from_revision` and format every commit.
///
/// The order of the forge's response is kept. An empty result means the
/// stages are on the same revision.
///
/// # Errors
///
/// Returns `ChangelogError::Compare` if the forge call fails.
pub async fn generate(
    forge: &dyn Forge,
    to_revision: &str,
    from_revision: &str,
) -> Result<Vec<String>, ChangelogError> {
    let commits = forge.compare_commits(to_revision, from_revision).await?;
    Ok(commits.iter().map(format_entry).collect())
}

/// Release title naming both stages and their abbreviated revisions.
pub fn title(from_stage: &str, from_revision: &str, to_stage: &str, to_revision: &str) -> String {
    format!(
        "Changes for release {} ({}) to {} ({})",
        from_stage,
        short_sha(from_revision),
        to_stage,
        short_sha(to_revision)
    )
}

/// Render the changelog for standard output.
pub fn render(title: &str, entries: &[String]) -> String {
    format!("\n### {}:\n\n{}\n", title, entries.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RepoRef;
    use crate::forge::mock::{FailOn, MockForge, MockOperation};

    fn stage(name: &str, revision: Option<&str>) -> StageCommit {
        StageCommit {
            stage_name: name.into(),
            pipeline_execution_id: format!("{}-exec", name),
            revision_id: revision.map(String::from),
            revision_summary: None,
            revision_url: None,
        }
    }

    mod format_entry {
        use super::*;

        #[test]
        fn keeps_first_line_only() {
            let commit = CommitRecord::new("abcdef1234567", "Fix bug\nmore detail");
            assert_eq!(format_entry(&commit), "- abcdef1 Fix bug");
        }

        #[test]
        fn handles_crlf() {
            let commit = CommitRecord::new("abcdef1234567", "Fix bug\r\n\r\nBody");
            assert_eq!(format_entry(&commit), "- abcdef1 Fix bug");
        }

        #[test]
        fn empty_message_renders_id_only() {
            let commit = CommitRecord::new("abcdef1234567", "");
            assert_eq!(format_entry(&commit), "- abcdef1");
        }

        #[test]
        fn blank_first_line_renders_id_only() {
            let commit = CommitRecord::new("abcdef1234567", "\nbody only");
            assert_eq!(format_entry(&commit), "- abcdef1");
        }
    }

    #[test]
    fn revisions_returns_from_then_to() {
        let pair = StagePair {
            from_stage: stage("DeployStaging", Some("aaa1111")),
            to_stage: stage("DeployProduction", Some("bbb2222")),
        };
        assert_eq!(revisions(&pair).unwrap(), ("aaa1111", "bbb2222"));
    }

    #[test]
    fn revisions_requires_both() {
        let pair = StagePair {
            from_stage: stage("DeployStaging", Some("aaa1111")),
            to_stage: stage("Approve", None),
        };
        let err = revisions(&pair).unwrap_err();
        assert_eq!(
            err.to_string(),
            "stage \"Approve\" has no source revision to compare"
        );
    }

    #[test]
    fn title_abbreviates_revisions() {
        assert_eq!(
            title("DeployStaging", "aaa1111ffff", "DeployProduction", "bbb2222ffff"),
            "Changes for release DeployStaging (aaa1111) to DeployProduction (bbb2222)"
        );
    }

    #[test]
    fn render_layout() {
        let out = render("T", &["- a x".to_string(), "- b y".to_string()]);
        assert_eq!(out, "\n### T:\n\n- a x\n- b y\n");
    }

    #[tokio::test]
    async fn generate_compares_to_against_from() {
        let forge = MockForge::new(RepoRef::parse("acme/widgets").unwrap()).with_comparison(
            "bbb2222",
            "aaa1111",
            vec![
                CommitRecord::new("ccc3333", "Add feature"),
                CommitRecord::new("ddd4444ffff", "Fix bug\n\nDetails"),
            ],
        );

        let entries = generate(&forge, "bbb2222", "aaa1111").await.unwrap();
        assert_eq!(entries, vec!["- ccc3333 Add feature", "- ddd4444 Fix bug"]);
        assert_eq!(
            forge.operations(),
            vec![MockOperation::CompareCommits {
                base: "bbb2222".into(),
                head: "aaa1111".into()
            }]
        );
    }

    #[tokio::test]
    async fn generate_empty_is_ok() {
        let forge = MockForge::new(RepoRef::parse("acme/widgets").unwrap()).with_comparison(
            "bbb2222",
            "bbb2222",
            vec![],
        );
        assert!(generate(&forge, "bbb2222", "bbb2222").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn generate_propagates_forge_errors() {
        let forge = MockForge::new(RepoRef::parse("acme/widgets").unwrap())
            .fail_on(FailOn::CompareCommits(ForgeError::RateLimited));
        let err = generate(&forge, "a", "b").await.unwrap_err();
        assert!(matches!(err, ChangelogError::Compare(ForgeError::RateLimited)));
    }
}
