//! cli::generate
//!
//! The changelog command.
//!
//! # Design
//!
//! [`run_generate`] wires real services together. [`execute`] holds the
//! flow after configuration is resolved and takes its services as trait
//! objects so tests can drive it with mocks:
//!
//! 1. Look up both stages (concurrently)
//! 2. Compare their revisions and format the commits
//! 3. Optionally publish a release
//!
//! [`render_outcome`] turns the [`Outcome`] into text and [`report`] prints
//! it. A failed release is shown even under `--quiet` but does not change the
//! exit status; the changelog has already been computed and is printed.

use anyhow::{Context as _, Result};

use super::args::Cli;
use super::prereq::check_prerequisites;
use crate::changelog;
use crate::core::config::{Config, ConfigLayers};
use crate::core::types::{RepoRef, StageCommit, StagePair};
use crate::forge::github::{GitHubForge, DEFAULT_API_BASE};
use crate::forge::{Forge, ForgeError};
use crate::pipeline::aws::CodePipelineService;
use crate::pipeline::{fetch_stage_pair, PipelineService};
use crate::release;
use crate::ui::output::{self, Verbosity};

/// Environment variable overriding the GitHub API base URL.
pub const GITHUB_API_URL_ENV: &str = "GITHUB_API_URL";

/// Options for [`execute`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Release tag to publish, if any.
    pub release_tag: Option<String>,
    pub verbosity: Verbosity,
}

/// Result of a changelog run.
#[derive(Debug)]
pub enum Outcome {
    /// Both stages are on revisions with no commits in between.
    NoChanges { stages: StagePair },
    /// A changelog was generated.
    Changelog {
        stages: StagePair,
        title: String,
        entries: Vec<String>,
        release: Option<ReleaseOutcome>,
    },
}

/// Result of the optional release step.
#[derive(Debug)]
pub enum ReleaseOutcome {
    Created { tag: String, url: String },
    Failed { tag: String, error: ForgeError },
}

/// Run the command end to end.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn run_generate(cli: &Cli) -> Result<()> {
    let verbosity = cli.verbosity();

    let prereqs = check_prerequisites()?;
    output::debug(
        format!(
            "AWS account {}, GitHub token from {}",
            prereqs.aws_account_id,
            prereqs.github_token.source()
        ),
        verbosity,
    );

    let repo = RepoRef::parse(&cli.repo)?;
    let api_base = api_base(std::env::var(GITHUB_API_URL_ENV).ok());
    let forge = GitHubForge::with_api_base(prereqs.github_token.secret(), repo, api_base);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(generate_async(cli, &forge, verbosity))
}

/// The GitHub API base: the override when set and non-empty, else github.com.
fn api_base(override_url: Option<String>) -> String {
    override_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Async implementation of the command.
async fn generate_async(cli: &Cli, forge: &GitHubForge, verbosity: Verbosity) -> Result<()> {
    let remote: Option<&dyn Forge> = if cli.no_git {
        None
    } else {
        output::info(
            format!("Fetching repository configuration for {}...", forge.repo_ref()),
            verbosity,
        );
        Some(forge as &dyn Forge)
    };
    let layers = ConfigLayers::collect(remote, cli.overrides()).await;
    for warning in layers.warnings() {
        output::warn(&warning.message, verbosity);
    }
    let config = layers.resolve()?;

    let pipeline = CodePipelineService::new(config.region.clone()).await;
    output::debug(
        format!("Querying {} in {}", pipeline.name(), pipeline.region()),
        verbosity,
    );

    let options = GenerateOptions {
        release_tag: cli.tag.then(release::release_tag_today),
        verbosity,
    };

    let outcome = execute(forge, &pipeline, &config, &options).await?;
    report(&outcome, verbosity);
    Ok(())
}

/// Look up the stages, build the changelog and optionally publish it.
///
/// # Errors
///
/// Fails on lookup errors, a stage without a source revision, or a failed
/// comparison. Release failures are carried in the [`Outcome`] instead.
pub async fn execute(
    forge: &dyn Forge,
    pipeline: &dyn PipelineService,
    config: &Config,
    options: &GenerateOptions,
) -> Result<Outcome> {
    let stages = fetch_stage_pair(pipeline, config)
        .await
        .context("No stage information found in the pipeline")?;

    output::debug(format!("=== Pipeline: {} ===", config.pipeline), options.verbosity);
    output::debug(describe_stage(&stages.from_stage), options.verbosity);
    output::debug(describe_stage(&stages.to_stage), options.verbosity);

    let (from_revision, to_revision) = changelog::revisions(&stages)?;
    let entries = changelog::generate(forge, to_revision, from_revision).await?;

    if entries.is_empty() {
        return Ok(Outcome::NoChanges { stages });
    }

    let title = changelog::title(
        &stages.from_stage.stage_name,
        from_revision,
        &stages.to_stage.stage_name,
        to_revision,
    );

    let published = match &options.release_tag {
        Some(tag) => Some(
            match release::publish(forge, tag, &title, &entries.join("\n")).await {
                Ok(url) => ReleaseOutcome::Created {
                    tag: tag.clone(),
                    url,
                },
                Err(error) => ReleaseOutcome::Failed {
                    tag: tag.clone(),
                    error,
                },
            },
        ),
        None => None,
    };

    Ok(Outcome::Changelog {
        stages,
        title,
        entries,
        release: published,
    })
}

/// Text produced for an [`Outcome`], split by output channel.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The changelog for stdout.
    pub stdout: Option<String>,
    /// Informational lines (hidden by `--quiet`).
    pub info: Vec<String>,
    /// Warnings (hidden by `--quiet`).
    pub warnings: Vec<String>,
    /// Problems that do not fail the run but are always shown.
    pub errors: Vec<String>,
}

/// Render an outcome without printing it.
///
/// A failed release lands in `errors` so it stays visible under `--quiet`;
/// the exit status is unaffected.
pub fn render_outcome(outcome: &Outcome) -> Rendered {
    let mut rendered = Rendered::default();

    match outcome {
        Outcome::NoChanges { .. } => {
            rendered
                .warnings
                .push("No changes found between the specified stages.".to_string());
        }
        Outcome::Changelog {
            title,
            entries,
            release,
            ..
        } => {
            match release {
                Some(ReleaseOutcome::Created { tag, url }) => {
                    rendered.info.push(format!("Created release {} ({})", tag, url));
                }
                Some(ReleaseOutcome::Failed { tag, error }) => {
                    rendered
                        .errors
                        .push(format!("failed to create release {}: {}", tag, error));
                }
                None => {}
            }
            rendered.stdout = Some(changelog::render(title, entries));
        }
    }

    rendered
}

/// Print an outcome.
pub fn report(outcome: &Outcome, verbosity: Verbosity) {
    let rendered = render_outcome(outcome);

    for line in &rendered.info {
        output::info(line, verbosity);
    }
    for line in &rendered.warnings {
        output::warn(line, verbosity);
    }
    for line in &rendered.errors {
        output::error(line);
    }
    if let Some(changelog) = &rendered.stdout {
        output::print(changelog);
    }
}

/// Verbose description of one stage.
fn describe_stage(commit: &StageCommit) -> String {
    let mut fields = vec![
        ("Stage", commit.stage_name.clone()),
        ("Execution ID", commit.pipeline_execution_id.clone()),
        (
            "Commit",
            commit.revision_id.clone().unwrap_or_else(|| "-".into()),
        ),
    ];
    if let Some(summary) = &commit.revision_summary {
        fields.push(("Summary", summary.clone()));
    }
    if let Some(url) = &commit.revision_url {
        fields.push(("URL", url.clone()));
    }
    output::format_fields(&commit.display_name(), &fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_stage_lists_optional_fields() {
        let commit = StageCommit {
            stage_name: "DeployStaging".into(),
            pipeline_execution_id: "exec-2".into(),
            revision_id: Some("aaa1111".into()),
            revision_summary: Some("Add feature".into()),
            revision_url: None,
        };

        let out = describe_stage(&commit);
        assert!(out.starts_with("Staging:"));
        assert!(out.contains("Execution ID: exec-2"));
        assert!(out.contains("Summary: Add feature"));
        assert!(!out.contains("URL"));
    }

    #[test]
    fn empty_api_override_uses_github() {
        assert_eq!(api_base(None), DEFAULT_API_BASE);
        assert_eq!(api_base(Some(String::new())), DEFAULT_API_BASE);
        assert_eq!(api_base(Some("  ".into())), DEFAULT_API_BASE);
        assert_eq!(
            api_base(Some("https://github.example.com/api/v3".into())),
            "https://github.example.com/api/v3"
        );
    }
}
