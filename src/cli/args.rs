//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! Stage and git flags keep their camelCase spelling (`--fromStage`) and
//! also accept kebab-case aliases (`--from-stage`).

use clap::Parser;

use crate::core::config::PartialConfig;
use crate::ui::output::Verbosity;

/// Generate AWS changelog from pipeline commits
#[derive(Parser, Debug)]
#[command(name = "gen-aws-changelog")]
#[command(version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Stages and pipeline from .aws-changelog.json in the repository
    gen-aws-changelog acme/widgets

    # Everything on the command line, without reading the repository config
    gen-aws-changelog acme/widgets --noGit --pipeline widgets \\
        --fromStage DeployStaging --toStage DeployProduction

    # Also publish a GitHub release named release-<day>-<month>-<year>
    gen-aws-changelog acme/widgets --tag

ENVIRONMENT:
    AWS_ACCOUNT_ID              must be set (AWS credentials are injected)
    GITHUB_TOKEN / GH_TOKEN     GitHub token (falls back to 'gh auth token')
    GITHUB_API_URL              GitHub API base for GitHub Enterprise
    RUST_LOG                    overrides the log filter")]
pub struct Cli {
    /// The repository name with organization/owner (e.g., owner/repo)
    #[arg(value_name = "OWNER/REPO")]
    pub repo: String,

    /// The name of the AWS CodePipeline
    #[arg(long)]
    pub pipeline: Option<String>,

    /// The starting stage of the pipeline
    #[arg(long = "fromStage", visible_alias = "from-stage", value_name = "STAGE")]
    pub from_stage: Option<String>,

    /// The ending stage of the pipeline
    #[arg(long = "toStage", visible_alias = "to-stage", value_name = "STAGE")]
    pub to_stage: Option<String>,

    /// AWS region for the CodePipeline (default: eu-central-1)
    #[arg(long)]
    pub region: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Don't fetch the configuration file from the repository
    #[arg(long = "noGit", visible_alias = "no-git")]
    pub no_git: bool,

    /// Create a release for the current date with the changelog as description
    #[arg(long)]
    pub tag: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Output verbosity from `--quiet` / `--verbose`.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// The configuration layer supplied by flags.
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            pipeline: self.pipeline.clone(),
            region: self.region.clone(),
            from_stage: self.from_stage.clone(),
            to_stage: self.to_stage.clone(),
        }
    }
}
