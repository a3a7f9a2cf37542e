//! Integration tests for the changelog flow.
//!
//! These tests drive `cli::generate::execute` with `MockPipeline` and
//! `MockForge`, so the whole flow after configuration runs without network
//! access.

use gen_aws_changelog::cli::generate::{
    execute, render_outcome, GenerateOptions, Outcome, ReleaseOutcome,
};
use gen_aws_changelog::core::config::{Config, ConfigLayers, PartialConfig};
use gen_aws_changelog::core::types::RepoRef;
use gen_aws_changelog::forge::mock::{FailOn, MockForge, MockOperation};
use gen_aws_changelog::forge::{CommitRecord, ForgeError};
use gen_aws_changelog::pipeline::mock::MockPipeline;
use gen_aws_changelog::ui::output::Verbosity;

fn repo() -> RepoRef {
    RepoRef::parse("acme/widgets").unwrap()
}

fn config() -> Config {
    Config {
        pipeline: "widgets".into(),
        region: "eu-central-1".into(),
        from_stage: "DeployStaging".into(),
        to_stage: "DeployProduction".into(),
    }
}

fn pipeline() -> MockPipeline {
    MockPipeline::new("widgets")
        .with_stage("Source", Some("exec-0"))
        .with_stage("DeployStaging", Some("exec-2"))
        .with_stage("DeployProduction", Some("exec-1"))
        .with_revision("exec-2", "aaa1111")
        .with_revision("exec-1", "bbb2222")
}

fn options(release_tag: Option<&str>) -> GenerateOptions {
    GenerateOptions {
        release_tag: release_tag.map(String::from),
        verbosity: Verbosity::Quiet,
    }
}

mod execute_tests {
    use super::*;

    #[tokio::test]
    async fn changelog_between_two_stages() {
        let forge = MockForge::new(repo()).with_comparison(
            "bbb2222",
            "aaa1111",
            vec![CommitRecord::new("ccc3333", "Add feature")],
        );

        let outcome = execute(&forge, &pipeline(), &config(), &options(None))
            .await
            .unwrap();

        match outcome {
            Outcome::Changelog {
                title,
                entries,
                release,
                stages,
            } => {
                assert_eq!(entries, vec!["- ccc3333 Add feature".to_string()]);
                assert!(title.contains("DeployStaging (aaa1111)"));
                assert!(title.contains("DeployProduction (bbb2222)"));
                assert!(release.is_none());
                assert_eq!(stages.from_stage.revision_id.as_deref(), Some("aaa1111"));
                assert_eq!(stages.to_stage.revision_id.as_deref(), Some("bbb2222"));
            }
            other => panic!("expected changelog, got {:?}", other),
        }

        // The older (to) revision is the comparison base
        assert_eq!(
            forge.operations(),
            vec![MockOperation::CompareCommits {
                base: "bbb2222".into(),
                head: "aaa1111".into(),
            }]
        );
    }

    #[tokio::test]
    async fn identical_revisions_report_no_changes() {
        let forge = MockForge::new(repo()).with_comparison("bbb2222", "aaa1111", vec![]);

        let outcome = execute(&forge, &pipeline(), &config(), &options(Some("release-1-1-2026")))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::NoChanges { .. }));
        assert!(forge.releases().is_empty());
    }

    #[tokio::test]
    async fn publishes_release_when_tag_requested() {
        let forge = MockForge::new(repo()).with_comparison(
            "bbb2222",
            "aaa1111",
            vec![
                CommitRecord::new("ccc3333444", "Add feature"),
                CommitRecord::new("ddd4444555", "Fix login redirect\n\nDetails"),
            ],
        );

        let outcome = execute(&forge, &pipeline(), &config(), &options(Some("release-7-3-2026")))
            .await
            .unwrap();

        let Outcome::Changelog { release, title, .. } = outcome else {
            panic!("expected changelog");
        };
        match release {
            Some(ReleaseOutcome::Created { tag, url }) => {
                assert_eq!(tag, "release-7-3-2026");
                assert_eq!(
                    url,
                    "https://github.com/acme/widgets/releases/tag/release-7-3-2026"
                );
            }
            other => panic!("expected created release, got {:?}", other),
        }

        let releases = forge.releases();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].title, title);
        assert_eq!(
            releases[0].body,
            "- ccc3333 Add feature\n- ddd4444 Fix login redirect"
        );
    }

    #[tokio::test]
    async fn release_failure_keeps_changelog() {
        let forge = MockForge::new(repo())
            .with_comparison(
                "bbb2222",
                "aaa1111",
                vec![CommitRecord::new("ccc3333", "Add feature")],
            )
            .fail_on(FailOn::CreateRelease(ForgeError::AuthFailed(
                "Permission denied".into(),
            )));

        let outcome = execute(&forge, &pipeline(), &config(), &options(Some("release-1-1-2026")))
            .await
            .unwrap();

        let Outcome::Changelog {
            entries, release, ..
        } = outcome
        else {
            panic!("expected changelog");
        };
        assert_eq!(entries, vec!["- ccc3333 Add feature".to_string()]);
        assert!(matches!(release, Some(ReleaseOutcome::Failed { .. })));
    }

    #[tokio::test]
    async fn missing_stage_fails() {
        let forge = MockForge::new(repo());
        let config = Config {
            to_stage: "DeployQa".into(),
            ..config()
        };

        let err = execute(&forge, &pipeline(), &config, &options(None))
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("No stage information found"));
        assert!(message.contains("DeployQa"));
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn stage_without_execution_fails() {
        let forge = MockForge::new(repo());
        let pipeline = MockPipeline::new("widgets")
            .with_stage("DeployStaging", Some("exec-2"))
            .with_stage("DeployProduction", None)
            .with_revision("exec-2", "aaa1111");

        let result = execute(&forge, &pipeline, &config(), &options(None)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn compare_failure_is_an_error() {
        let forge = MockForge::new(repo())
            .fail_on(FailOn::CompareCommits(ForgeError::NotFound("No common ancestor".into())));

        let err = execute(&forge, &pipeline(), &config(), &options(None))
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("No common ancestor"));
    }
}

mod render_tests {
    use super::*;

    #[tokio::test]
    async fn changelog_is_printed_under_stage_header() {
        let forge = MockForge::new(repo()).with_comparison(
            "bbb2222",
            "aaa1111",
            vec![CommitRecord::new("ccc3333", "Add feature")],
        );

        let outcome = execute(&forge, &pipeline(), &config(), &options(None))
            .await
            .unwrap();
        let rendered = render_outcome(&outcome);

        assert_eq!(
            rendered.stdout.as_deref(),
            Some(
                "\n### Changes for release DeployStaging (aaa1111) to DeployProduction (bbb2222):\n\n- ccc3333 Add feature\n"
            )
        );
        assert!(rendered.warnings.is_empty());
        assert!(rendered.errors.is_empty());
    }

    #[tokio::test]
    async fn no_changes_is_a_warning_without_output() {
        let forge = MockForge::new(repo()).with_comparison("bbb2222", "aaa1111", vec![]);

        let outcome = execute(&forge, &pipeline(), &config(), &options(None))
            .await
            .unwrap();
        let rendered = render_outcome(&outcome);

        assert_eq!(rendered.stdout, None);
        assert_eq!(
            rendered.warnings,
            vec!["No changes found between the specified stages.".to_string()]
        );
        assert!(rendered.errors.is_empty());
    }

    #[tokio::test]
    async fn failed_release_is_always_visible() {
        let forge = MockForge::new(repo())
            .with_comparison(
                "bbb2222",
                "aaa1111",
                vec![CommitRecord::new("ccc3333", "Add feature")],
            )
            .fail_on(FailOn::CreateRelease(ForgeError::RateLimited));

        let outcome = execute(&forge, &pipeline(), &config(), &options(Some("release-1-1-2026")))
            .await
            .unwrap();
        let rendered = render_outcome(&outcome);

        assert_eq!(
            rendered.errors,
            vec!["failed to create release release-1-1-2026: rate limited".to_string()]
        );
        assert!(rendered.stdout.unwrap().contains("- ccc3333 Add feature"));
    }

    #[tokio::test]
    async fn created_release_is_informational() {
        let forge = MockForge::new(repo()).with_comparison(
            "bbb2222",
            "aaa1111",
            vec![CommitRecord::new("ccc3333", "Add feature")],
        );

        let outcome = execute(&forge, &pipeline(), &config(), &options(Some("release-1-1-2026")))
            .await
            .unwrap();
        let rendered = render_outcome(&outcome);

        assert_eq!(rendered.info.len(), 1);
        assert!(rendered.info[0].contains("releases/tag/release-1-1-2026"));
        assert!(rendered.errors.is_empty());
    }
}

mod configuration_tests {
    use super::*;

    const REMOTE: &str = r#"{
        "pipeline": "widgets",
        "fromStage": "DeployStaging",
        "toStage": "DeployProduction",
        "region": "us-east-1"
    }"#;

    #[tokio::test]
    async fn remote_file_drives_the_run() {
        let forge = MockForge::new(repo())
            .with_file(".aws-changelog.json", REMOTE)
            .with_comparison(
                "bbb2222",
                "aaa1111",
                vec![CommitRecord::new("ccc3333", "Add feature")],
            );

        let layers = ConfigLayers::collect(Some(&forge), PartialConfig::default()).await;
        assert!(layers.warnings().is_empty());
        let config = layers.resolve().unwrap();
        assert_eq!(config.region, "us-east-1");

        let outcome = execute(&forge, &pipeline(), &config, &options(None))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Changelog { .. }));
    }

    #[tokio::test]
    async fn command_line_overrides_remote_stage() {
        let forge = MockForge::new(repo()).with_file(".aws-changelog.json", REMOTE);
        let cli = PartialConfig {
            to_stage: Some("Source".into()),
            ..PartialConfig::default()
        };

        let config = ConfigLayers::collect(Some(&forge), cli)
            .await
            .resolve()
            .unwrap();

        assert_eq!(config.from_stage, "DeployStaging");
        assert_eq!(config.to_stage, "Source");
    }

    #[tokio::test]
    async fn invalid_remote_file_falls_back_with_warning() {
        let forge = MockForge::new(repo()).with_file(".aws-changelog.json", "{ not json");
        let cli = PartialConfig {
            pipeline: Some("widgets".into()),
            from_stage: Some("DeployStaging".into()),
            to_stage: Some("DeployProduction".into()),
            region: None,
        };

        let layers = ConfigLayers::collect(Some(&forge), cli).await;

        assert_eq!(layers.warnings().len(), 1);
        assert!(layers.warnings()[0].message.contains("Ignoring"));
        assert_eq!(layers.resolve().unwrap(), config());
    }
}
