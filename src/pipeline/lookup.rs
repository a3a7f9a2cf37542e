//! pipeline::lookup
//!
//! Resolve the revisions deployed at the two configured stages.
//!
//! # Design
//!
//! Each stage is resolved independently (state → latest execution →
//! execution detail). The two lookups run concurrently and are joined: both
//! are driven to completion, then the first failure in `(from, to)` order
//! aborts the whole lookup. No partial pair is ever returned.

use thiserror::Error;
use tracing::debug;

use super::traits::{PipelineError, PipelineService};
use crate::core::config::Config;
use crate::core::types::{StageCommit, StagePair};

/// Errors from stage lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("configuration must include fromStage, toStage, pipeline and region")]
    IncompleteConfig,

    #[error("stage \"{stage}\" not found in pipeline \"{pipeline}\"")]
    StageNotFound { stage: String, pipeline: String },

    #[error("stage \"{stage}\" has no latest execution")]
    NoExecution { stage: String },

    #[error(transparent)]
    Service(#[from] PipelineError),
}

/// Look up both configured stages concurrently.
///
/// # Errors
///
/// - `IncompleteConfig` if any of the four config fields is empty
/// - `StageNotFound` / `NoExecution` / `Service` from either stage
pub async fn fetch_stage_pair(
    service: &dyn PipelineService,
    config: &Config,
) -> Result<StagePair, LookupError> {
    let required = [
        &config.from_stage,
        &config.to_stage,
        &config.pipeline,
        &config.region,
    ];
    if required.iter().any(|value| value.is_empty()) {
        return Err(LookupError::IncompleteConfig);
    }

    let (from_stage, to_stage) = tokio::join!(
        fetch_stage_commit(service, &config.pipeline, &config.from_stage),
        fetch_stage_commit(service, &config.pipeline, &config.to_stage),
    );

    Ok(StagePair {
        from_stage: from_stage?,
        to_stage: to_stage?,
    })
}

/// Resolve the revision deployed by the latest execution of one stage.
///
/// Revision fields are `None` when the execution carries no artifact
/// revision (e.g. a stage fed only by a manual approval).
pub async fn fetch_stage_commit(
    service: &dyn PipelineService,
    pipeline: &str,
    stage_name: &str,
) -> Result<StageCommit, LookupError> {
    let state = service.get_pipeline_state(pipeline).await?;

    let stage = state
        .stage(stage_name)
        .ok_or_else(|| LookupError::StageNotFound {
            stage: stage_name.to_string(),
            pipeline: pipeline.to_string(),
        })?;

    let execution_id = stage
        .latest_execution_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| LookupError::NoExecution {
            stage: stage_name.to_string(),
        })?;

    let execution = service
        .get_pipeline_execution(pipeline, &execution_id)
        .await?;

    let artifact = execution.artifact_revisions.into_iter().next();
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

    let commit = StageCommit {
        stage_name: stage_name.to_string(),
        pipeline_execution_id: execution_id,
        revision_id: non_empty(artifact.as_ref().and_then(|a| a.revision_id.clone())),
        revision_summary: non_empty(artifact.as_ref().and_then(|a| a.revision_summary.clone())),
        revision_url: non_empty(artifact.and_then(|a| a.revision_url)),
    };

    debug!(
        service = service.name(),
        stage = %commit.stage_name,
        execution = %commit.pipeline_execution_id,
        revision = ?commit.revision_id,
        "resolved stage"
    );

    Ok(commit)
}
