//! pipeline::aws
//!
//! AWS CodePipeline implementation of [`PipelineService`].
//!
//! Credentials are resolved by the default AWS provider chain
//! (environment, profile, SSO, instance metadata). The region always comes
//! from the resolved run configuration.

use async_trait::async_trait;
use aws_sdk_codepipeline::error::{DisplayErrorContext, SdkError};
use aws_sdk_codepipeline::operation::get_pipeline_execution::GetPipelineExecutionError;
use aws_sdk_codepipeline::operation::get_pipeline_state::GetPipelineStateError;
use aws_sdk_codepipeline::Client;
use tracing::debug;

use super::traits::{
    ArtifactRevision, PipelineError, PipelineExecution, PipelineService, PipelineState,
    StageState,
};

/// CodePipeline client bound to one region.
pub struct CodePipelineService {
    client: Client,
    region: String,
}

impl std::fmt::Debug for CodePipelineService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodePipelineService")
            .field("region", &self.region)
            .finish()
    }
}

impl CodePipelineService {
    /// Load the default AWS configuration for `region`.
    pub async fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
            region,
        }
    }

    /// The region requests are sent to.
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl PipelineService for CodePipelineService {
    fn name(&self) -> &'static str {
        "codepipeline"
    }

    async fn get_pipeline_state(&self, pipeline: &str) -> Result<PipelineState, PipelineError> {
        debug!(pipeline, region = %self.region, "GetPipelineState");

        let output = self
            .client
            .get_pipeline_state()
            .name(pipeline)
            .send()
            .await
            .map_err(|e| state_error(pipeline, e))?;

        let stages = output
            .stage_states()
            .iter()
            .map(|stage| StageState {
                name: stage.stage_name().unwrap_or_default().to_string(),
                latest_execution_id: stage
                    .latest_execution()
                    .map(|exec| exec.pipeline_execution_id().to_string())
                    .filter(|id| !id.is_empty()),
            })
            .collect();

        Ok(PipelineState { stages })
    }

    async fn get_pipeline_execution(
        &self,
        pipeline: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution, PipelineError> {
        debug!(pipeline, execution_id, "GetPipelineExecution");

        let output = self
            .client
            .get_pipeline_execution()
            .pipeline_name(pipeline)
            .pipeline_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| execution_error(pipeline, execution_id, e))?;

        let artifact_revisions = output
            .pipeline_execution()
            .map(|exec| {
                exec.artifact_revisions()
                    .iter()
                    .map(|rev| ArtifactRevision {
                        name: rev.name().map(String::from),
                        revision_id: rev.revision_id().map(String::from),
                        revision_summary: rev.revision_summary().map(String::from),
                        revision_url: rev.revision_url().map(String::from),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(PipelineExecution { artifact_revisions })
    }
}

fn state_error(pipeline: &str, err: SdkError<GetPipelineStateError>) -> PipelineError {
    let message = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        GetPipelineStateError::PipelineNotFoundException(_) => {
            PipelineError::PipelineNotFound(pipeline.to_string())
        }
        _ => PipelineError::Service(message),
    }
}

fn execution_error(
    pipeline: &str,
    execution_id: &str,
    err: SdkError<GetPipelineExecutionError>,
) -> PipelineError {
    let message = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        GetPipelineExecutionError::PipelineNotFoundException(_) => {
            PipelineError::PipelineNotFound(pipeline.to_string())
        }
        GetPipelineExecutionError::PipelineExecutionNotFoundException(_) => {
            PipelineError::ExecutionNotFound(execution_id.to_string())
        }
        _ => PipelineError::Service(message),
    }
}
