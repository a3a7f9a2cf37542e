//! pipeline::traits
//!
//! Interface to the deployment pipeline service.
//!
//! Only the two read operations the changelog needs are modeled: the
//! current state of a pipeline and the detail of one execution.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from pipeline service operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The named pipeline does not exist in the configured region.
    #[error("pipeline not found: {0}")]
    PipelineNotFound(String),

    /// The execution id is unknown to the pipeline.
    #[error("pipeline execution not found: {0}")]
    ExecutionNotFound(String),

    /// Any other failure reported by the service or the transport.
    #[error("pipeline service error: {0}")]
    Service(String),
}

/// Current state of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    pub stages: Vec<StageState>,
}

impl PipelineState {
    /// Find a stage by exact name.
    pub fn stage(&self, name: &str) -> Option<&StageState> {
        self.stages.iter().find(|s| s.name == name)
    }
}

/// State of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageState {
    pub name: String,
    /// Id of the pipeline execution that last ran this stage.
    pub latest_execution_id: Option<String>,
}

/// Detail of one pipeline execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineExecution {
    pub artifact_revisions: Vec<ArtifactRevision>,
}

/// Source revision of an artifact consumed by an execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactRevision {
    pub name: Option<String>,
    pub revision_id: Option<String>,
    pub revision_summary: Option<String>,
    pub revision_url: Option<String>,
}

/// Read access to a pipeline service.
///
/// Implementations must be `Send + Sync`; the stage lookup issues two
/// requests concurrently against the same service.
#[async_trait]
pub trait PipelineService: Send + Sync {
    /// Get the service name (e.g., "codepipeline").
    fn name(&self) -> &'static str;

    /// Get the current state of every stage of `pipeline`.
    ///
    /// # Errors
    ///
    /// - `PipelineNotFound` if the pipeline doesn't exist
    async fn get_pipeline_state(&self, pipeline: &str) -> Result<PipelineState, PipelineError>;

    /// Get the detail of one execution of `pipeline`.
    ///
    /// # Errors
    ///
    /// - `ExecutionNotFound` if the execution id is unknown
    async fn get_pipeline_execution(
        &self,
        pipeline: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution, PipelineError>;
}
