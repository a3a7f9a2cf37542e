//! pipeline::mock
//!
//! In-memory pipeline service for deterministic testing.
//!
//! # Example
//!
//! ```
//! use gen_aws_changelog::pipeline::mock::MockPipeline;
//! use gen_aws_changelog::pipeline::PipelineService;
//!
//! # tokio_test::block_on(async {
//! let service = MockPipeline::new("widgets")
//!     .with_stage("DeployStaging", Some("exec-1"))
//!     .with_revision("exec-1", "aaa1111");
//!
//! let state = service.get_pipeline_state("widgets").await.unwrap();
//! assert_eq!(state.stages.len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{
    ArtifactRevision, PipelineError, PipelineExecution, PipelineService, PipelineState,
    StageState,
};

/// Mock pipeline service for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockPipeline {
    pipeline: String,
    inner: Arc<Mutex<MockPipelineInner>>,
}

#[derive(Debug, Default)]
struct MockPipelineInner {
    stages: Vec<StageState>,
    executions: HashMap<String, PipelineExecution>,
    fail_on: Option<PipelineFailOn>,
    calls: Vec<MockCall>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum PipelineFailOn {
    /// Fail get_pipeline_state with the given error.
    GetPipelineState(PipelineError),
    /// Fail get_pipeline_execution for one execution id.
    GetPipelineExecution {
        execution_id: String,
        error: PipelineError,
    },
}

/// Recorded call for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetPipelineState { pipeline: String },
    GetPipelineExecution { pipeline: String, execution_id: String },
}

impl MockPipeline {
    /// Create an empty pipeline named `pipeline`.
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            inner: Arc::new(Mutex::new(MockPipelineInner::default())),
        }
    }

    /// Add a stage, optionally with a latest execution.
    pub fn with_stage(self, name: impl Into<String>, latest_execution_id: Option<&str>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.stages.push(StageState {
                name: name.into(),
                latest_execution_id: latest_execution_id.map(String::from),
            });
        }
        self
    }

    /// Register an execution whose first artifact has `revision_id`.
    pub fn with_revision(self, execution_id: impl Into<String>, revision_id: &str) -> Self {
        self.with_execution(
            execution_id,
            PipelineExecution {
                artifact_revisions: vec![ArtifactRevision {
                    name: Some("SourceArtifact".into()),
                    revision_id: Some(revision_id.to_string()),
                    revision_summary: None,
                    revision_url: None,
                }],
            },
        )
    }

    /// Register an execution with arbitrary detail.
    pub fn with_execution(
        self,
        execution_id: impl Into<String>,
        execution: PipelineExecution,
    ) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.executions.insert(execution_id.into(), execution);
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: PipelineFailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }
}

#[async_trait]
impl PipelineService for MockPipeline {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_pipeline_state(&self, pipeline: &str) -> Result<PipelineState, PipelineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(MockCall::GetPipelineState {
            pipeline: pipeline.to_string(),
        });

        if let Some(PipelineFailOn::GetPipelineState(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        if pipeline != self.pipeline {
            return Err(PipelineError::PipelineNotFound(pipeline.to_string()));
        }

        Ok(PipelineState {
            stages: inner.stages.clone(),
        })
    }

    async fn get_pipeline_execution(
        &self,
        pipeline: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution, PipelineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(MockCall::GetPipelineExecution {
            pipeline: pipeline.to_string(),
            execution_id: execution_id.to_string(),
        });

        if let Some(PipelineFailOn::GetPipelineExecution {
            execution_id: failing,
            error,
        }) = &inner.fail_on
        {
            if failing == execution_id {
                return Err(error.clone());
            }
        }
        if pipeline != self.pipeline {
            return Err(PipelineError::PipelineNotFound(pipeline.to_string()));
        }

        inner
            .executions
            .get(execution_id)
            .cloned()
            .ok_or_else(|| PipelineError::ExecutionNotFound(execution_id.to_string()))
    }
}
