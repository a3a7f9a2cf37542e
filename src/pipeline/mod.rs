//! pipeline
//!
//! Abstraction for the deployment pipeline service.
//!
//! # Architecture
//!
//! The `PipelineService` trait exposes the two read operations the
//! changelog needs. [`lookup`] builds on it to resolve the revisions
//! deployed at the configured stages.
//!
//! # Modules
//!
//! - `traits`: Core `PipelineService` trait and response types
//! - [`aws`]: AWS CodePipeline implementation
//! - [`mock`]: In-memory implementation for deterministic testing
//! - [`lookup`]: Concurrent two-stage lookup

pub mod aws;
pub mod lookup;
pub mod mock;
mod traits;

pub use lookup::{fetch_stage_commit, fetch_stage_pair, LookupError};
pub use traits::*;
