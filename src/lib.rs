//! gen-aws-changelog - changelogs between two AWS CodePipeline stages
//!
//! Given a GitHub repository and a pipeline, the tool looks up the source
//! revision deployed to two stages, asks GitHub for the commits between them
//! and prints them as a markdown changelog. Optionally the changelog is
//! published as a GitHub release tagged with the current date.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, runs the flow)
//! - [`core`] - Domain types and layered configuration
//! - [`pipeline`] - Abstraction over the deployment pipeline (AWS CodePipeline)
//! - [`forge`] - Abstraction for the remote code host (GitHub)
//! - [`changelog`] - Commit comparison and markdown rendering
//! - [`release`] - Release tag naming and publication
//! - [`auth`] - GitHub token resolution
//! - [`telemetry`] - Tracing subscriber setup
//! - [`ui`] - User-facing output

pub mod auth;
pub mod changelog;
pub mod cli;
pub mod core;
pub mod forge;
pub mod pipeline;
pub mod release;
pub mod telemetry;
pub mod ui;
