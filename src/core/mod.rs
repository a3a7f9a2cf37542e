//! core
//!
//! Core domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RepoRef, StageCommit, StagePair
//! - [`config`] - Configuration schema and layered resolution

pub mod config;
pub mod types;
