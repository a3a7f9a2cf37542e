//! forge
//!
//! Abstraction for the source-control host.
//!
//! # Architecture
//!
//! The `Forge` trait defines the interface for interacting with the remote
//! hosting service that owns the target repository. The changelog flow only
//! needs three operations: reading a file, comparing two revisions and
//! creating a release.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;
