//! core::config
//!
//! Configuration schema and layered resolution.
//!
//! # Overview
//!
//! A run is configured from three layers, combined left to right:
//! 1. Built-in defaults (all fields unset)
//! 2. Remote `.aws-changelog.json` in the target repository
//! 3. CLI flags
//!
//! A field from a later layer wins when it is present and non-empty. The
//! merged result is validated once; `region` falls back to
//! [`DEFAULT_REGION`].
//!
//! The remote layer never fails a run. A missing, unreadable or invalid
//! file contributes nothing and is reported as a [`ConfigWarning`].
//!
//! # Example
//!
//! ```
//! use gen_aws_changelog::core::config::{ConfigLayers, ConfigSource, PartialConfig};
//!
//! let mut layers = ConfigLayers::new();
//! layers.push(ConfigSource::RemoteFile, PartialConfig {
//!     pipeline: Some("widgets".into()),
//!     from_stage: Some("DeployStaging".into()),
//!     to_stage: Some("DeployProduction".into()),
//!     ..Default::default()
//! });
//! layers.push(ConfigSource::CommandLine, PartialConfig {
//!     pipeline: Some("widgets-v2".into()),
//!     ..Default::default()
//! });
//!
//! let config = layers.resolve().unwrap();
//! assert_eq!(config.pipeline, "widgets-v2");
//! assert_eq!(config.region, "eu-central-1");
//! ```

pub mod schema;

pub use schema::{Config, PartialConfig, DEFAULT_REGION, REMOTE_CONFIG_PATH};

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::forge::Forge;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config '{source_name}': {message}")]
    ParseError {
        source_name: String,
        message: String,
    },

    #[error("invalid configuration: missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Where a configuration layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    RemoteFile,
    CommandLine,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => write!(f, "defaults"),
            ConfigSource::RemoteFile => write!(f, "{}", REMOTE_CONFIG_PATH),
            ConfigSource::CommandLine => write!(f, "command line"),
        }
    }
}

/// A partial configuration tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    pub source: ConfigSource,
    pub values: PartialConfig,
}

/// Warnings generated while collecting layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
}

/// Ordered configuration layers, lowest precedence first.
#[derive(Debug, Clone)]
pub struct ConfigLayers {
    layers: Vec<ConfigLayer>,
    warnings: Vec<ConfigWarning>,
}

impl Default for ConfigLayers {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLayers {
    /// Start with the built-in defaults layer.
    pub fn new() -> Self {
        Self {
            layers: vec![ConfigLayer {
                source: ConfigSource::Defaults,
                values: PartialConfig::default(),
            }],
            warnings: Vec::new(),
        }
    }

    /// Collect every layer for a run.
    ///
    /// When `forge` is `None` (`--noGit`), the remote file is not fetched.
    pub async fn collect(forge: Option<&dyn Forge>, cli: PartialConfig) -> Self {
        let mut layers = Self::new();

        if let Some(forge) = forge {
            if let Some(remote) = layers.fetch_remote(forge).await {
                layers.push(ConfigSource::RemoteFile, remote);
            }
        }

        layers.push(ConfigSource::CommandLine, cli);
        layers
    }

    /// Fetch and parse the remote file, recording a warning on any problem.
    async fn fetch_remote(&mut self, forge: &dyn Forge) -> Option<PartialConfig> {
        debug!(forge = forge.name(), repo = %forge.repo_ref(), "fetching {}", REMOTE_CONFIG_PATH);
        let contents = match forge.get_file(REMOTE_CONFIG_PATH).await {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                self.warn(format!(
                    "No {} found in repository {}. Using default configuration.",
                    REMOTE_CONFIG_PATH,
                    forge.repo_ref()
                ));
                return None;
            }
            Err(e) => {
                self.warn(format!(
                    "Error fetching {} from repository {}: {}",
                    REMOTE_CONFIG_PATH,
                    forge.repo_ref(),
                    e
                ));
                return None;
            }
        };

        match PartialConfig::from_json(REMOTE_CONFIG_PATH, &contents) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                self.warn(format!(
                    "Ignoring {} in repository {}: {}",
                    REMOTE_CONFIG_PATH,
                    forge.repo_ref(),
                    e
                ));
                None
            }
        }
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(ConfigWarning { message });
    }

    /// Append a layer with higher precedence than every existing one.
    pub fn push(&mut self, source: ConfigSource, values: PartialConfig) {
        debug!(%source, ?values, "config layer");
        self.layers.push(ConfigLayer { source, values });
    }

    /// The layers in precedence order.
    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }

    /// Warnings recorded while collecting layers.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Fold all layers left to right.
    pub fn merged(&self) -> PartialConfig {
        self.layers
            .iter()
            .fold(PartialConfig::default(), |acc, layer| {
                acc.overlay(&layer.values)
            })
    }

    /// Merge and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFields` if `pipeline`, `fromStage` or
    /// `toStage` is unset after merging.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        self.merged().validate()
    }
}
