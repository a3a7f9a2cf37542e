//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Remote Config
//!
//! Located at `.aws-changelog.json` in the root of the target repository
//! and fetched from the source-control host.
//!
//! # Validation
//!
//! Partial layers accept any subset of fields. Only the merged result is
//! validated, producing a [`Config`] with every required field present.

use serde::{Deserialize, Deserializer};

use super::ConfigError;

/// Region used when no layer provides one.
pub const DEFAULT_REGION: &str = "eu-central-1";

/// Path of the configuration file inside the target repository.
pub const REMOTE_CONFIG_PATH: &str = ".aws-changelog.json";

/// One layer of configuration values.
///
/// Every field is optional. Unknown fields in the remote file are ignored,
/// but a known field holding a non-string value rejects the whole file.
///
/// # Example
///
/// ```json
/// {
///   "pipeline": "widgets-pipeline",
///   "region": "eu-west-1",
///   "fromStage": "DeployStaging",
///   "toStage": "DeployProduction"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialConfig {
    /// CodePipeline name
    #[serde(deserialize_with = "present_string")]
    pub pipeline: Option<String>,

    /// AWS region of the pipeline
    #[serde(deserialize_with = "present_string")]
    pub region: Option<String>,

    /// Stage holding the newer revision
    #[serde(deserialize_with = "present_string")]
    pub from_stage: Option<String>,

    /// Stage holding the older revision
    #[serde(deserialize_with = "present_string")]
    pub to_stage: Option<String>,
}

/// A field that is present must hold a string; `null` is rejected.
///
/// Absent fields never reach this function and fall back to `None`.
fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

impl PartialConfig {
    /// Parse the remote JSON document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for invalid JSON or schema violations.
    pub fn from_json(source: &str, contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::ParseError {
            source_name: source.to_string(),
            message: e.to_string(),
        })
    }

    /// Overlay `other` on top of `self`.
    ///
    /// A field from `other` wins only when it is present and non-empty.
    pub fn overlay(self, other: &PartialConfig) -> PartialConfig {
        fn pick(base: Option<String>, top: &Option<String>) -> Option<String> {
            match top {
                Some(value) if !value.is_empty() => Some(value.clone()),
                _ => base,
            }
        }

        PartialConfig {
            pipeline: pick(self.pipeline, &other.pipeline),
            region: pick(self.region, &other.region),
            from_stage: pick(self.from_stage, &other.from_stage),
            to_stage: pick(self.to_stage, &other.to_stage),
        }
    }

    /// Check if no field is set.
    pub fn is_empty(&self) -> bool {
        self.pipeline.is_none()
            && self.region.is_none()
            && self.from_stage.is_none()
            && self.to_stage.is_none()
    }

    /// Validate the merged values into a complete [`Config`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFields` naming every required field that
    /// is absent or empty.
    pub fn validate(self) -> Result<Config, ConfigError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let pipeline = non_empty(self.pipeline);
        let from_stage = non_empty(self.from_stage);
        let to_stage = non_empty(self.to_stage);

        let mut missing = Vec::new();
        if pipeline.is_none() {
            missing.push("pipeline");
        }
        if from_stage.is_none() {
            missing.push("fromStage");
        }
        if to_stage.is_none() {
            missing.push("toStage");
        }

        match (pipeline, from_stage, to_stage) {
            (Some(pipeline), Some(from_stage), Some(to_stage)) => Ok(Config {
                pipeline,
                region: non_empty(self.region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
                from_stage,
                to_stage,
            }),
            _ => Err(ConfigError::MissingFields(missing)),
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub pipeline: String,
    pub region: String,
    pub from_stage: String,
    pub to_stage: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(pipeline: &str, region: &str, from: &str, to: &str) -> PartialConfig {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        PartialConfig {
            pipeline: opt(pipeline),
            region: opt(region),
            from_stage: opt(from),
            to_stage: opt(to),
        }
    }

    #[test]
    fn parse_camel_case_fields() {
        let parsed = PartialConfig::from_json(
            REMOTE_CONFIG_PATH,
            r#"{"pipeline":"p","region":"us-east-1","fromStage":"A","toStage":"B"}"#,
        )
        .unwrap();
        assert_eq!(parsed, partial("p", "us-east-1", "A", "B"));
    }

    #[test]
    fn parse_ignores_unknown_fields() {
        let parsed =
            PartialConfig::from_json(REMOTE_CONFIG_PATH, r#"{"pipeline":"p","owner":"x"}"#)
                .unwrap();
        assert_eq!(parsed.pipeline.as_deref(), Some("p"));
    }

    #[test]
    fn parse_rejects_wrong_types() {
        let err = PartialConfig::from_json(REMOTE_CONFIG_PATH, r#"{"pipeline": 42}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn parse_rejects_null_fields() {
        let err = PartialConfig::from_json(
            REMOTE_CONFIG_PATH,
            r#"{"pipeline": null, "fromStage": "A", "toStage": "B"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn parse_treats_absent_fields_as_unset() {
        let parsed = PartialConfig::from_json(REMOTE_CONFIG_PATH, r#"{"fromStage": "A"}"#).unwrap();
        assert_eq!(parsed.from_stage.as_deref(), Some("A"));
        assert_eq!(parsed.pipeline, None);
        assert_eq!(parsed.region, None);
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(PartialConfig::from_json(REMOTE_CONFIG_PATH, "{ not json").is_err());
        assert!(PartialConfig::from_json(REMOTE_CONFIG_PATH, "[]").is_err());
    }

    #[test]
    fn overlay_prefers_non_empty_top() {
        let base = partial("base", "eu-west-1", "A", "B");
        let top = PartialConfig {
            pipeline: Some("top".into()),
            region: Some(String::new()),
            ..Default::default()
        };
        let merged = base.overlay(&top);
        assert_eq!(merged, partial("top", "eu-west-1", "A", "B"));
    }

    #[test]
    fn validate_applies_default_region() {
        let config = partial("p", "", "A", "B").validate().unwrap();
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn validate_lists_all_missing_fields() {
        let err = partial("", "", "", "B").validate().unwrap_err();
        match err {
            ConfigError::MissingFields(fields) => {
                assert_eq!(fields, vec!["pipeline", "fromStage"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_treats_empty_strings_as_missing() {
        let config = PartialConfig {
            pipeline: Some(String::new()),
            from_stage: Some("A".into()),
            to_stage: Some("B".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
