//! Runtime-tunable placement parameters.
//!
//! Collects every overridable value into a single [`PlacementParams`]
//! resource. Hosts can ship a JSON file with partial overrides; missing
//! fields keep their defaults from [`crate::config`].

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MAX_SNAP_DISTANCE, DEFAULT_RAIL_TOP_Y, DEFAULT_SAMPLES_PER_EDGE};
use crate::orientation::ForwardAxisOffsets;
use crate::scale_classifier::{LengthRanges, ScalePolicy};

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors raised while loading parameters or layouts from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read.
    Io(std::io::Error),
    /// JSON was malformed or had the wrong shape.
    Parse(serde_json::Error),
    /// JSON parsed but a value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "Parse error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// PlacementParams
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementParams {
    /// Placements farther than this from the track centerline are rejected.
    pub max_snap_distance: f32,
    /// Parametric intervals sampled per edge by the nearest-edge search.
    pub samples_per_edge: usize,
    /// Height of the rail running surface that models are rested on.
    pub rail_top_y: f32,
    /// Additive vertical correction applied after alignment.
    pub fine_tune_offset: f32,
    pub length_ranges: LengthRanges,
    pub forward_axis_offsets: ForwardAxisOffsets,
    pub scale_policy: ScalePolicy,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            max_snap_distance: DEFAULT_MAX_SNAP_DISTANCE,
            samples_per_edge: DEFAULT_SAMPLES_PER_EDGE,
            rail_top_y: DEFAULT_RAIL_TOP_Y,
            fine_tune_offset: 0.0,
            length_ranges: LengthRanges::default(),
            forward_axis_offsets: ForwardAxisOffsets::default(),
            scale_policy: ScalePolicy::default(),
        }
    }
}

impl PlacementParams {
    /// Parse overrides from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load overrides, logging a warning and using defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_json(path) {
            Ok(params) => params,
            Err(e) => {
                warn!(
                    "PlacementParams: failed to load {}, falling back to defaults: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_snap_distance.is_finite() || self.max_snap_distance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_snap_distance must be positive, got {}",
                self.max_snap_distance
            )));
        }
        if self.samples_per_edge == 0 {
            return Err(ConfigError::Invalid(
                "samples_per_edge must be at least 1".to_string(),
            ));
        }
        if !self.rail_top_y.is_finite() || !self.fine_tune_offset.is_finite() {
            return Err(ConfigError::Invalid(
                "rail_top_y and fine_tune_offset must be finite".to_string(),
            ));
        }
        self.length_ranges.validate().map_err(ConfigError::Invalid)?;
        self.forward_axis_offsets
            .validate()
            .map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        let params = PlacementParams::default();
        assert_eq!(params.max_snap_distance, 0.05);
        assert_eq!(params.samples_per_edge, 20);
        assert_eq!(params.rail_top_y, 0.958);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let params = PlacementParams::from_json_str(r#"{ "max_snap_distance": 0.1 }"#)
            .expect("valid overrides");
        assert_eq!(params.max_snap_distance, 0.1);
        assert_eq!(params.samples_per_edge, DEFAULT_SAMPLES_PER_EDGE);
        assert_eq!(params.scale_policy, ScalePolicy::LengthBands);
    }

    #[test]
    fn test_scale_policy_override() {
        let params = PlacementParams::from_json_str(r#"{ "scale_policy": "absolute_size" }"#)
            .expect("valid overrides");
        assert_eq!(params.scale_policy, ScalePolicy::AbsoluteSize);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = PlacementParams::from_json_str(r#"{ "max_snap_distance": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = PlacementParams::from_json_str(r#"{ "samples_per_edge": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = PlacementParams::from_json_str(
            r#"{ "length_ranges": { "wagon": { "min_mm": 150.0, "max_mm": 100.0 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got: {err}");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = PlacementParams::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(format!("{err}").contains("Parse error"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let params = PlacementParams::load_or_default("/nonexistent/placement.json");
        assert_eq!(params, PlacementParams::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PlacementParams::load_json("/nonexistent/placement.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
