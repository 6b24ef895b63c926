//! Persistent configuration.
//!
//! The configuration is stored as JSON. Every field is optional and falls back to its default
//! value, so a partial file like `{"gestures": {"finger_separation": 0.08}}` is valid.

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::InvalidOption;
use crate::pipeline::{FaceOptions, HandOptions, PoseOptions};
use crate::thresholds::{ExpressionThresholds, HandThresholds};

/// Which tracking pipelines are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerPipelines {
    pub hand: bool,
    pub body: bool,
    pub face: bool,
}

impl Default for TrackerPipelines {
    fn default() -> Self {
        Self {
            hand: true,
            body: false,
            face: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker_pipelines: TrackerPipelines,
    pub hand_tracker_pipeline: HandOptions,
    pub body_tracker_pipeline: PoseOptions,
    pub face_tracker_pipeline: FaceOptions,
    pub gestures: HandThresholds,
    pub expressions: ExpressionThresholds,
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = Self::from_json(&json)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        log::debug!("loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write config file '{}'", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), InvalidOption> {
        self.hand_tracker_pipeline.validate()?;
        self.body_tracker_pipeline.validate()?;
        self.face_tracker_pipeline.validate()?;
        self.gestures.validate()?;
        self.expressions.validate()?;
        Ok(())
    }
}
