//! Scene building configuration

use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::path::DEFAULT_EPSILON;

/// Scene building configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Viewport width used for camera framing
    pub viewport_width: f64,

    /// Viewport height used for camera framing
    pub viewport_height: f64,

    /// Fraction of the viewport the scene envelope fills
    pub frame_fill: f64,

    /// Start the transform stack with a vertical flip (y-up output)
    pub flip_y: bool,

    /// Tolerance for dropping a duplicate closing vertex
    pub epsilon: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            frame_fill: 0.8,
            flip_y: false,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl SceneConfig {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SceneError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<std::path::Path>) -> SceneResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> SceneResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SceneError::config(e.to_string()))
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(SceneError::config(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if !(self.frame_fill > 0.0) {
            return Err(SceneError::config(format!(
                "frame_fill must be positive, got {}",
                self.frame_fill
            )));
        }
        if !(self.epsilon >= 0.0) {
            return Err(SceneError::config(format!(
                "epsilon must not be negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}
