//! Core configuration for choreo-animation-core.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::timing::RepeatStyle;

/// Defaults applied to newly built animations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Implicit duration (seconds) of a new animation.
    pub default_duration: f64,
    /// Implicit repeat style of a new animation.
    pub default_repeat_style: RepeatStyle,
    /// Tolerance used when testing whether progress sits inside a child window
    /// or on a block boundary.
    pub boundary_epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration: 1.0,
            default_repeat_style: RepeatStyle::NONE,
            boundary_epsilon: 1e-9,
        }
    }
}

impl Config {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, AnimationError> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AnimationError> {
        if !self.default_duration.is_finite() || self.default_duration < 0.0 {
            return Err(AnimationError::InvalidConfig {
                reason: format!("default_duration must be >= 0, got {}", self.default_duration),
            });
        }
        if !self.boundary_epsilon.is_finite()
            || self.boundary_epsilon < 0.0
            || self.boundary_epsilon >= 0.5
        {
            return Err(AnimationError::InvalidConfig {
                reason: format!(
                    "boundary_epsilon must be in [0, 0.5), got {}",
                    self.boundary_epsilon
                ),
            });
        }
        Ok(())
    }
}
