//! Error types for animation construction and configuration.
//!
//! Playback itself never fails: interpolation and curve fallbacks are local.
//! Errors only surface where a caller hands the engine malformed structure
//! or timing.

/// Errors raised while building animations or loading configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    /// A child animation must start inside `[0, 1)` of its parent's timeline.
    #[error("Child start {start} must lie in [0, 1)")]
    InvalidChildStart { start: f64 },

    /// A child animation's duration must fit between its start and the end of the parent.
    #[error("Child duration {duration} must lie in (0, 1 - {start}]")]
    InvalidChildDuration { start: f64, duration: f64 },

    /// Delay or duration handed to `perform` is negative or not finite.
    #[error("Invalid timing parameter {name}: {value}")]
    InvalidTiming { name: &'static str, value: f64 },

    /// Configuration could not be parsed or holds out-of-range values.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl AnimationError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidChildStart { .. } | Self::InvalidChildDuration { .. } => "structure",
            Self::InvalidTiming { .. } => "timing",
            Self::InvalidConfig { .. } => "config",
        }
    }

    /// Validate a child's placement on its parent's timeline.
    pub(crate) fn check_child_range(start: f64, duration: f64) -> Result<(), AnimationError> {
        if !start.is_finite() || !(0.0..1.0).contains(&start) {
            return Err(Self::InvalidChildStart { start });
        }
        if !duration.is_finite() || duration <= 0.0 || start + duration > 1.0 + f64::EPSILON {
            return Err(Self::InvalidChildDuration { start, duration });
        }
        Ok(())
    }

    pub(crate) fn check_timing(name: &'static str, value: f64) -> Result<(), AnimationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(Self::InvalidTiming { name, value });
        }
        Ok(())
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}
