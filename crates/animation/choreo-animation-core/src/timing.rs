//! Repeat policy and the wall-clock parameters of a single `perform` call.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// How many cycles an animation runs and whether alternate cycles run backwards.
///
/// `count == 0` repeats forever; `count == 1` runs once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepeatStyle {
    pub count: u32,
    pub autoreversing: bool,
}

impl RepeatStyle {
    /// Run a single forward cycle.
    pub const NONE: RepeatStyle = RepeatStyle {
        count: 1,
        autoreversing: false,
    };

    pub fn repeating(count: u32, autoreversing: bool) -> Self {
        Self {
            count,
            autoreversing,
        }
    }

    /// Repeat until cancelled.
    pub fn infinite(autoreversing: bool) -> Self {
        Self::repeating(0, autoreversing)
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.count == 0
    }

    /// Index of the last cycle, or `None` when repeating forever.
    #[inline]
    pub fn last_cycle(&self) -> Option<u64> {
        if self.is_infinite() {
            None
        } else {
            Some(u64::from(self.count) - 1)
        }
    }

    /// Whether the zero-based `cycle` runs from progress 0 to progress 1.
    #[inline]
    pub fn is_forward(&self, cycle: u64) -> bool {
        !self.autoreversing || cycle % 2 == 0
    }

    /// Relative timestamp at which the zero-based `cycle` ends.
    #[inline]
    pub fn cycle_endpoint(&self, cycle: u64) -> f64 {
        if self.is_forward(cycle) {
            1.0
        } else {
            0.0
        }
    }
}

impl Default for RepeatStyle {
    fn default() -> Self {
        Self::NONE
    }
}

/// Delay, per-cycle duration and repeat policy handed to a driver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Seconds before the first frame renders.
    pub delay: f64,
    /// Seconds per cycle.
    pub duration: f64,
    pub repeat_style: RepeatStyle,
}

impl Timing {
    pub fn new(delay: f64, duration: f64, repeat_style: RepeatStyle) -> Result<Self, AnimationError> {
        AnimationError::check_timing("delay", delay)?;
        AnimationError::check_timing("duration", duration)?;
        Ok(Self {
            delay,
            duration,
            repeat_style,
        })
    }
}
