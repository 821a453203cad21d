//! Closed-form easing curves and their inverses.

use std::f64::consts::PI;

const ROOT_TOLERANCE: f64 = 1e-12;

/// `value` as a raw timestamp when it lies in `[0, 1]` (up to rounding).
pub(crate) fn unit_root(value: f64) -> Option<f64> {
    if (-ROOT_TOLERANCE..=1.0 + ROOT_TOLERANCE).contains(&value) {
        Some(value.clamp(0.0, 1.0))
    } else {
        None
    }
}

#[inline]
pub fn parabolic_ease_in(raw: f64) -> f64 {
    raw * raw
}

#[inline]
pub fn parabolic_ease_out(raw: f64) -> f64 {
    1.0 - (1.0 - raw) * (1.0 - raw)
}

#[inline]
pub fn sinusoidal_ease_in_ease_out(raw: f64) -> f64 {
    (1.0 - (PI * raw).cos()) / 2.0
}

pub(crate) fn parabolic_ease_in_inverse(adjusted: f64) -> Vec<f64> {
    unit_root(adjusted)
        .and_then(|a| unit_root(a.sqrt()))
        .into_iter()
        .collect()
}

pub(crate) fn parabolic_ease_out_inverse(adjusted: f64) -> Vec<f64> {
    unit_root(adjusted)
        .and_then(|a| unit_root(1.0 - (1.0 - a).sqrt()))
        .into_iter()
        .collect()
}

pub(crate) fn sinusoidal_ease_in_ease_out_inverse(adjusted: f64) -> Vec<f64> {
    unit_root(adjusted)
        .and_then(|a| unit_root((1.0 - 2.0 * a).acos() / PI))
        .into_iter()
        .collect()
}
