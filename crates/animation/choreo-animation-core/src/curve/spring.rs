//! Damped-spring timing curve.
//!
//! Progress follows a unit-mass spring released from 0 toward 1 over the
//! normalized time range `[0, 1]`. A small linear correction makes the curve
//! land exactly on 1 at the end; underdamped springs overshoot before settling.

use serde::{Deserialize, Serialize};

use super::{crossings, AnimationCurve};

/// Ratio of the settled residual to the initial displacement at `t = 1`.
const SETTLE_FACTOR: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringCurve {
    /// `< 1` oscillates, `1` is critically damped, `> 1` is overdamped.
    pub damping_ratio: f64,
    /// Initial velocity in progress per animation duration.
    pub initial_velocity: f64,
    /// Natural angular frequency per animation duration; derived from the
    /// damping ratio when absent so the spring settles by the end.
    #[serde(default)]
    pub natural_frequency: Option<f64>,
}

impl SpringCurve {
    pub fn new(damping_ratio: f64, initial_velocity: f64) -> Self {
        Self {
            damping_ratio: damping_ratio.max(f64::EPSILON),
            initial_velocity,
            natural_frequency: None,
        }
    }

    pub fn with_natural_frequency(mut self, omega: f64) -> Self {
        self.natural_frequency = Some(omega);
        self
    }

    fn omega(&self) -> f64 {
        // A spring without a positive frequency never moves; derive one instead.
        if let Some(omega) = self.natural_frequency.filter(|w| w.is_finite() && *w > 0.0) {
            return omega;
        }
        let zeta = self.damping_ratio;
        SETTLE_FACTOR.ln() / slow_decay(zeta)
    }

    /// Uncorrected spring position at time `t`, starting at 0.
    fn position(&self, t: f64) -> f64 {
        let zeta = self.damping_ratio;
        let omega = self.omega();
        let v0 = self.initial_velocity;
        let deviation = if zeta < 1.0 {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let b = (v0 - zeta * omega) / damped;
            (-zeta * omega * t).exp() * (-(damped * t).cos() + b * (damped * t).sin())
        } else if zeta == 1.0 {
            let b = v0 - omega;
            (-omega * t).exp() * (-1.0 + b * t)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * slow_decay(zeta);
            let r2 = -omega * (zeta + root);
            let c2 = (v0 + r1) / (r2 - r1);
            let c1 = -1.0 - c2;
            c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
        };
        1.0 + deviation
    }

    fn corrected(&self, t: f64) -> f64 {
        self.position(t) + t * (1.0 - self.position(1.0))
    }
}

/// Slowest decay rate per unit omega. The overdamped root is written as
/// `1 / (zeta + sqrt(zeta^2 - 1))` so large ratios do not cancel to zero.
fn slow_decay(zeta: f64) -> f64 {
    if zeta < 1.0 {
        zeta
    } else {
        1.0 / (zeta + (zeta * zeta - 1.0).sqrt())
    }
}

impl Default for SpringCurve {
    fn default() -> Self {
        Self::new(0.5, 0.0)
    }
}

impl AnimationCurve for SpringCurve {
    fn adjusted_progress(&self, raw: f64) -> f64 {
        if raw <= 0.0 {
            return 0.0;
        }
        if raw >= 1.0 {
            return 1.0;
        }
        let adjusted = self.corrected(raw);
        if adjusted.is_finite() {
            adjusted
        } else {
            raw
        }
    }

    fn raw_progress(&self, adjusted: f64) -> Vec<f64> {
        crossings(|t| self.adjusted_progress(t), adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn endpoints_are_exact() {
        for zeta in [0.3, 1.0, 2.0] {
            let c = SpringCurve::new(zeta, 0.0);
            assert_eq!(c.adjusted_progress(0.0), 0.0);
            assert_eq!(c.adjusted_progress(1.0), 1.0);
            assert_abs_diff_eq!(c.corrected(0.0), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn underdamped_spring_overshoots() {
        let c = SpringCurve::new(0.3, 0.0);
        let peak = (1..100)
            .map(|i| c.adjusted_progress(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.2);
        // Crosses 1 on the way up, back down, and so on before ending there.
        assert!(c.raw_progress(1.0).len() >= 3);
    }

    #[test]
    fn overdamped_spring_is_monotonic() {
        let c = SpringCurve::new(2.0, 0.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let p = c.adjusted_progress(i as f64 / 100.0);
            assert!(p >= prev);
            prev = p;
        }
        assert_eq!(c.raw_progress(0.5).len(), 1);
    }

    #[test]
    fn zero_frequency_falls_back_to_the_derived_one() {
        let c = SpringCurve::new(0.5, 0.0).with_natural_frequency(0.0);
        assert_eq!(c.omega(), SpringCurve::new(0.5, 0.0).omega());
        for i in 0..=20 {
            assert!(c.adjusted_progress(i as f64 / 20.0).is_finite());
        }
    }

    #[test]
    fn very_stiff_damping_stays_finite() {
        let c = SpringCurve::new(1e8, 0.0);
        assert!(c.omega().is_finite());
        let mut prev = 0.0;
        for i in 1..=20 {
            let p = c.adjusted_progress(i as f64 / 20.0);
            assert!(p.is_finite());
            assert!(p >= prev);
            prev = p;
        }
    }

    #[test]
    fn non_finite_positions_fall_back_to_raw() {
        let c = SpringCurve {
            damping_ratio: f64::NAN,
            initial_velocity: 0.0,
            natural_frequency: None,
        };
        assert_eq!(c.adjusted_progress(0.25), 0.25);
    }
}
