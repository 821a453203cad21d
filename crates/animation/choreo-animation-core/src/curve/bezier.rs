//! Cubic Bezier timing curves with endpoints fixed at (0, 0) and (1, 1).

use serde::{Deserialize, Serialize};

use super::{crossings, AnimationCurve};

const NEWTON_STEPS: usize = 8;
const SOLVE_EPSILON: f64 = 1e-12;

/// Control points `(x1, y1)` and `(x2, y2)`. `x1`/`x2` are expected in `[0, 1]`
/// so that x is monotonic; `y` values may leave that range to overshoot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicBezierCurve {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezierCurve {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    pub fn ease_in() -> Self {
        Self::new(0.42, 0.0, 1.0, 1.0)
    }

    pub fn ease_out() -> Self {
        Self::new(0.0, 0.0, 0.58, 1.0)
    }

    pub fn ease_in_ease_out() -> Self {
        Self::new(0.42, 0.0, 0.58, 1.0)
    }

    fn sample(p1: f64, p2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn sample_derivative(p1: f64, p2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    fn x(&self, t: f64) -> f64 {
        Self::sample(self.x1, self.x2, t)
    }

    fn y(&self, t: f64) -> f64 {
        Self::sample(self.y1, self.y2, t)
    }

    /// Parameter `t` with `x(t) == x`; Newton first, bisection if it stalls.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_STEPS {
            let err = self.x(t) - x;
            if err.abs() < SOLVE_EPSILON {
                return t;
            }
            let d = Self::sample_derivative(self.x1, self.x2, t);
            if d.abs() < 1e-9 {
                break;
            }
            t -= err / d;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        while lo < hi {
            let err = self.x(t) - x;
            if err.abs() < SOLVE_EPSILON {
                break;
            }
            if err > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            let next = 0.5 * (lo + hi);
            if next == t {
                break;
            }
            t = next;
        }
        t
    }
}

impl AnimationCurve for CubicBezierCurve {
    fn adjusted_progress(&self, raw: f64) -> f64 {
        if raw <= 0.0 {
            return 0.0;
        }
        if raw >= 1.0 {
            return 1.0;
        }
        self.y(self.solve_t(raw))
    }

    fn raw_progress(&self, adjusted: f64) -> Vec<f64> {
        let mut raws: Vec<f64> = crossings(|t| self.y(t), adjusted)
            .into_iter()
            .map(|t| self.x(t).clamp(0.0, 1.0))
            .collect();
        raws.dedup();
        raws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_control_points_are_identity() {
        let c = CubicBezierCurve::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for raw in [0.1, 0.25, 0.5, 0.9] {
            assert_abs_diff_eq!(c.adjusted_progress(raw), raw, epsilon = 1e-9);
        }
    }

    #[test]
    fn ease_in_ease_out_is_symmetric() {
        let c = CubicBezierCurve::ease_in_ease_out();
        assert_abs_diff_eq!(c.adjusted_progress(0.5), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(
            c.adjusted_progress(0.2) + c.adjusted_progress(0.8),
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn inverse_recovers_raw_progress() {
        let c = CubicBezierCurve::ease_in();
        let raw = 0.63;
        let roots = c.raw_progress(c.adjusted_progress(raw));
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], raw, epsilon = 1e-9);
    }

    #[test]
    fn overshooting_curve_reaches_one_twice() {
        let c = CubicBezierCurve::new(0.3, 0.0, 0.5, 1.6);
        let roots = c.raw_progress(1.0);
        assert_eq!(roots.len(), 2);
        assert!(roots[0] < 1.0);
        assert_eq!(roots[1], 1.0);
    }
}
