//! Animation curves: mappings from raw (uncurved) progress to adjusted progress.
//!
//! A curve is a stateless pair of functions. `adjusted_progress` is the forward
//! mapping used when rendering; `raw_progress` is its inverse and returns every
//! raw timestamp in `[0, 1]` that maps to the given adjusted progress, sorted
//! ascending (empty when the curve never reaches it).

pub mod bezier;
pub mod easing;
pub mod spring;

use std::fmt;
use std::rc::Rc;

pub use bezier::CubicBezierCurve;
pub use spring::SpringCurve;

/// Forward and inverse progress mapping.
pub trait AnimationCurve: fmt::Debug {
    fn adjusted_progress(&self, raw: f64) -> f64;
    fn raw_progress(&self, adjusted: f64) -> Vec<f64>;
}

/// Built-in curves plus user-supplied ones.
#[derive(Clone, Debug, Default)]
pub enum Curve {
    #[default]
    Linear,
    ParabolicEaseIn,
    ParabolicEaseOut,
    SinusoidalEaseInEaseOut,
    CubicBezier(CubicBezierCurve),
    Spring(SpringCurve),
    Custom(Rc<dyn AnimationCurve>),
}

impl Curve {
    pub fn custom(curve: impl AnimationCurve + 'static) -> Self {
        Curve::Custom(Rc::new(curve))
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Curve::Linear)
    }

    pub fn adjusted_progress(&self, raw: f64) -> f64 {
        match self {
            Curve::Linear => raw,
            Curve::ParabolicEaseIn => easing::parabolic_ease_in(raw),
            Curve::ParabolicEaseOut => easing::parabolic_ease_out(raw),
            Curve::SinusoidalEaseInEaseOut => easing::sinusoidal_ease_in_ease_out(raw),
            Curve::CubicBezier(c) => c.adjusted_progress(raw),
            Curve::Spring(c) => c.adjusted_progress(raw),
            Curve::Custom(c) => c.adjusted_progress(raw),
        }
    }

    pub fn raw_progress(&self, adjusted: f64) -> Vec<f64> {
        match self {
            Curve::Linear => easing::unit_root(adjusted).into_iter().collect(),
            Curve::ParabolicEaseIn => easing::parabolic_ease_in_inverse(adjusted),
            Curve::ParabolicEaseOut => easing::parabolic_ease_out_inverse(adjusted),
            Curve::SinusoidalEaseInEaseOut => {
                easing::sinusoidal_ease_in_ease_out_inverse(adjusted)
            }
            Curve::CubicBezier(c) => c.raw_progress(adjusted),
            Curve::Spring(c) => c.raw_progress(adjusted),
            Curve::Custom(c) => c.raw_progress(adjusted),
        }
    }

    /// The earliest raw timestamp reaching `adjusted`, if any.
    pub fn first_raw_progress(&self, adjusted: f64) -> Option<f64> {
        self.raw_progress(adjusted).into_iter().next()
    }
}

impl AnimationCurve for Curve {
    fn adjusted_progress(&self, raw: f64) -> f64 {
        Curve::adjusted_progress(self, raw)
    }

    fn raw_progress(&self, adjusted: f64) -> Vec<f64> {
        Curve::raw_progress(self, adjusted)
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Curve::Linear, Curve::Linear)
            | (Curve::ParabolicEaseIn, Curve::ParabolicEaseIn)
            | (Curve::ParabolicEaseOut, Curve::ParabolicEaseOut)
            | (Curve::SinusoidalEaseInEaseOut, Curve::SinusoidalEaseInEaseOut) => true,
            (Curve::CubicBezier(a), Curve::CubicBezier(b)) => a == b,
            (Curve::Spring(a), Curve::Spring(b)) => a == b,
            (Curve::Custom(a), Curve::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<CubicBezierCurve> for Curve {
    fn from(c: CubicBezierCurve) -> Self {
        Curve::CubicBezier(c)
    }
}

impl From<SpringCurve> for Curve {
    fn from(c: SpringCurve) -> Self {
        Curve::Spring(c)
    }
}

const CROSSING_SAMPLES: usize = 512;
const BISECTION_STEPS: usize = 60;

/// Every `t` in `[0, 1]` where `f(t) == target`, found by sampling for sign
/// changes and bisecting each bracket. Sorted ascending.
pub(crate) fn crossings(f: impl Fn(f64) -> f64, target: f64) -> Vec<f64> {
    let mut roots = Vec::new();
    let mut prev_t = 0.0;
    let mut prev = f(prev_t) - target;
    if prev == 0.0 {
        roots.push(prev_t);
    }
    for i in 1..=CROSSING_SAMPLES {
        let t = i as f64 / CROSSING_SAMPLES as f64;
        let cur = f(t) - target;
        if cur == 0.0 {
            roots.push(t);
        } else if prev != 0.0 && (prev < 0.0) != (cur < 0.0) {
            let (mut lo, mut hi) = (prev_t, t);
            let lo_negative = prev < 0.0;
            for _ in 0..BISECTION_STEPS {
                let mid = 0.5 * (lo + hi);
                if (f(mid) - target < 0.0) == lo_negative {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            roots.push(0.5 * (lo + hi));
        }
        prev_t = t;
        prev = cur;
    }
    roots
}
