//! Property interpolation.
//!
//! [`Animatable`] is the leaf capability everything above builds on: given two
//! endpoint values and a progress, produce the in-between value. Progress is
//! usually in `[0, 1]` but curves may overshoot, so implementations must
//! extrapolate sensibly rather than clamp.
//!
//! [`AnimatableOptional`] covers properties that may be absent at one or both
//! endpoints. An absent endpoint blends as a zero-intensity version of the
//! present one; two absent endpoints stay absent.

pub mod affine;
pub mod color;
pub mod functions;
pub mod geometry;
pub mod transform3d;

use functions::{lerp, step};

/// A value type that can be interpolated between two endpoints.
pub trait Animatable: Clone + 'static {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self;
}

/// A value type that can be interpolated when either endpoint may be missing.
pub trait AnimatableOptional: Clone + 'static {
    fn optional_value_between(
        initial: Option<&Self>,
        final_value: Option<&Self>,
        progress: f64,
    ) -> Option<Self>;
}

impl<T: AnimatableOptional> Animatable for Option<T> {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        T::optional_value_between(initial.as_ref(), final_value.as_ref(), progress)
    }
}

impl Animatable for f64 {
    #[inline]
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        lerp(*initial, *final_value, progress)
    }
}

impl Animatable for f32 {
    #[inline]
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        lerp(f64::from(*initial), f64::from(*final_value), progress) as f32
    }
}

// Values without a meaningful midpoint switch halfway.
impl Animatable for bool {
    #[inline]
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        step(initial, final_value, progress)
    }
}

impl Animatable for String {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        step(initial, final_value, progress)
    }
}

impl AnimatableOptional for f64 {
    fn optional_value_between(
        initial: Option<&Self>,
        final_value: Option<&Self>,
        progress: f64,
    ) -> Option<Self> {
        match (initial, final_value) {
            (None, None) => None,
            (a, b) => Some(lerp(
                a.copied().unwrap_or(0.0),
                b.copied().unwrap_or(0.0),
                progress,
            )),
        }
    }
}
