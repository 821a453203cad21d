//! Colors and colorspace-aware blending.
//!
//! Both endpoints are converted into extended sRGB (sRGB transfer curve, no
//! clamping, negative components allowed) and blended component-wise there.
//! Colors that cannot be expressed as components (patterns, non-finite values)
//! switch over at the midpoint instead.

use log::debug;
use nalgebra::{Matrix3, Vector3};
use palette::convert::FromColorUnclamped;
use palette::{LinSrgb, Srgb};
use serde::{Deserialize, Serialize};

use super::functions::{lerp_array, step};
use super::{Animatable, AnimatableOptional};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Gamma-encoded sRGB, components nominally in `[0, 1]`.
    Srgb,
    /// sRGB transfer curve with unbounded components.
    ExtendedSrgb,
    /// Linear-light sRGB primaries.
    LinearSrgb,
    /// Gamma-encoded Display P3.
    DisplayP3,
    /// `components[0]` is the gray level, `components[3]` alpha.
    Gray,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Color {
    /// `components` are `[r, g, b, a]` (or `[white, _, _, a]` for gray).
    Rgba {
        space: ColorSpace,
        components: [f64; 4],
    },
    /// A tiled image or other non-component fill.
    Pattern { name: String },
}

impl Color {
    pub fn srgb(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::Rgba {
            space: ColorSpace::Srgb,
            components: [r, g, b, a],
        }
    }

    pub fn extended_srgb(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::Rgba {
            space: ColorSpace::ExtendedSrgb,
            components: [r, g, b, a],
        }
    }

    pub fn linear_srgb(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::Rgba {
            space: ColorSpace::LinearSrgb,
            components: [r, g, b, a],
        }
    }

    pub fn display_p3(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::Rgba {
            space: ColorSpace::DisplayP3,
            components: [r, g, b, a],
        }
    }

    pub fn gray(white: f64, a: f64) -> Self {
        Self::Rgba {
            space: ColorSpace::Gray,
            components: [white, white, white, a],
        }
    }

    pub fn pattern(name: impl Into<String>) -> Self {
        Self::Pattern { name: name.into() }
    }

    pub fn alpha(&self) -> Option<f64> {
        match self {
            Color::Rgba { components, .. } => Some(components[3]),
            Color::Pattern { .. } => None,
        }
    }

    /// `[r, g, b, a]` in extended sRGB, or `None` when the color has no
    /// component representation.
    pub fn to_extended_srgb(&self) -> Option<[f64; 4]> {
        let Color::Rgba { space, components } = self else {
            return None;
        };
        if components.iter().any(|c| !c.is_finite()) {
            return None;
        }
        let [c0, c1, c2, alpha] = *components;
        let [r, g, b] = match space {
            ColorSpace::Srgb | ColorSpace::ExtendedSrgb => [c0, c1, c2],
            ColorSpace::Gray => [c0, c0, c0],
            ColorSpace::LinearSrgb => encode_srgb([c0, c1, c2]),
            ColorSpace::DisplayP3 => {
                let linear_p3 = Vector3::from(decode_srgb([c0, c1, c2]));
                let linear_srgb = p3_to_srgb() * linear_p3;
                encode_srgb([linear_srgb.x, linear_srgb.y, linear_srgb.z])
            }
        };
        Some([r, g, b, alpha])
    }
}

/// Linear Display P3 to linear sRGB.
fn p3_to_srgb() -> Matrix3<f64> {
    Matrix3::new(
        1.224_940_1,
        -0.224_940_4,
        0.0,
        -0.042_056_9,
        1.042_057_1,
        0.0,
        -0.019_637_6,
        -0.078_636_1,
        1.098_273_5,
    )
}

/// Linear to gamma-encoded, mirrored around zero for extended values.
fn encode_srgb(linear: [f64; 3]) -> [f64; 3] {
    let magnitude = LinSrgb::new(linear[0].abs(), linear[1].abs(), linear[2].abs());
    let encoded = Srgb::<f64>::from_color_unclamped(magnitude);
    [
        encoded.red.copysign(linear[0]),
        encoded.green.copysign(linear[1]),
        encoded.blue.copysign(linear[2]),
    ]
}

fn decode_srgb(encoded: [f64; 3]) -> [f64; 3] {
    let magnitude = Srgb::new(encoded[0].abs(), encoded[1].abs(), encoded[2].abs());
    let linear = LinSrgb::<f64>::from_color_unclamped(magnitude);
    [
        linear.red.copysign(encoded[0]),
        linear.green.copysign(encoded[1]),
        linear.blue.copysign(encoded[2]),
    ]
}

impl Animatable for Color {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        match (initial.to_extended_srgb(), final_value.to_extended_srgb()) {
            (Some(from), Some(to)) => {
                let [r, g, b, a] = lerp_array(&from, &to, progress);
                Color::extended_srgb(r, g, b, a)
            }
            _ => {
                debug!("color endpoints not convertible; stepping at midpoint");
                step(initial, final_value, progress)
            }
        }
    }
}

impl AnimatableOptional for Color {
    fn optional_value_between(
        initial: Option<&Self>,
        final_value: Option<&Self>,
        progress: f64,
    ) -> Option<Self> {
        let (present, present_is_final) = match (initial, final_value) {
            (Some(from), Some(to)) => return Some(Color::value_between(from, to, progress)),
            (None, None) => return None,
            (Some(from), None) => (from, false),
            (None, Some(to)) => (to, true),
        };

        let Some([r, g, b, a]) = present.to_extended_srgb() else {
            debug!("absent color endpoint next to undecomposable color; stepping at midpoint");
            let (from, to) = if present_is_final {
                (None, Some(present.clone()))
            } else {
                (Some(present.clone()), None)
            };
            return step(&from, &to, progress);
        };

        let visible = [r, g, b, a];
        let transparent = [r, g, b, 0.0];
        let (from, to) = if present_is_final {
            (transparent, visible)
        } else {
            (visible, transparent)
        };
        let [r, g, b, a] = lerp_array(&from, &to, progress);
        Some(Color::extended_srgb(r, g, b, a))
    }
}
