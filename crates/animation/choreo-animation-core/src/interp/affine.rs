//! 2D affine transforms in CoreGraphics row-vector layout.
//!
//! A point `(x, y)` maps to `(a*x + c*y + tx, b*x + d*y + ty)`. Interpolation
//! goes through [`AffineDecomposition`]: scale, rotation, residual 2x2 and
//! translation are blended separately and recomposed.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::functions::{lerp, lerp_array};
use super::geometry::Point;
use super::Animatable;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// `self` applied first, then `other`.
    pub fn concat(&self, other: &AffineTransform) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.tx * other.a + self.ty * other.c + other.tx,
            ty: self.tx * other.b + self.ty * other.d + other.ty,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn decompose(&self) -> AffineDecomposition {
        let mut row0 = [self.a, self.b];
        let mut row1 = [self.c, self.d];
        let mut scale = [row0[0].hypot(row0[1]), row1[0].hypot(row1[1])];

        // Mirrored: attribute the flip to the axis that is least aligned with itself.
        if self.determinant() <= 0.0 {
            if self.a < self.d {
                scale[0] = -scale[0];
            } else {
                scale[1] = -scale[1];
            }
        }

        if scale[0] != 0.0 {
            row0 = [row0[0] / scale[0], row0[1] / scale[0]];
        }
        if scale[1] != 0.0 {
            row1 = [row1[0] / scale[1], row1[1] / scale[1]];
        }

        let angle = row0[1].atan2(row0[0]);
        let (sin, cos) = angle.sin_cos();
        // Undo the rotation to leave the residual shear.
        let remainder = [
            cos * row0[0] - sin * row1[0],
            cos * row0[1] - sin * row1[1],
            sin * row0[0] + cos * row1[0],
            sin * row0[1] + cos * row1[1],
        ];

        AffineDecomposition {
            scale,
            angle,
            remainder,
            translation: [self.tx, self.ty],
        }
    }
}

/// Components of an [`AffineTransform`]; `remainder` is row-major 2x2.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineDecomposition {
    pub scale: [f64; 2],
    pub angle: f64,
    pub remainder: [f64; 4],
    pub translation: [f64; 2],
}

impl AffineDecomposition {
    pub fn recompose(&self) -> AffineTransform {
        let [m11, m12, m21, m22] = self.remainder;
        let (sin, cos) = self.angle.sin_cos();
        // Rotation applied to the residual first, then scale.
        let r0 = [cos * m11 + sin * m21, cos * m12 + sin * m22];
        let r1 = [-sin * m11 + cos * m21, -sin * m12 + cos * m22];
        AffineTransform {
            a: r0[0] * self.scale[0],
            b: r0[1] * self.scale[0],
            c: r1[0] * self.scale[1],
            d: r1[1] * self.scale[1],
            tx: self.translation[0],
            ty: self.translation[1],
        }
    }

    pub fn interpolate(from: &Self, to: &Self, progress: f64) -> Self {
        let mut from = *from;
        // Both axes flipped across the pair reads better as a half turn.
        if (from.scale[0] < 0.0 && to.scale[1] < 0.0) || (from.scale[1] < 0.0 && to.scale[0] < 0.0)
        {
            from.scale = [-from.scale[0], -from.scale[1]];
            from.angle += if from.angle < 0.0 { PI } else { -PI };
        }

        let target = closest_angle(from.angle, to.angle);
        AffineDecomposition {
            scale: lerp_array(&from.scale, &to.scale, progress),
            angle: lerp(from.angle, target, progress),
            remainder: lerp_array(&from.remainder, &to.remainder, progress),
            translation: lerp_array(&from.translation, &to.translation, progress),
        }
    }
}

/// The representative of `to` (literal or shifted by a full turn) nearest `from`.
fn closest_angle(from: f64, to: f64) -> f64 {
    [to, to + TAU, to - TAU]
        .into_iter()
        .fold(to, |best, candidate| {
            if (candidate - from).abs() < (best - from).abs() {
                candidate
            } else {
                best
            }
        })
}

impl Animatable for AffineTransform {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        let from = initial.decompose();
        let to = final_value.decompose();
        AffineDecomposition::interpolate(&from, &to, progress).recompose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_transform_eq(lhs: &AffineTransform, rhs: &AffineTransform) {
        assert_abs_diff_eq!(lhs.a, rhs.a, epsilon = 1e-10);
        assert_abs_diff_eq!(lhs.b, rhs.b, epsilon = 1e-10);
        assert_abs_diff_eq!(lhs.c, rhs.c, epsilon = 1e-10);
        assert_abs_diff_eq!(lhs.d, rhs.d, epsilon = 1e-10);
        assert_abs_diff_eq!(lhs.tx, rhs.tx, epsilon = 1e-10);
        assert_abs_diff_eq!(lhs.ty, rhs.ty, epsilon = 1e-10);
    }

    #[test]
    fn concat_applies_left_first() {
        let t = AffineTransform::scale(2.0, 2.0).concat(&AffineTransform::translation(1.0, 0.0));
        assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(3.0, 2.0));
    }

    #[test]
    fn mirrored_x_decomposes_to_negative_x_scale() {
        let d = AffineTransform::scale(-2.0, 3.0).decompose();
        assert_abs_diff_eq!(d.scale[0], -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.scale[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.angle, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_takes_short_way_around() {
        let from = AffineTransform::rotation(170f64.to_radians());
        let to = AffineTransform::rotation(-170f64.to_radians());
        let mid = AffineTransform::value_between(&from, &to, 0.5);
        assert_transform_eq(&mid, &AffineTransform::rotation(PI));
    }

    #[test]
    fn endpoints_are_reproduced() {
        let from = AffineTransform::rotation(0.3).concat(&AffineTransform::translation(4.0, 5.0));
        let to = AffineTransform::new(1.0, 0.5, -0.25, 2.0, -3.0, 7.0);
        assert_transform_eq(&AffineTransform::value_between(&from, &to, 0.0), &from);
        assert_transform_eq(&AffineTransform::value_between(&from, &to, 1.0), &to);
    }
}
