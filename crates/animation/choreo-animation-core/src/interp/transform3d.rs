//! 3D transforms (4x4, row-vector layout) and their decomposition.
//!
//! Decomposition runs normalize -> strip perspective -> Gram-Schmidt on the
//! upper 3x3 rows -> quaternion extraction. Recomposition multiplies the parts
//! back as `scale * skew * rotation * translation * perspective`.

use log::debug;
use nalgebra::{Matrix3, Matrix4, Rotation3, Unit, UnitQuaternion, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use super::affine::AffineTransform;
use super::functions::{lerp_array, nlerp_quat};
use super::Animatable;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// `m[row][column]`; a point is transformed as `[x, y, z, 1] * m`.
    pub m: [[f64; 4]; 4],
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<AffineTransform> for Transform3D {
    fn from(t: AffineTransform) -> Self {
        Self::new([
            [t.a, t.b, 0.0, 0.0],
            [t.c, t.d, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [t.tx, t.ty, 0.0, 1.0],
        ])
    }
}

impl Transform3D {
    pub const IDENTITY: Transform3D = Transform3D {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn new(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.m[3] = [tx, ty, tz, 1.0];
        t
    }

    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.m[0][0] = sx;
        t.m[1][1] = sy;
        t.m[2][2] = sz;
        t
    }

    /// Rotation by `angle` radians about `(x, y, z)`. A zero axis yields identity.
    pub fn rotation(angle: f64, x: f64, y: f64, z: f64) -> Self {
        let Some(axis) = Unit::try_new(Vector3::new(x, y, z), f64::EPSILON) else {
            return Self::IDENTITY;
        };
        let rot = Rotation3::from_axis_angle(&axis, angle).into_inner().transpose();
        let mut t = Self::IDENTITY;
        for (i, row) in t.m.iter_mut().take(3).enumerate() {
            for (j, cell) in row.iter_mut().take(3).enumerate() {
                *cell = rot[(i, j)];
            }
        }
        t
    }

    /// Perspective projection with the eye at `distance` along +z.
    pub fn perspective(distance: f64) -> Self {
        let mut t = Self::IDENTITY;
        if distance != 0.0 {
            t.m[2][3] = -1.0 / distance;
        }
        t
    }

    /// `self` applied first, then `other`.
    pub fn concat(&self, other: &Transform3D) -> Self {
        Self::from_matrix(&(self.to_matrix() * other.to_matrix()))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// The same transform scaled so `m[3][3] == 1`; unchanged when `m[3][3]` is zero.
    pub fn normalized(&self) -> Self {
        let w = self.m[3][3];
        if w == 0.0 {
            return *self;
        }
        let mut out = *self;
        for cell in out.m.iter_mut().flatten() {
            *cell /= w;
        }
        out
    }

    fn to_matrix(self) -> Matrix4<f64> {
        Matrix4::from_fn(|i, j| self.m[i][j])
    }

    fn from_matrix(mat: &Matrix4<f64>) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = mat[(i, j)];
            }
        }
        Self { m }
    }

    /// `None` when `m[3][3]` is zero or the matrix without its perspective
    /// column is singular.
    pub fn decompose(&self) -> Option<Transform3DDecomposition> {
        if self.m[3][3] == 0.0 {
            return None;
        }
        let m = self.normalized().m;

        let mut perspective_matrix = Self::new(m).to_matrix();
        for i in 0..3 {
            perspective_matrix[(i, 3)] = 0.0;
        }
        perspective_matrix[(3, 3)] = 1.0;
        if perspective_matrix.determinant() == 0.0 {
            return None;
        }

        let perspective = if m[0][3] != 0.0 || m[1][3] != 0.0 || m[2][3] != 0.0 {
            let inverse = perspective_matrix.try_inverse()?;
            let solved = inverse * Vector4::new(m[0][3], m[1][3], m[2][3], m[3][3]);
            [solved[0], solved[1], solved[2], solved[3]]
        } else {
            [0.0, 0.0, 0.0, 1.0]
        };

        let translation = [m[3][0], m[3][1], m[3][2]];

        let mut rows = [
            Vector3::new(m[0][0], m[0][1], m[0][2]),
            Vector3::new(m[1][0], m[1][1], m[1][2]),
            Vector3::new(m[2][0], m[2][1], m[2][2]),
        ];
        let mut scale = [0.0; 3];
        let mut skew = [0.0; 3];

        scale[0] = rows[0].norm();
        rows[0] /= scale[0];

        skew[0] = rows[0].dot(&rows[1]);
        rows[1] -= rows[0] * skew[0];
        scale[1] = rows[1].norm();
        rows[1] /= scale[1];
        skew[0] /= scale[1];

        skew[1] = rows[0].dot(&rows[2]);
        rows[2] -= rows[0] * skew[1];
        skew[2] = rows[1].dot(&rows[2]);
        rows[2] -= rows[1] * skew[2];
        scale[2] = rows[2].norm();
        rows[2] /= scale[2];
        skew[1] /= scale[2];
        skew[2] /= scale[2];

        // Left-handed basis: fold the flip into the scale.
        if rows[0].dot(&rows[1].cross(&rows[2])) < 0.0 {
            for (s, row) in scale.iter_mut().zip(rows.iter_mut()) {
                *s = -*s;
                *row = -*row;
            }
        }

        // Rows hold the transposed rotation (row-vector layout).
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&rows));
        let q = UnitQuaternion::from_rotation_matrix(&rotation);
        let quaternion = [q.i, q.j, q.k, q.w];

        Some(Transform3DDecomposition {
            scale,
            skew,
            quaternion,
            translation,
            perspective,
        })
    }
}

/// Components of a [`Transform3D`].
///
/// `skew` is `(xy, xz, yz)`; `quaternion` is `(x, y, z, w)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3DDecomposition {
    pub scale: [f64; 3],
    pub skew: [f64; 3],
    pub quaternion: [f64; 4],
    pub translation: [f64; 3],
    pub perspective: [f64; 4],
}

impl Transform3DDecomposition {
    pub fn recompose(&self) -> Transform3D {
        let mut perspective = Matrix4::identity();
        for i in 0..4 {
            perspective[(i, 3)] = self.perspective[i];
        }

        let mut translation = Matrix4::identity();
        for j in 0..3 {
            translation[(3, j)] = self.translation[j];
        }

        let [x, y, z, w] = self.quaternion;
        let rotation = Matrix4::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y + z * w),
            2.0 * (x * z - y * w),
            0.0,
            2.0 * (x * y - z * w),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z + x * w),
            0.0,
            2.0 * (x * z + y * w),
            2.0 * (y * z - x * w),
            1.0 - 2.0 * (x * x + y * y),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        );

        let mut skew = Matrix4::identity();
        skew[(1, 0)] = self.skew[0];
        skew[(2, 0)] = self.skew[1];
        skew[(2, 1)] = self.skew[2];

        let scale = Matrix4::from_diagonal(&Vector4::new(
            self.scale[0],
            self.scale[1],
            self.scale[2],
            1.0,
        ));

        Transform3D::from_matrix(&(scale * skew * rotation * translation * perspective))
    }

    pub fn interpolate(from: &Self, to: &Self, progress: f64) -> Self {
        Self {
            scale: lerp_array(&from.scale, &to.scale, progress),
            skew: lerp_array(&from.skew, &to.skew, progress),
            quaternion: nlerp_quat(from.quaternion, to.quaternion, progress),
            translation: lerp_array(&from.translation, &to.translation, progress),
            perspective: lerp_array(&from.perspective, &to.perspective, progress),
        }
    }

    /// Same shape with every scale axis collapsed.
    fn collapsed(&self) -> Self {
        Self {
            scale: [0.0; 3],
            ..*self
        }
    }
}

impl Animatable for Transform3D {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        match (initial.decompose(), final_value.decompose()) {
            (Some(from), Some(to)) => {
                Transform3DDecomposition::interpolate(&from, &to, progress).recompose()
            }
            (None, None) => {
                debug!("neither transform decomposes; stepping at midpoint");
                if progress < 0.5 {
                    *initial
                } else {
                    *final_value
                }
            }
            _ if progress <= 0.0 => *initial,
            _ if progress >= 1.0 => *final_value,
            (Some(from), None) => {
                debug!("final transform does not decompose; collapsing scale");
                Transform3DDecomposition::interpolate(&from, &from.collapsed(), progress)
                    .recompose()
            }
            (None, Some(to)) => {
                debug!("initial transform does not decompose; collapsing scale");
                Transform3DDecomposition::interpolate(&to.collapsed(), &to, progress).recompose()
            }
        }
    }
}
