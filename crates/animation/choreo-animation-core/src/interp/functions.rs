//! Interpolation helpers:
//! - lerp (scalar) and lerp_array (component-wise)
//! - quaternion NLERP with shortest-arc normalization
//! - step (hard switch at the midpoint)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Component-wise lerp for fixed-size arrays.
#[inline]
pub fn lerp_array<const N: usize>(a: &[f64; N], b: &[f64; N], t: f64) -> [f64; N] {
    let mut out = [0.0f64; N];
    for i in 0..N {
        out[i] = lerp(a[i], b[i], t);
    }
    out
}

#[inline]
fn dot4(a: [f64; 4], b: [f64; 4]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn normalize4(mut q: [f64; 4]) -> [f64; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
/// Returns a normalized quaternion (x,y,z,w).
#[inline]
pub fn nlerp_quat(a: [f64; 4], mut b: [f64; 4], t: f64) -> [f64; 4] {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    normalize4(lerp_array(&a, &b, t))
}

/// Step interpolation: left value before the midpoint, right value from it on.
#[inline]
pub fn step<T: Clone>(a: &T, b: &T, t: f64) -> T {
    if t < 0.5 {
        a.clone()
    } else {
        b.clone()
    }
}
