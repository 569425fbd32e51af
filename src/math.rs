//! 2-D vector helpers on top of [`glam::DVec2`].
//!
//! `DVec2` is `Copy`, so every operation below returns a fresh value.  Code
//! that wants to accumulate does it through assignment (`pos += step`), which
//! keeps two owners from ever observing the same mutation.
//!
//! **Zero vectors:** `DVec2::normalize` on `ZERO` yields NaN components.  That
//! is left as is; callers that can hand in a zero vector must guard first
//! (or use `normalize_or_zero`).

pub use glam::DVec2 as Vec2;

/// Unit vector for `angle` radians (0 = +X, growing towards +Y).
#[inline]
pub fn from_angle(angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c, s)
}

/// Angle (radians, `0..=π`) between two **unit** vectors.
///
/// The dot product is clamped so rounding on nearly parallel vectors cannot
/// push `acos` into NaN.
#[inline]
pub fn unit_angle_between(a: Vec2, b: Vec2) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// 2-D cross term `a.x * -b.y + a.y * b.x`.
///
/// Positive when `b` lies on the counter-clockwise side of `a` in a y-down
/// screen-style world, negative on the clockwise side, zero when collinear.
#[inline]
pub fn side(a: Vec2, b: Vec2) -> f64 {
    a.x * -b.y + a.y * b.x
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}
