//! Numeric vector types written by the animations.
//!
//! Scene attributes are plain fixed-size arrays of `f64`, matching the
//! millisecond `f64` clock used everywhere else in the crate.

/// Three-component attribute (translation, scale, rotation, direction, RGB).
pub type Vec3 = [f64; 3];

/// RGBA color. Animations only ever touch the first three components.
pub type Rgba = [f64; 4];

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn div(a: Vec3, s: f64) -> Vec3 {
    [a[0] / s, a[1] / s, a[2] / s]
}

#[inline]
pub fn neg(a: Vec3) -> Vec3 {
    [-a[0], -a[1], -a[2]]
}

#[inline]
pub fn rgb(color: Rgba) -> Vec3 {
    [color[0], color[1], color[2]]
}
