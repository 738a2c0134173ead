use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::mat3::Mat3;
use super::vec3::Vec3;

/// A quaternion, used as a body orientation.
///
/// Stored as (x, y, z, w) where w is the scalar part. Orientations must be
/// unit length before they rotate anything; [`Quat::integrate_angular`]
/// re-normalizes after every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new quaternion from components
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Pure quaternion (0, v), e.g. an angular velocity lifted into
    /// quaternion space for orientation integration.
    #[inline]
    pub const fn from_vector(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    /// The vector (imaginary) part
    #[inline]
    pub const fn vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Creates a quaternion from a rotation axis and angle (in radians).
    ///
    /// A zero axis has no direction to rotate about and gives the identity.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let Some(axis) = axis.try_normalized() else {
            return Self::IDENTITY;
        };
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns the unit quaternion, or `None` when the length is near zero.
    #[inline]
    pub fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        if len > 1e-10 && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// Returns the unit quaternion; a degenerate quaternion collapses to identity.
    #[inline]
    pub fn normalize(self) -> Self {
        self.try_normalize().unwrap_or(Self::IDENTITY)
    }

    /// Returns the conjugate (inverse rotation for unit quaternions)
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Returns the multiplicative inverse, or `None` for a zero quaternion
    #[inline]
    pub fn try_inverse(self) -> Option<Self> {
        let len_sq = self.length_squared();
        if len_sq > 1e-10 {
            Some(self.conjugate() * (1.0 / len_sq))
        } else {
            None
        }
    }

    /// Returns the inverse of the quaternion; a zero quaternion yields identity.
    #[inline]
    pub fn inverse(self) -> Self {
        self.try_inverse().unwrap_or(Self::IDENTITY)
    }

    /// Rotation that takes `self` to `other`: `other * self⁻¹`
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        other * self.inverse()
    }

    /// Four-component scalar product
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Rotates a vector by this (unit) quaternion
    #[inline]
    pub fn rotate_vec(self, v: Vec3) -> Vec3 {
        let qv = self.vector();
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// 3x3 rotation matrix equivalent to this (unit) quaternion
    #[inline]
    pub fn to_mat3(self) -> Mat3 {
        Mat3::from_quat(self)
    }

    #[inline]
    pub fn local_x(self) -> Vec3 {
        self.rotate_vec(Vec3::X)
    }

    #[inline]
    pub fn local_y(self) -> Vec3 {
        self.rotate_vec(Vec3::Y)
    }

    #[inline]
    pub fn local_z(self) -> Vec3 {
        self.rotate_vec(Vec3::Z)
    }

    /// Advances an orientation by an angular velocity over `dt`:
    /// `q + 0.5 * dt * (ω ⊗ q)`, then re-normalized.
    #[inline]
    pub fn integrate_angular(self, angular_velocity: Vec3, dt: f32) -> Self {
        let spin = Self::from_vector(angular_velocity) * self;
        (self + spin * (0.5 * dt)).normalize()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Add for Quat {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z, self.w + other.w)
    }
}

impl AddAssign for Quat {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Quat {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z, self.w - other.w)
    }
}

impl Mul for Quat {
    type Output = Self;

    /// Hamilton product (applies `other` first, then `self`)
    #[inline]
    fn mul(self, other: Self) -> Self {
        Self::new(
            self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
            self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
        )
    }
}

impl MulAssign for Quat {
    #[inline]
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<f32> for Quat {
    type Output = Self;

    #[inline]
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Div for Quat {
    type Output = Self;

    /// `self * other⁻¹`
    #[inline]
    fn div(self, other: Self) -> Self {
        self * other.inverse()
    }
}

impl Neg for Quat {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn quat_approx_eq(a: Quat, b: Quat) -> bool {
        // q and -q are the same rotation
        a.dot(b).abs() > 1.0 - EPSILON
    }

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_addition() {
        let q = Quat::new(1.0, 2.0, 3.0, 4.0) + Quat::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(q, Quat::new(1.5, 2.5, 3.5, 4.5));
    }

    #[test]
    fn test_hamilton_product() {
        let i = Quat::new(1.0, 0.0, 0.0, 0.0);
        let j = Quat::new(0.0, 1.0, 0.0, 0.0);
        let k = Quat::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(i * j, k);
        assert_eq!(j * i, -k);
        assert_eq!(i * i, Quat::new(0.0, 0.0, 0.0, -1.0));

        let q1 = Quat::from_axis_angle(Vec3::Z, PI / 2.0);
        assert!(quat_approx_eq(q1 * q1, Quat::from_axis_angle(Vec3::Z, PI)));
    }

    #[test]
    fn test_scalar_multiplication() {
        let q = Quat::new(1.0, -2.0, 3.0, 0.5) * 2.0;
        assert_eq!(q, Quat::new(2.0, -4.0, 6.0, 1.0));
    }

    #[test]
    fn test_division_and_difference() {
        let a = Quat::from_axis_angle(Vec3::Y, 0.3);
        let b = Quat::from_axis_angle(Vec3::Y, 1.1);

        assert!(quat_approx_eq((b / a) * a, b));

        let d = a.difference(b);
        assert!(quat_approx_eq(d, Quat::from_axis_angle(Vec3::Y, 0.8)));
        assert!(quat_approx_eq(d * a, b));
    }

    #[test]
    fn test_normalize() {
        let samples = [
            Quat::new(1.0, 2.0, 3.0, 4.0),
            Quat::new(-0.1, 0.0, 0.0, 0.0),
            Quat::new(3.0, -7.0, 0.5, -2.0),
        ];
        for q in samples {
            assert!(approx_eq(q.normalize().length(), 1.0));
        }
        assert!(Quat::new(0.0, 0.0, 0.0, 0.0).try_normalize().is_none());
    }

    #[test]
    fn test_zero_axis_is_identity() {
        let q = Quat::from_axis_angle(Vec3::ZERO, PI / 2.0);
        assert_eq!(q, Quat::IDENTITY);
        assert_eq!(q.rotate_vec(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_inverse() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 1.0), PI / 3.0);
        let v = Vec3::new(1.0, 2.0, 3.0);
        let back = q.inverse().rotate_vec(q.rotate_vec(v));
        assert!(vec3_approx_eq(back, v));
        assert!(quat_approx_eq(q * q.inverse(), Quat::IDENTITY));
    }

    #[test]
    fn test_rotation_preserves_magnitude() {
        let rotations = [
            Quat::from_axis_angle(Vec3::X, 0.7),
            Quat::from_axis_angle(Vec3::new(1.0, -2.0, 0.5), 2.9),
            Quat::new(0.3, -0.4, 0.1, 0.8).normalize(),
        ];
        let v = Vec3::new(3.0, -1.0, 2.5);
        for q in rotations {
            assert!(approx_eq(q.rotate_vec(v).magnitude(), v.magnitude()));
        }
    }

    #[test]
    fn test_apply_rotation() {
        let q = Quat::from_axis_angle(Vec3::Z, PI / 2.0);
        assert!(vec3_approx_eq(q.rotate_vec(Vec3::X), Vec3::Y));
        assert!(vec3_approx_eq(q.local_y(), -Vec3::X));

        let q = Quat::from_axis_angle(Vec3::X, PI);
        assert!(vec3_approx_eq(q.rotate_vec(Vec3::new(0.0, 1.0, 1.0)), Vec3::new(0.0, -1.0, -1.0)));
    }

    #[test]
    fn test_to_matrix_matches_rotation() {
        let q = Quat::from_axis_angle(Vec3::new(0.2, 1.0, -0.4), 1.3);
        let v = Vec3::new(-2.0, 0.5, 4.0);
        assert!(vec3_approx_eq(q.to_mat3() * v, q.rotate_vec(v)));
    }

    #[test]
    fn test_integrate_angular_stays_unit() {
        let mut q = Quat::IDENTITY;
        let omega = Vec3::new(0.0, 0.0, PI);
        for _ in 0..600 {
            q = q.integrate_angular(omega, 1.0 / 600.0);
            assert!(approx_eq(q.length(), 1.0));
        }
        // One second at PI rad/s is roughly a half turn about Z.
        assert!(q.local_x().x < -0.95);
    }
}
