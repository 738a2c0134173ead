use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::quat::Quat;
use super::vec3::Vec3;

/// A 3x3 matrix stored in column-major order.
///
/// Used for rotation matrices and inertia tensors. [`Mat3::new`] takes the
/// nine entries row by row (`a b c / d e f / g h i`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Mat3 {
    /// Columns of the matrix
    pub cols: [Vec3; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const ZERO: Self = Self {
        cols: [Vec3::ZERO, Vec3::ZERO, Vec3::ZERO],
    };

    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Creates a matrix from its entries in row-major reading order
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32, g: f32, h: f32, i: f32) -> Self {
        Self::from_cols(Vec3::new(a, d, g), Vec3::new(b, e, h), Vec3::new(c, f, i))
    }

    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    #[inline]
    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self::new(r0.x, r0.y, r0.z, r1.x, r1.y, r1.z, r2.x, r2.y, r2.z)
    }

    #[inline]
    pub fn from_diagonal(diag: Vec3) -> Self {
        Self::from_cols(
            Vec3::new(diag.x, 0.0, 0.0),
            Vec3::new(0.0, diag.y, 0.0),
            Vec3::new(0.0, 0.0, diag.z),
        )
    }

    /// Creates a rotation matrix from a unit quaternion
    #[inline]
    pub fn from_quat(q: Quat) -> Self {
        let x2 = q.x + q.x;
        let y2 = q.y + q.y;
        let z2 = q.z + q.z;

        let xx = q.x * x2;
        let xy = q.x * y2;
        let xz = q.x * z2;
        let yy = q.y * y2;
        let yz = q.y * z2;
        let zz = q.z * z2;
        let wx = q.w * x2;
        let wy = q.w * y2;
        let wz = q.w * z2;

        Self::from_cols(
            Vec3::new(1.0 - (yy + zz), xy + wz, xz - wy),
            Vec3::new(xy - wz, 1.0 - (xx + zz), yz + wx),
            Vec3::new(xz + wy, yz - wx, 1.0 - (xx + yy)),
        )
    }

    /// Outer product `v * wᵀ`
    #[inline]
    pub fn outer_product(v: Vec3, w: Vec3) -> Self {
        Self::from_cols(v * w.x, v * w.y, v * w.z)
    }

    #[inline]
    pub fn transpose(self) -> Self {
        Self::from_rows(self.cols[0], self.cols[1], self.cols[2])
    }

    #[inline]
    pub fn determinant(self) -> f32 {
        self.cols[0].dot(self.cols[1].cross(self.cols[2]))
    }

    /// Returns the inverse, or `None` when the determinant is (nearly) zero.
    #[inline]
    pub fn try_inverse(self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-10 || !det.is_finite() {
            return None;
        }

        let inv_det = 1.0 / det;

        // Rows of the inverse are the cofactor cross products.
        let r0 = self.cols[1].cross(self.cols[2]) * inv_det;
        let r1 = self.cols[2].cross(self.cols[0]) * inv_det;
        let r2 = self.cols[0].cross(self.cols[1]) * inv_det;

        Some(Self::from_rows(r0, r1, r2))
    }

    #[inline]
    pub fn transform_vec(self, v: Vec3) -> Vec3 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }

    #[inline]
    pub fn col(self, index: usize) -> Vec3 {
        self.cols[index]
    }

    #[inline]
    pub fn row(self, index: usize) -> Vec3 {
        Vec3::new(self.cols[0][index], self.cols[1][index], self.cols[2][index])
    }

    #[inline]
    pub fn diagonal(self) -> Vec3 {
        Vec3::new(self.cols[0].x, self.cols[1].y, self.cols[2].z)
    }

    #[inline]
    pub fn scale(self, s: f32) -> Self {
        Self::from_cols(self.cols[0] * s, self.cols[1] * s, self.cols[2] * s)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.cols.iter().all(|c| c.is_finite())
    }

    #[inline]
    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (0..3).all(|i| (self.cols[i] - other.cols[i]).magnitude_squared() < epsilon * epsilon)
    }
}

impl Add for Mat3 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::from_cols(
            self.cols[0] + other.cols[0],
            self.cols[1] + other.cols[1],
            self.cols[2] + other.cols[2],
        )
    }
}

impl AddAssign for Mat3 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Mat3 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::from_cols(
            self.cols[0] - other.cols[0],
            self.cols[1] - other.cols[1],
            self.cols[2] - other.cols[2],
        )
    }
}

impl SubAssign for Mat3 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        Self::from_cols(
            self.transform_vec(other.cols[0]),
            self.transform_vec(other.cols[1]),
            self.transform_vec(other.cols[2]),
        )
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.transform_vec(v)
    }
}

impl Mul<f32> for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, s: f32) -> Self {
        self.scale(s)
    }
}

impl Mul<Mat3> for f32 {
    type Output = Mat3;

    #[inline]
    fn mul(self, m: Mat3) -> Mat3 {
        m.scale(self)
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

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn sample() -> Mat3 {
        Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0)
    }

    #[test]
    fn test_row_major_constructor() {
        let m = sample();
        assert!(vec3_approx_eq(m.row(0), Vec3::new(1.0, 2.0, 3.0)));
        assert!(vec3_approx_eq(m.col(0), Vec3::new(1.0, 4.0, 7.0)));
        assert!(vec3_approx_eq(m * Vec3::X, Vec3::new(1.0, 4.0, 7.0)));
    }

    #[test]
    fn test_addition_and_subtraction() {
        let m = sample();
        let sum = m + Mat3::IDENTITY;
        assert!(vec3_approx_eq(sum.diagonal(), Vec3::new(2.0, 6.0, 11.0)));
        assert!((sum - Mat3::IDENTITY).approx_eq(m, EPSILON));
    }

    #[test]
    fn test_multiplication() {
        let a = Mat3::new(1.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let b = Mat3::new(1.0, 0.0, 0.0, 3.0, 1.0, 0.0, 0.0, 0.0, 2.0);
        let expected = Mat3::new(7.0, 2.0, 0.0, 3.0, 1.0, 0.0, 0.0, 0.0, 2.0);
        assert!((a * b).approx_eq(expected, EPSILON));
    }

    #[test]
    fn test_multiplication_by_scalar() {
        let m = sample() * 2.0;
        assert!(vec3_approx_eq(m.row(2), Vec3::new(14.0, 16.0, 20.0)));
        assert!((0.5 * m).approx_eq(sample(), EPSILON));
    }

    #[test]
    fn test_transpose() {
        let mt = sample().transpose();
        assert!(vec3_approx_eq(mt.row(0), Vec3::new(1.0, 4.0, 7.0)));
        assert!(vec3_approx_eq(mt.row(2), Vec3::new(3.0, 6.0, 10.0)));
    }

    #[test]
    fn test_determinant() {
        assert!(approx_eq(Mat3::IDENTITY.determinant(), 1.0));
        assert!(approx_eq(Mat3::from_diagonal(Vec3::new(2.0, 3.0, 4.0)).determinant(), 24.0));
        assert!(approx_eq(sample().determinant(), -3.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let matrices = [
            sample(),
            Mat3::from_diagonal(Vec3::new(1.0, 2.0, 4.0)),
            Mat3::from_quat(Quat::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.9)),
            Mat3::new(2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0),
        ];
        for m in matrices {
            let inv = m.try_inverse().expect("non-singular");
            assert!((m * inv).approx_eq(Mat3::IDENTITY, 1e-4));
            assert!((inv * m).approx_eq(Mat3::IDENTITY, 1e-4));
        }
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let singular = Mat3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0);
        assert!(singular.try_inverse().is_none());
        assert!(Mat3::ZERO.try_inverse().is_none());
    }

    #[test]
    fn test_from_quat() {
        let q = Quat::from_axis_angle(Vec3::Z, PI / 2.0);
        let m = Mat3::from_quat(q);
        assert!(vec3_approx_eq(m * Vec3::X, Vec3::Y));
        // Rotation matrices are orthonormal.
        assert!((m * m.transpose()).approx_eq(Mat3::IDENTITY, EPSILON));
    }

    #[test]
    fn test_outer_product() {
        let m = Mat3::outer_product(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert!(vec3_approx_eq(m.row(0), Vec3::new(4.0, 5.0, 6.0)));
        assert!(vec3_approx_eq(m.row(2), Vec3::new(12.0, 15.0, 18.0)));
    }
}
