use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use super::mat3::Mat3;
use super::quat::Quat;
use super::vec3::Vec3;

/// A 4x4 homogeneous transform, column-major like [`Mat3`].
///
/// Only produced for rendering front ends; the simulation itself works in
/// `Vec3`/`Mat3`/`Quat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Rigid transform: rotate by `rotation`, then translate by `translation`
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self::from_mat3_translation(rotation.to_mat3(), translation)
    }

    pub fn from_mat3_translation(basis: Mat3, translation: Vec3) -> Self {
        let c = basis.cols;
        Self {
            cols: [
                [c[0].x, c[0].y, c[0].z, 0.0],
                [c[1].x, c[1].y, c[1].z, 0.0],
                [c[2].x, c[2].y, c[2].z, 0.0],
                [translation.x, translation.y, translation.z, 1.0],
            ],
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_mat3_translation(Mat3::IDENTITY, translation)
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        let t = self.cols[3];
        Vec3::new(t[0], t[1], t[2])
    }

    /// Upper-left 3x3 block
    #[inline]
    pub fn basis(&self) -> Mat3 {
        let c = self.cols;
        Mat3::from_cols(
            Vec3::new(c[0][0], c[0][1], c[0][2]),
            Vec3::new(c[1][0], c[1][1], c[1][2]),
            Vec3::new(c[2][0], c[2][1], c[2][2]),
        )
    }

    /// Transforms a point (w = 1)
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.basis() * p + self.translation()
    }

    /// Transforms a direction (w = 0)
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.basis() * v
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::IDENTITY;
        for (c, col) in self.cols.iter().enumerate() {
            for (r, value) in col.iter().enumerate() {
                out.cols[r][c] = *value;
            }
        }
        out
    }

    /// Flat column-major array, the layout graphics APIs expect
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (c, col) in self.cols.iter().enumerate() {
            out[c * 4..c * 4 + 4].copy_from_slice(col);
        }
        out
    }
}

impl Mat4 {
    fn zip_with(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut out = self.cols;
        for (c, col) in out.iter_mut().enumerate() {
            for (r, value) in col.iter_mut().enumerate() {
                *value = f(*value, other.cols[c][r]);
            }
        }
        Self { cols: out }
    }
}

impl Add for Mat4 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}

impl Sub for Mat4 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}

impl Mul<f32> for Mat4 {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        self.zip_with(self, |a, _| a * s)
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (c, out_col) in out.iter_mut().enumerate() {
            for (r, value) in out_col.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.cols[k][r] * other.cols[c][k]).sum();
            }
        }
        Self { cols: out }
    }
}
