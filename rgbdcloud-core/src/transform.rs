//! Rigid transform between world and scanner coordinates

use crate::error::{Error, Result};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3×4 rigid transform `[R | t]`
///
/// PTX files hold points in the scanner frame, obtained from world points as
/// `R · (p − t)`. PCD only uses the translation, as the viewpoint origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl RigidTransform {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self { rotation, translation }
    }

    /// Build from a row-major 3×4 matrix `[R | t]`
    pub fn from_matrix3x4(m: [[f64; 4]; 3]) -> Self {
        let rotation = Matrix3::from_fn(|r, c| m[r][c]);
        let translation = Vector3::new(m[0][3], m[1][3], m[2][3]);
        Self { rotation, translation }
    }

    /// Express a world point in the scanner frame: `R · (p − t)`
    pub fn to_scanner_frame(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * (point.coords - self.translation))
    }

    /// Inverse of [`Self::to_scanner_frame`]: `Rᵀ · q + t`
    pub fn from_scanner_frame(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.transpose() * point.coords + self.translation)
    }

    /// The 4×4 block written after the PTX scanner axes: `[[Rᵀ, 0], [0, 0, 0, 1]]`.
    ///
    /// The translation row stays zero; readers that expect it to carry the scanner
    /// position will see the origin instead.
    pub fn ptx_block(&self) -> Matrix4<f64> {
        let mut m = Matrix4::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation.transpose());
        m[(3, 3)] = 1.0;
        m
    }

    /// Check that the rotation part is orthonormal within `epsilon`
    pub fn validate(&self, epsilon: f64) -> Result<()> {
        let residual = (self.rotation * self.rotation.transpose() - Matrix3::identity()).norm();
        if !residual.is_finite() || residual > epsilon {
            return Err(Error::InvalidData(format!(
                "rotation is not orthonormal (|R·Rᵀ − I| = {})",
                residual
            )));
        }
        Ok(())
    }

    /// Check if this is approximately the identity transformation
    pub fn is_identity(&self, epsilon: f64) -> bool {
        (self.rotation - Matrix3::identity()).norm() < epsilon && self.translation.norm() < epsilon
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}
