//! Affine transforms in the renderer's 3x4 row-major layout

use nalgebra::{Matrix4, Vector3};

pub use crate::ffi::Transform;

impl Transform {
    /// The identity transform
    pub const IDENTITY: Self = Self {
        matrix: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    /// Take the top three rows of a homogeneous matrix
    pub fn from_matrix(matrix: &Matrix4<f32>) -> Self {
        let mut rows = [[0.0; 4]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = matrix[(r, c)];
            }
        }
        Self { matrix: rows }
    }

    /// Pure translation
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self::from_matrix(&Matrix4::new_translation(&translation))
    }

    /// Translation column
    pub fn translation(&self) -> Vector3<f32> {
        Vector3::new(self.matrix[0][3], self.matrix[1][3], self.matrix[2][3])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
