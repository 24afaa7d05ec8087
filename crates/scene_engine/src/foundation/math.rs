//! Math utilities and types
//!
//! Provides fundamental math types for 3D transforms and hierarchy
//! propagation. nalgebra is treated as a pure value-type dependency.

pub use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Extract the translation column of a homogeneous transform matrix
#[must_use]
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)])
}

/// Build a homogeneous rotation matrix about the X axis
#[must_use]
pub fn rotation_x(angle: f32) -> Mat4 {
    Mat4::new_rotation(Vec3::x() * angle)
}

/// Build a homogeneous rotation matrix about the Y axis
#[must_use]
pub fn rotation_y(angle: f32) -> Mat4 {
    Mat4::new_rotation(Vec3::y() * angle)
}

/// Build a homogeneous rotation matrix about the Z axis
#[must_use]
pub fn rotation_z(angle: f32) -> Mat4 {
    Mat4::new_rotation(Vec3::z() * angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_translation_extraction() {
        let matrix = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(
            translation_of(&matrix),
            Vec3::new(1.0, 2.0, 3.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_axis_rotations_are_right_handed() {
        // Rotating +X by 90 degrees around Z should give +Y
        let rotated = rotation_z(PI / 2.0).transform_vector(&Vec3::x());
        assert_relative_eq!(rotated, Vec3::y(), epsilon = EPSILON);

        // Rotating +Y by 90 degrees around X should give +Z
        let rotated = rotation_x(PI / 2.0).transform_vector(&Vec3::y());
        assert_relative_eq!(rotated, Vec3::z(), epsilon = EPSILON);

        // Rotating +Z by 90 degrees around Y should give +X
        let rotated = rotation_y(PI / 2.0).transform_vector(&Vec3::z());
        assert_relative_eq!(rotated, Vec3::x(), epsilon = EPSILON);
    }
}
