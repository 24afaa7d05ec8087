//! Transform component
//!
//! Pure data: local position, Euler rotation, and scale, plus the cached
//! world matrix maintained by the transform system. The cached fields
//! (`world_matrix`, `dirty`, `depth`) are only written through the sanctioned
//! setters and the transform pass; downstream systems read them but never
//! mutate them directly.

use crate::foundation::math::{rotation_x, rotation_y, rotation_z, translation_of, Mat4, Vec3};

/// Spatial transform with a cached world matrix
///
/// The local matrix composition order is fixed as
/// `translation * rot_x * rot_y * rot_z * scale`. Serialized content and the
/// tests depend on this exact order; changing it breaks numeric
/// compatibility without raising any error.
#[derive(Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    world_matrix: Mat4,
    dirty: bool,
    depth: u32,
    is_world: bool,
}

impl Clone for Transform {
    fn clone(&self) -> Self {
        Self {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            world_matrix: self.world_matrix,
            // A clone may land under a different parent, so its cached world
            // matrix cannot be trusted; force a recompute like `Default` does.
            dirty: true,
            depth: self.depth,
            is_world: self.is_world,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            world_matrix: Mat4::identity(),
            // New transforms need a first recompute pass.
            dirty: true,
            depth: 0,
            is_world: false,
        }
    }
}

impl Transform {
    /// Create an identity transform
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set position
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set Euler rotation (radians, applied X then Y then Z)
    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set scale (uniform)
    #[must_use]
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Builder pattern: Ignore the parent chain, local == world
    #[must_use]
    pub const fn with_is_world(mut self, is_world: bool) -> Self {
        self.is_world = is_world;
        self
    }

    /// Local position
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Local Euler rotation in radians (applied X then Y then Z)
    #[must_use]
    pub const fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Local scale factors
    #[must_use]
    pub const fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Whether this transform ignores its parent
    #[must_use]
    pub const fn is_world(&self) -> bool {
        self.is_world
    }

    /// Whether the cached world matrix is stale
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Tree depth, refreshed each frame by the transform system
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// The cached world matrix
    ///
    /// Valid (not stale) whenever `is_dirty` is false after a transform pass.
    #[must_use]
    pub const fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    /// World-space position from the cached world matrix
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        translation_of(&self.world_matrix)
    }

    /// Set the local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    /// Offset the local position
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.dirty = true;
    }

    /// Set the local Euler rotation (radians)
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Offset the local Euler rotation (radians)
    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation += delta;
        self.dirty = true;
    }

    /// Set the local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Set or clear the ignore-parent flag
    pub fn set_is_world(&mut self, is_world: bool) {
        self.is_world = is_world;
        self.dirty = true;
    }

    /// Compose the local matrix: `translation * rot_x * rot_y * rot_z * scale`
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * rotation_x(self.rotation.x)
            * rotation_y(self.rotation.y)
            * rotation_z(self.rotation.z)
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    pub(crate) fn set_world_matrix(&mut self, world_matrix: Mat4) {
        self.world_matrix = world_matrix;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_defaults() {
        let transform = Transform::identity();
        assert_eq!(transform.position(), Vec3::zeros());
        assert_eq!(transform.rotation(), Vec3::zeros());
        assert_eq!(transform.scale(), Vec3::new(1.0, 1.0, 1.0));
        assert!(transform.is_dirty(), "new transforms start dirty");
        assert!(!transform.is_world());
    }

    #[test]
    fn test_local_matrix_composition_order() {
        // The fixed order is translation, then X/Y/Z rotations, then scale.
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(0.3, 0.5, 0.7))
            .with_scale(Vec3::new(2.0, 1.5, 0.5));

        let expected = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0))
            * Mat4::new_rotation(Vec3::x() * 0.3)
            * Mat4::new_rotation(Vec3::y() * 0.5)
            * Mat4::new_rotation(Vec3::z() * 0.7)
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.5, 0.5));

        assert_relative_eq!(transform.local_matrix(), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_applied_x_then_y_then_z() {
        // With X=90deg and Y=90deg the result differs from Y-then-X; pin the
        // point a pure +Z vector lands on to lock the order in.
        let transform =
            Transform::identity().with_rotation(Vec3::new(PI / 2.0, PI / 2.0, 0.0));
        let rotated = transform.local_matrix().transform_vector(&Vec3::z());

        // Rx maps +Z to -Y... applied after Ry: M = Rx * Ry, so +Z first goes
        // through Ry (+Z -> +X), then Rx leaves +X alone.
        assert_relative_eq!(rotated, Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_setters_mark_dirty() {
        let mut transform = Transform::identity();
        transform.clear_dirty();

        transform.translate(Vec3::new(1.0, 0.0, 0.0));
        assert!(transform.is_dirty());
        transform.clear_dirty();

        transform.set_rotation(Vec3::new(0.1, 0.0, 0.0));
        assert!(transform.is_dirty());
        transform.clear_dirty();

        transform.set_scale(Vec3::new(2.0, 2.0, 2.0));
        assert!(transform.is_dirty());
        transform.clear_dirty();

        transform.set_is_world(true);
        assert!(transform.is_dirty());
    }

    #[test]
    fn test_clone_starts_dirty() {
        let mut original = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        original.set_world_matrix(Mat4::new_translation(&Vec3::new(9.0, 9.0, 9.0)));
        original.clear_dirty();

        let copy = original.clone();
        assert_eq!(copy.position(), original.position());
        assert!(copy.is_dirty(), "a clone's cached matrix is not trustworthy");
        assert!(!original.is_dirty());
    }

    #[test]
    fn test_world_position_reads_cached_matrix() {
        let mut transform = Transform::identity();
        transform.set_world_matrix(Mat4::new_translation(&Vec3::new(4.0, 5.0, 6.0)));
        assert_relative_eq!(
            transform.world_position(),
            Vec3::new(4.0, 5.0, 6.0),
            epsilon = EPSILON
        );
    }
}
