//! Transform components
//!
//! `TransformComponent` is the authored local transform, relative to the
//! parent entity when there is one. `WorldTransformComponent` caches the
//! hierarchy-composed result, refreshed by the scene each frame.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::{euler, Mat4, Quat, Transform as MathTransform, Vec3};

/// Local transform component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformComponent {
    /// Local translation
    pub translation: Vec3,

    /// Local rotation quaternion
    pub rotation: Quat,

    /// Local scale factors
    pub scale: Vec3,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from translation only
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to foundation math Transform for calculations
    pub fn to_math_transform(&self) -> MathTransform {
        MathTransform {
            position: self.translation,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Create from foundation math Transform
    pub fn from_math_transform(transform: &MathTransform) -> Self {
        Self {
            translation: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }

    /// Convert to transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        self.to_math_transform().to_matrix()
    }

    /// Rotation as euler angles in radians (x, y, z)
    pub fn euler_angles(&self) -> Vec3 {
        euler::from_quat(&self.rotation)
    }

    /// Set rotation from euler angles in radians (x, y, z)
    pub fn set_euler_angles(&mut self, angles: Vec3) {
        self.rotation = euler::to_quat(angles);
    }

    /// Builder pattern: Set rotation around Z (radians)
    pub fn with_rotation_z(mut self, angle: f32) -> Self {
        self.rotation = Quat::from_axis_angle(&Vec3::z_axis(), angle);
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

/// Resolved world-space transform
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldTransformComponent {
    /// Parent chain composed with the local transform
    pub transform: MathTransform,
}

impl Component for WorldTransformComponent {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_identity() {
        let transform = TransformComponent::identity();

        assert_eq!(transform.translation, Vec3::zeros());
        assert_relative_eq!(transform.rotation, Quat::identity(), epsilon = 1e-6);
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(transform.to_matrix(), Mat4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_euler_round_trip() {
        let mut transform = TransformComponent::default();
        transform.set_euler_angles(Vec3::new(0.0, 0.0, 0.75));

        assert_relative_eq!(transform.euler_angles(), Vec3::new(0.0, 0.0, 0.75), epsilon = 1e-5);
        assert_relative_eq!(
            transform.rotation,
            TransformComponent::default().with_rotation_z(0.75).rotation,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_math_transform_conversion() {
        let transform = TransformComponent::from_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation_z(0.3)
            .with_uniform_scale(2.0);

        let back = TransformComponent::from_math_transform(&transform.to_math_transform());
        assert_eq!(back, transform);
    }
}
