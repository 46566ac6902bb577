//! Scene camera component
//!
//! Holds the projection parameters for an in-world camera. The view matrix
//! comes from the owning entity's world transform.

use serde::{Deserialize, Serialize};

use crate::ecs::{Component, HookContext};
use crate::foundation::math::Mat4;

/// Projection kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionType {
    /// Perspective projection
    Perspective,
    /// Orthographic projection
    #[default]
    Orthographic,
}

/// Camera projection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCamera {
    projection_type: ProjectionType,

    perspective_fov: f32,
    perspective_near: f32,
    perspective_far: f32,

    orthographic_size: f32,
    orthographic_near: f32,
    orthographic_far: f32,

    aspect_ratio: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            projection_type: ProjectionType::Orthographic,
            perspective_fov: 45f32.to_radians(),
            perspective_near: 0.01,
            perspective_far: 1000.0,
            orthographic_size: 10.0,
            orthographic_near: -1.0,
            orthographic_far: 1.0,
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

impl SceneCamera {
    /// Create a default orthographic camera
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to orthographic projection
    pub fn set_orthographic(&mut self, size: f32, near: f32, far: f32) {
        self.projection_type = ProjectionType::Orthographic;
        self.orthographic_size = size;
        self.orthographic_near = near;
        self.orthographic_far = far;
    }

    /// Switch to perspective projection; `vertical_fov` in radians
    pub fn set_perspective(&mut self, vertical_fov: f32, near: f32, far: f32) {
        self.projection_type = ProjectionType::Perspective;
        self.perspective_fov = vertical_fov;
        self.perspective_near = near;
        self.perspective_far = far;
    }

    /// Update the aspect ratio from a viewport size
    ///
    /// A zero-sized viewport leaves the camera unchanged.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = width as f32 / height as f32;
        self.aspect_ratio = ratio;
    }

    /// Current projection kind
    pub fn projection_type(&self) -> ProjectionType {
        self.projection_type
    }

    /// Current aspect ratio
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Orthographic view height in world units
    pub fn orthographic_size(&self) -> f32 {
        self.orthographic_size
    }

    /// Vertical field of view in radians
    pub fn perspective_fov(&self) -> f32 {
        self.perspective_fov
    }

    /// Projection matrix for the current parameters
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_type {
            ProjectionType::Perspective => Mat4::new_perspective(
                self.aspect_ratio,
                self.perspective_fov,
                self.perspective_near,
                self.perspective_far,
            ),
            ProjectionType::Orthographic => {
                let half_height = self.orthographic_size * 0.5;
                let half_width = half_height * self.aspect_ratio;
                Mat4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.orthographic_near,
                    self.orthographic_far,
                )
            }
        }
    }
}

/// Camera component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraComponent {
    /// Projection parameters
    pub camera: SceneCamera,
    /// Whether this camera renders the running scene
    pub primary: bool,
    /// Ignore viewport resizes
    pub fixed_aspect_ratio: bool,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            camera: SceneCamera::default(),
            primary: true,
            fixed_aspect_ratio: false,
        }
    }
}

impl Component for CameraComponent {
    fn on_add(&mut self, ctx: &mut HookContext<'_>) {
        if self.fixed_aspect_ratio {
            return;
        }
        let (width, height) = ctx.viewport_size;
        self.camera.set_viewport_size(width, height);
    }
}
