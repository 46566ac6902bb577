//! Render boundary
//!
//! The scene never issues draw calls. Each frame it collects a
//! [`RenderFrame`] of plain draw records for one camera and hands it to a
//! [`RenderSink`] supplied by the host.

use super::{Entity, Scene};
use crate::ecs::components::{CameraComponent, CircleComponent, SpriteComponent};
use crate::foundation::math::{Mat4, Vec4};

/// Camera matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCamera {
    /// Projection matrix
    pub projection: Mat4,
    /// View matrix (inverse of the camera's world matrix)
    pub view: Mat4,
}

impl Default for RenderCamera {
    fn default() -> Self {
        Self {
            projection: Mat4::identity(),
            view: Mat4::identity(),
        }
    }
}

impl RenderCamera {
    /// Create from explicit matrices, e.g. an editor camera
    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self { projection, view }
    }

    /// Camera component placed at a world matrix
    pub fn from_scene_camera(camera: &CameraComponent, world: &Mat4) -> Self {
        Self {
            projection: camera.camera.projection_matrix(),
            view: world.try_inverse().unwrap_or_else(Mat4::identity),
        }
    }

    /// Combined projection * view
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// A flat-colored quad
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    /// Source entity
    pub entity: Entity,
    /// World matrix
    pub transform: Mat4,
    /// RGBA color
    pub color: Vec4,
    /// Texture tiling factor
    pub tiling_factor: f32,
}

/// A disc or ring
#[derive(Debug, Clone, PartialEq)]
pub struct CircleDraw {
    /// Source entity
    pub entity: Entity,
    /// World matrix
    pub transform: Mat4,
    /// RGBA color
    pub color: Vec4,
    /// Ring thickness
    pub thickness: f32,
    /// Edge softness
    pub fade: f32,
}

/// Everything to draw for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    /// Viewing camera
    pub camera: RenderCamera,
    /// Quads in storage order
    pub sprites: Vec<SpriteDraw>,
    /// Circles in storage order
    pub circles: Vec<CircleDraw>,
}

impl RenderFrame {
    /// Number of draw records
    pub fn draw_count(&self) -> usize {
        self.sprites.len() + self.circles.len()
    }
}

/// Consumer of collected frames
pub trait RenderSink {
    /// Receive one frame
    fn submit(&mut self, frame: &RenderFrame);
}

impl<F: FnMut(&RenderFrame)> RenderSink for F {
    fn submit(&mut self, frame: &RenderFrame) {
        self(frame);
    }
}

/// Sink that drops every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn submit(&mut self, _frame: &RenderFrame) {}
}

impl Scene {
    /// Camera of the primary camera entity
    pub fn primary_render_camera(&self) -> Option<RenderCamera> {
        let entity = self.primary_camera_entity();
        if entity.is_null() {
            return None;
        }
        let world = self.world_transform_of(entity.id()).to_matrix();
        Some(RenderCamera::from_scene_camera(self.get_component::<CameraComponent>(entity), &world))
    }

    /// Gather draw records for every renderable entity
    pub fn collect_render_frame(&self, camera: RenderCamera) -> RenderFrame {
        let sprites = self
            .registry
            .iter::<SpriteComponent>()
            .map(|(id, sprite)| SpriteDraw {
                entity: Entity::new(id, self.id()),
                transform: self.world_transform_of(id).to_matrix(),
                color: sprite.color,
                tiling_factor: sprite.tiling_factor,
            })
            .collect();

        let circles = self
            .registry
            .iter::<CircleComponent>()
            .map(|(id, circle)| CircleDraw {
                entity: Entity::new(id, self.id()),
                transform: self.world_transform_of(id).to_matrix(),
                color: circle.color,
                thickness: circle.thickness,
                fade: circle.fade,
            })
            .collect();

        RenderFrame { camera, sprites, circles }
    }

    /// Submit a frame through the primary camera, if there is one
    pub(super) fn render_runtime(&self, sink: &mut dyn RenderSink) {
        match self.primary_render_camera() {
            Some(camera) => sink.submit(&self.collect_render_frame(camera)),
            None => log::trace!("No primary camera in scene '{}', skipping frame", self.name()),
        }
    }

    /// Submit a frame through an externally supplied camera
    pub(super) fn render_with_camera(&self, camera: &RenderCamera, sink: &mut dyn RenderSink) {
        sink.submit(&self.collect_render_frame(*camera));
    }
}
