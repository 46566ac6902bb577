//! Renderable components
//!
//! Plain appearance records collected into the per-frame render frame. The
//! runtime never issues draw calls itself.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec4;

/// Flat-colored quad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteComponent {
    /// RGBA color
    pub color: Vec4,
    /// Texture tiling factor
    pub tiling_factor: f32,
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            tiling_factor: 1.0,
        }
    }
}

impl SpriteComponent {
    /// Create a sprite of the given color
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }
}

impl Component for SpriteComponent {}

/// Filled or ring-shaped circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleComponent {
    /// RGBA color
    pub color: Vec4,
    /// 1.0 is a filled disc, smaller values leave a hole
    pub thickness: f32,
    /// Edge softness
    pub fade: f32,
}

impl Default for CircleComponent {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            thickness: 1.0,
            fade: 0.005,
        }
    }
}

impl Component for CircleComponent {}
