//! 2D physics components
//!
//! Authoring data for the physics bridge. The `runtime_*` handles are filled
//! in when Play or Simulation starts and cleared when it stops; they are
//! never serialized.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::physics::{BodyHandle, FixtureHandle};

/// Body simulation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RigidBodyType {
    /// Never moves
    #[default]
    Static,
    /// Moved by forces and collisions
    Dynamic,
    /// Moved only by explicit position changes
    Kinematic,
}

/// Rigid body component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rigidbody2DComponent {
    /// Simulation mode
    pub body_type: RigidBodyType,
    /// Lock rotation
    pub fixed_rotation: bool,
    /// Live body, only while the physics bridge is running
    #[serde(skip)]
    pub runtime_body: Option<BodyHandle>,
}

impl Rigidbody2DComponent {
    /// Create a body of the given type
    pub fn new(body_type: RigidBodyType) -> Self {
        Self {
            body_type,
            ..Default::default()
        }
    }

    /// Builder pattern: Lock rotation
    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }
}

impl Component for Rigidbody2DComponent {}

/// Box collider component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider2DComponent {
    /// Offset from the body origin
    pub offset: Vec2,
    /// Half extents before transform scale
    pub size: Vec2,
    /// Mass density
    pub density: f32,
    /// Friction coefficient
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
    /// Impact speed below which no bounce happens
    pub restitution_threshold: f32,
    /// Live fixture, only while the physics bridge is running
    #[serde(skip)]
    pub runtime_fixture: Option<FixtureHandle>,
}

impl Default for BoxCollider2DComponent {
    fn default() -> Self {
        Self {
            offset: Vec2::zeros(),
            size: Vec2::new(0.5, 0.5),
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            restitution_threshold: 0.5,
            runtime_fixture: None,
        }
    }
}

impl Component for BoxCollider2DComponent {}

/// Circle collider component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleCollider2DComponent {
    /// Offset from the body origin
    pub offset: Vec2,
    /// Radius before transform scale
    pub radius: f32,
    /// Mass density
    pub density: f32,
    /// Friction coefficient
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
    /// Impact speed below which no bounce happens
    pub restitution_threshold: f32,
    /// Live fixture, only while the physics bridge is running
    #[serde(skip)]
    pub runtime_fixture: Option<FixtureHandle>,
}

impl Default for CircleCollider2DComponent {
    fn default() -> Self {
        Self {
            offset: Vec2::zeros(),
            radius: 0.5,
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            restitution_threshold: 0.5,
            runtime_fixture: None,
        }
    }
}

impl Component for CircleCollider2DComponent {}
