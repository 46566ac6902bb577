//! # Scene Runtime
//!
//! The runtime substrate of a 2D/3D editor: entity and component storage, a
//! scene that can be edited, played and simulated in place, a rapier2d
//! physics bridge and a rhai scripting bridge.
//!
//! ## Features
//!
//! - **Sparse-set ECS**: typed component storages with add/remove hooks
//! - **Edit / Play / Simulation**: snapshot on entry, restore on stop
//! - **2D Physics**: rigid bodies and colliders synced back into transforms
//! - **Scripting**: reflected per-entity fields and lifecycle hooks
//! - **RON scenes**: save, load and snapshot through one format
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_runtime::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::load_or_default("runtime.toml");
//!     scene_runtime::foundation::logging::init_with_level(&config.log_level);
//!
//!     let mut scene = Scene::new("Level");
//!     let ball = scene.create_entity("Ball");
//!     scene.add_component(ball, Rigidbody2DComponent::new(RigidBodyType::Dynamic));
//!     scene.add_component(ball, CircleCollider2DComponent::default());
//!
//!     let mut controller = SceneController::new(scene, config);
//!     controller.play()?;
//!     for _ in 0..60 {
//!         controller.on_update(Timestep::from_seconds(1.0 / 60.0), &RenderCamera::default(), &mut NullRenderSink)?;
//!     }
//!     controller.stop()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod scripting;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig, RuntimeConfig, ScriptConfig},
        ecs::components::{
            BoxCollider2DComponent, CameraComponent, CircleCollider2DComponent, CircleComponent, IDComponent,
            RigidBodyType, Rigidbody2DComponent, ScriptComponent, SpriteComponent, TagComponent,
            TransformComponent, Uuid,
        },
        ecs::{Component, EntityId, Registry},
        foundation::{
            math::{Mat4, Quat, Transform, Vec2, Vec3, Vec4},
            time::Timestep,
        },
        physics::PhysicsWorld2D,
        scene::{
            Entity, NullRenderSink, RenderCamera, RenderFrame, RenderSink, Scene, SceneController,
            SceneSerializer, SceneState, StateError,
        },
        scripting::{ScriptEngine, ScriptError, ScriptFieldValue},
    };
}
