//! Scene runtime
//!
//! The scene is the world being edited and played. It bridges the component
//! registry with the physics and scripting runtimes and hands finished
//! frames to the renderer.
//!
//! ## Architecture
//!
//! ```text
//! SceneController (Edit / Play / Simulation)
//!      ↓
//! Scene (registry + uuid index + physics world)
//!      ↓                ↓
//! ScriptEngine     PhysicsWorld2D
//!      ↓
//! RenderSink (host renderer)
//! ```
//!
//! Each Play frame runs every script update hook, applies the queued script
//! commands, steps physics, writes body poses back into transforms and
//! submits a [`RenderFrame`] through the primary camera.

mod entity;
mod render;
mod runtime;
mod serializer;
mod state;
mod world;

pub use entity::{Entity, SceneId};
pub use render::{CircleDraw, NullRenderSink, RenderCamera, RenderFrame, RenderSink, SpriteDraw};
pub use serializer::{FileSnapshot, MemorySnapshot, SceneSerializer, SerializationError, SnapshotStore};
pub use state::{SceneController, SceneState, StateError};
pub use world::{Scene, ScriptBinding};
