//! 2D physics bridge
//!
//! [`PhysicsWorld2D`] owns the rapier2d simulation for one running scene.
//! Scenes create it on Play/Simulation start, step it every frame and drop
//! it on stop; components only ever see the typed handles defined here.

mod handles;
mod world;

pub use handles::{BodyHandle, FixtureHandle};
pub use world::{BodyDesc, BodyPose, FixtureMaterial, FixtureShape, PhysicsWorld2D};
