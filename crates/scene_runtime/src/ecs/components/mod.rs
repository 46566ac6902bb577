//! ECS Components module
//!
//! Every component a scene knows how to persist, simulate, script or render.

pub mod id;
pub mod tag;
pub mod transform;
pub mod hierarchy;
pub mod script;
pub mod physics;
pub mod camera;
pub mod render;

pub use id::{IDComponent, Uuid};
pub use tag::TagComponent;
pub use transform::{TransformComponent, WorldTransformComponent};
pub use hierarchy::{ChildComponent, ParentComponent};
pub use script::ScriptComponent;
pub use physics::{BoxCollider2DComponent, CircleCollider2DComponent, RigidBodyType, Rigidbody2DComponent};
pub use camera::{CameraComponent, ProjectionType, SceneCamera};
pub use render::{CircleComponent, SpriteComponent};
