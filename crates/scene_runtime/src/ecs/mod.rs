//! Entity-Component-System implementation
//!
//! Sparse-set component storage keyed by generational entity ids, with
//! per-type lifecycle hooks and multi-component views.

pub mod entity;
pub mod component;
pub mod storage;
pub mod query;
pub mod registry;
pub mod components;

pub use entity::EntityId;
pub use component::{Component, HookContext, ReleasedBinding};
pub use storage::{AnyStorage, ComponentStorage};
pub use query::{ComponentSet, View};
pub use registry::Registry;
