//! Scene hierarchy links
//!
//! Links are plain entity references, not ownership. The scene keeps both
//! sides consistent: every child listed by a parent carries a
//! `ChildComponent` pointing back, and destroying a parent destroys its
//! children first.

use crate::ecs::{Component, EntityId};

/// Children of an entity, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParentComponent {
    /// Direct children
    pub children: Vec<EntityId>,
}

impl Component for ParentComponent {}

/// Parent of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildComponent {
    /// Direct parent
    pub parent: EntityId,
}

impl Component for ChildComponent {}
