//! Component trait and lifecycle hooks

use super::EntityId;

/// A script binding released by a component removal
///
/// Collected by the registry and drained by the owning scene, which forwards
/// it to the scripting bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedBinding {
    /// Entity the binding belonged to
    pub entity: EntityId,
    /// Script class that was bound
    pub class_name: String,
}

/// Context handed to component hooks
pub struct HookContext<'a> {
    /// Entity the component is attached to
    pub entity: EntityId,
    /// Current viewport size of the owning world
    pub viewport_size: (u32, u32),
    /// Outbound list of interpreter bindings to release
    pub released_bindings: &'a mut Vec<ReleasedBinding>,
}

/// Trait for components
///
/// `on_add` runs immediately after the component is stored; `on_remove`
/// runs before it is erased, including when its entity is destroyed.
pub trait Component: 'static + Send + Sync {
    /// Hook run right after insertion
    fn on_add(&mut self, _ctx: &mut HookContext<'_>) {}

    /// Hook run right before removal
    fn on_remove(&mut self, _ctx: &mut HookContext<'_>) {}
}
