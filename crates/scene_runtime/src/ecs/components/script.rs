//! Script binding component

use serde::{Deserialize, Serialize};

use crate::ecs::{Component, HookContext, ReleasedBinding};

/// Binds an entity to a script class
///
/// Removing the component (or destroying its entity) releases the
/// interpreter-side binding through the owning scene.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptComponent {
    /// Script class name, resolved to `<scripts_folder>/<class_name>.rhai`
    pub class_name: String,
}

impl ScriptComponent {
    /// Create a binding to `class_name`
    pub fn new(class_name: impl Into<String>) -> Self {
        Self { class_name: class_name.into() }
    }
}

impl Component for ScriptComponent {
    fn on_remove(&mut self, ctx: &mut HookContext<'_>) {
        if self.class_name.is_empty() {
            return;
        }
        ctx.released_bindings.push(ReleasedBinding {
            entity: ctx.entity,
            class_name: self.class_name.clone(),
        });
    }
}
