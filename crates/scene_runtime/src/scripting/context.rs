//! Script-facing world context
//!
//! Every hook receives a [`ScriptContext`] as its `world` argument. Reads are
//! served from a mirror of the scene captured at the start of the script
//! pass; writes are queued as [`ScriptCommand`]s that the scene applies once
//! every script has run. Writes also update the mirror, so a script reading
//! back its own change in the same frame sees it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rhai::{EvalAltResult, INT};

use crate::ecs::components::{IDComponent, Rigidbody2DComponent, TagComponent, TransformComponent, Uuid};
use crate::foundation::math::{Vec2, Vec3};
use crate::scene::Scene;

type ScriptResult<T> = Result<T, Box<EvalAltResult>>;

/// Convert a uuid to the integer id seen by scripts
#[allow(clippy::cast_possible_wrap)]
pub fn to_script_id(uuid: Uuid) -> INT {
    uuid.raw() as INT
}

/// Convert a script-side integer id back to a uuid
#[allow(clippy::cast_sign_loss)]
pub fn from_script_id(id: INT) -> Uuid {
    Uuid::from_raw(id as u64)
}

/// A deferred world mutation requested by a script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Replace the local translation
    SetTranslation {
        /// Target entity
        entity: Uuid,
        /// New translation
        translation: Vec3,
    },
    /// Replace the local rotation, as euler angles in radians
    SetRotation {
        /// Target entity
        entity: Uuid,
        /// New rotation
        rotation: Vec3,
    },
    /// Replace the local scale
    SetScale {
        /// Target entity
        entity: Uuid,
        /// New scale
        scale: Vec3,
    },
    /// Apply a linear impulse to the entity's body
    ApplyLinearImpulse {
        /// Target entity
        entity: Uuid,
        /// Impulse vector
        impulse: Vec2,
        /// World-space application point; center of mass when absent
        point: Option<Vec2>,
        /// Wake the body
        wake: bool,
    },
}

#[derive(Debug, Clone, Default)]
struct EntityMirror {
    name: String,
    transform: TransformComponent,
    has_rigidbody: bool,
    linear_velocity: Vec2,
}

#[derive(Default)]
struct ContextState {
    entities: HashMap<Uuid, EntityMirror>,
    names: Vec<(String, Uuid)>,
    commands: Vec<ScriptCommand>,
    stop_requested: bool,
}

/// Handle passed to scripts as `world`
#[derive(Clone, Default)]
pub struct ScriptContext {
    state: Rc<RefCell<ContextState>>,
}

impl ScriptContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the mirror from the scene
    pub fn sync(&self, scene: &Scene) {
        let registry = scene.registry();
        let mut state = self.state.borrow_mut();
        state.entities.clear();
        state.names.clear();

        for (id, tag) in registry.iter::<TagComponent>() {
            let Some(uuid) = registry.try_get::<IDComponent>(id).map(|c| c.id) else {
                continue;
            };
            let body = registry.try_get::<Rigidbody2DComponent>(id);
            let linear_velocity = body
                .and_then(|rb| rb.runtime_body)
                .zip(scene.physics())
                .and_then(|(handle, physics)| physics.linear_velocity(handle))
                .unwrap_or_else(Vec2::zeros);

            state.names.push((tag.tag.clone(), uuid));
            state.entities.insert(
                uuid,
                EntityMirror {
                    name: tag.tag.clone(),
                    transform: registry.try_get::<TransformComponent>(id).copied().unwrap_or_default(),
                    has_rigidbody: body.is_some(),
                    linear_velocity,
                },
            );
        }
    }

    /// Take every queued command in submission order
    pub fn drain_commands(&self) -> Vec<ScriptCommand> {
        std::mem::take(&mut self.state.borrow_mut().commands)
    }

    /// Whether a script asked to stop, clearing the request
    pub fn take_stop_request(&self) -> bool {
        std::mem::take(&mut self.state.borrow_mut().stop_requested)
    }

    fn with_entity<T>(&self, id: INT, read: impl FnOnce(&EntityMirror) -> T) -> ScriptResult<T> {
        let state = self.state.borrow();
        let value = state.entities.get(&from_script_id(id)).map(read);
        value.ok_or_else(|| format!("Unknown entity id {id}").into())
    }

    fn with_entity_mut(
        &self,
        id: INT,
        write: impl FnOnce(&mut EntityMirror) -> ScriptCommand,
    ) -> ScriptResult<()> {
        let mut state = self.state.borrow_mut();
        let Some(entity) = state.entities.get_mut(&from_script_id(id)) else {
            return Err(format!("Unknown entity id {id}").into());
        };
        let command = write(entity);
        state.commands.push(command);
        Ok(())
    }

    pub(crate) fn find_entity_by_name(&mut self, name: &str) -> INT {
        self.state
            .borrow()
            .names
            .iter()
            .find(|(tag, _)| tag == name)
            .map_or(0, |(_, uuid)| to_script_id(*uuid))
    }

    pub(crate) fn entity_name(&mut self, id: INT) -> ScriptResult<String> {
        self.with_entity(id, |e| e.name.clone())
    }

    pub(crate) fn translation(&mut self, id: INT) -> ScriptResult<Vec3> {
        self.with_entity(id, |e| e.transform.translation)
    }

    pub(crate) fn set_translation(&mut self, id: INT, translation: Vec3) -> ScriptResult<()> {
        self.with_entity_mut(id, |e| {
            e.transform.translation = translation;
            ScriptCommand::SetTranslation { entity: from_script_id(id), translation }
        })
    }

    pub(crate) fn rotation(&mut self, id: INT) -> ScriptResult<Vec3> {
        self.with_entity(id, |e| e.transform.euler_angles())
    }

    pub(crate) fn set_rotation(&mut self, id: INT, rotation: Vec3) -> ScriptResult<()> {
        self.with_entity_mut(id, |e| {
            e.transform.set_euler_angles(rotation);
            ScriptCommand::SetRotation { entity: from_script_id(id), rotation }
        })
    }

    pub(crate) fn scale(&mut self, id: INT) -> ScriptResult<Vec3> {
        self.with_entity(id, |e| e.transform.scale)
    }

    pub(crate) fn set_scale(&mut self, id: INT, scale: Vec3) -> ScriptResult<()> {
        self.with_entity_mut(id, |e| {
            e.transform.scale = scale;
            ScriptCommand::SetScale { entity: from_script_id(id), scale }
        })
    }

    pub(crate) fn has_rigidbody(&mut self, id: INT) -> ScriptResult<bool> {
        self.with_entity(id, |e| e.has_rigidbody)
    }

    pub(crate) fn linear_velocity(&mut self, id: INT) -> ScriptResult<Vec2> {
        self.with_entity(id, |e| e.linear_velocity)
    }

    pub(crate) fn apply_linear_impulse(
        &mut self,
        id: INT,
        impulse: Vec2,
        point: Vec2,
        wake: bool,
    ) -> ScriptResult<()> {
        self.with_entity_mut(id, |_| ScriptCommand::ApplyLinearImpulse {
            entity: from_script_id(id),
            impulse,
            point: Some(point),
            wake,
        })
    }

    pub(crate) fn apply_linear_impulse_to_center(
        &mut self,
        id: INT,
        impulse: Vec2,
        wake: bool,
    ) -> ScriptResult<()> {
        self.with_entity_mut(id, |_| ScriptCommand::ApplyLinearImpulse {
            entity: from_script_id(id),
            impulse,
            point: None,
            wake,
        })
    }

    pub(crate) fn request_stop(&mut self) {
        self.state.borrow_mut().stop_requested = true;
    }
}
