//! Live script objects
//!
//! One instance exists per scripted entity while the runtime is running. Its
//! state is a rhai object map bound as `this` in every hook call.

use rhai::{Dynamic, Map};

use super::{to_script_id, ScriptClass, ScriptFieldMap, ScriptFieldValue};
use crate::ecs::components::Uuid;

/// Key under which the owning entity's id is stored on `this`
pub const ID_KEY: &str = "id";

/// A script object bound to one entity
pub struct ScriptInstance {
    class_name: String,
    entity: Uuid,
    entity_name: String,
    this: Dynamic,
}

impl ScriptInstance {
    /// Build an instance from class defaults overridden by the entity's field map
    pub fn new(class: &ScriptClass, entity: Uuid, entity_name: &str, fields: Option<&ScriptFieldMap>) -> Self {
        let mut map = Map::new();
        for field in class.fields() {
            let value = fields
                .and_then(|fields| fields.get(&field.name))
                .filter(|storage| storage.field_type() == field.ty)
                .copied()
                .unwrap_or(field.default);
            map.insert(field.name.as_str().into(), value.value().to_dynamic());
        }
        map.insert(ID_KEY.into(), Dynamic::from_int(to_script_id(entity)));

        Self {
            class_name: class.name().to_string(),
            entity,
            entity_name: entity_name.to_string(),
            this: Dynamic::from_map(map),
        }
    }

    /// Class this instance was built from
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Owning entity
    pub fn entity(&self) -> Uuid {
        self.entity
    }

    /// Owning entity's tag at instantiation
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Current value of a field
    pub fn field_value(&self, name: &str) -> Option<ScriptFieldValue> {
        let map = self.this.read_lock::<Map>()?;
        let value = map.get(name).and_then(ScriptFieldValue::from_dynamic);
        value
    }

    /// Overwrite a field on the live object
    pub fn set_field_value(&mut self, name: &str, value: ScriptFieldValue) {
        if let Some(mut map) = self.this.write_lock::<Map>() {
            map.insert(name.into(), value.to_dynamic());
        }
    }

    pub(crate) fn this_mut(&mut self) -> &mut Dynamic {
        &mut self.this
    }
}
