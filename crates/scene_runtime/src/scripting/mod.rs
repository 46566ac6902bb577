//! Scripting bridge
//!
//! Binds entities to behaviour classes written in rhai. A class exposes
//! typed fields that the editor can edit per entity, plus optional
//! `on_create` and `on_update` hooks that run while the scene is playing.
//! Scripts reach the scene only through the [`ScriptContext`] passed as
//! their `world` argument.

mod api;
mod class;
mod context;
mod engine;
mod fields;
mod instance;

pub use class::{ScriptClass, ON_CREATE, ON_UPDATE};
pub use context::{from_script_id, to_script_id, ScriptCommand, ScriptContext};
pub use engine::{ScriptEngine, ScriptError};
pub use fields::{ScriptField, ScriptFieldMap, ScriptFieldStorage, ScriptFieldType, ScriptFieldValue};
pub use instance::{ScriptInstance, ID_KEY};
