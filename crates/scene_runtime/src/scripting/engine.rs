//! Scripting bridge
//!
//! Owns the interpreter, the compiled classes, every entity's field values
//! and, while the runtime is running, one live instance per scripted entity.
//!
//! Per entity the bridge moves through `Unbound -> Loaded -> Instantiated ->
//! Unbound`: [`ScriptEngine::load_script`] binds an entity to a class and
//! gives it a field map, [`ScriptEngine::instantiate_entity`] builds the live
//! object at runtime start, and [`ScriptEngine::unload_script`] releases
//! everything the entity held.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rhai::{CallFnOptions, Dynamic, Engine, Scope, FLOAT};
use thiserror::Error;

use super::api::register_api;
use super::class::{ON_CREATE, ON_UPDATE};
use super::{ScriptClass, ScriptCommand, ScriptContext, ScriptFieldMap, ScriptFieldType, ScriptFieldValue, ScriptInstance};
use crate::config::ScriptConfig;
use crate::ecs::components::Uuid;
use crate::foundation::time::Timestep;
use crate::scene::Scene;

/// Scripting bridge errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// No module file for the class
    #[error("Script module not found: {0}")]
    ModuleNotFound(String),

    /// Module file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Module failed to compile
    #[error("Failed to compile script class '{class}': {message}")]
    Compile {
        /// Class name
        class: String,
        /// Interpreter message
        message: String,
    },

    /// Module body raised while being evaluated for reflection
    #[error("Failed to evaluate script class '{class}': {message}")]
    Evaluate {
        /// Class name
        class: String,
        /// Interpreter message
        message: String,
    },

    /// Class is not loaded
    #[error("Script class not loaded: {0}")]
    ClassNotLoaded(String),

    /// Class has no field with this name
    #[error("Script class '{class}' has no field '{field}'")]
    UnknownField {
        /// Class name
        class: String,
        /// Field name
        field: String,
    },

    /// Value kind differs from the declared field kind
    #[error("Field '{field}' is {expected}, got {actual}")]
    FieldTypeMismatch {
        /// Field name
        field: String,
        /// Declared kind
        expected: ScriptFieldType,
        /// Offered kind
        actual: ScriptFieldType,
    },

    /// Entity is not bound to any class
    #[error("Entity {0} is not bound to a script class")]
    NotBound(Uuid),
}

/// Embedded interpreter bridge
pub struct ScriptEngine {
    engine: Engine,
    scripts_folder: PathBuf,
    classes: HashMap<String, ScriptClass>,
    bindings: HashMap<Uuid, String>,
    field_maps: HashMap<Uuid, ScriptFieldMap>,
    instances: HashMap<Uuid, ScriptInstance>,
    context: Option<ScriptContext>,
}

impl ScriptEngine {
    /// Create the bridge with the runtime API registered
    pub fn new(config: &ScriptConfig) -> Self {
        let mut engine = Engine::new();
        engine.set_fast_operators(true);
        register_api(&mut engine);

        if !config.scripts_folder.is_dir() {
            log::warn!(
                "Scripts folder does not exist: {}",
                config.scripts_folder.display()
            );
        }

        Self {
            engine,
            scripts_folder: config.scripts_folder.clone(),
            classes: HashMap::new(),
            bindings: HashMap::new(),
            field_maps: HashMap::new(),
            instances: HashMap::new(),
            context: None,
        }
    }

    /// Folder class modules are loaded from
    pub fn scripts_folder(&self) -> &Path {
        &self.scripts_folder
    }

    /// Change the module folder; already compiled classes are kept
    pub fn set_scripts_folder(&mut self, folder: impl Into<PathBuf>) {
        self.scripts_folder = folder.into();
    }

    /// Class names available in the scripts folder, sorted
    pub fn available_modules(&self) -> Result<Vec<String>, ScriptError> {
        let mut modules = Vec::new();
        for entry in std::fs::read_dir(&self.scripts_folder)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("rhai") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                modules.push(stem.to_string());
            }
        }
        modules.sort();
        Ok(modules)
    }

    /// Bind an entity to a class, loading or reloading the class
    pub fn load_script(&mut self, class_name: &str, entity: Uuid) -> Result<(), ScriptError> {
        if self.classes.contains_key(class_name) {
            self.bind(class_name, entity);
            return self.reload_script(class_name, entity);
        }

        let class = match ScriptClass::load(&self.engine, class_name, &self.scripts_folder) {
            Ok(class) => class,
            Err(e) => {
                log::error!("Failed to load script class '{}': {}", class_name, e);
                self.unload_script(class_name, entity);
                return Err(e);
            }
        };

        log::info!("Loaded script class '{}' for entity {}", class_name, entity);
        self.classes.insert(class_name.to_string(), class);
        self.bind(class_name, entity);
        Ok(())
    }

    /// Recompile a loaded class and migrate every bound entity's fields
    ///
    /// On failure the class is unloaded for `entity`.
    pub fn reload_script(&mut self, class_name: &str, entity: Uuid) -> Result<(), ScriptError> {
        match ScriptClass::load(&self.engine, class_name, &self.scripts_folder) {
            Ok(class) => {
                self.install_reloaded(class);
                log::info!("Reloaded script class '{}'", class_name);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to reload script class '{}': {}", class_name, e);
                self.unload_script(class_name, entity);
                Err(e)
            }
        }
    }

    /// Recompile every loaded class, returning how many succeeded
    ///
    /// A class that fails keeps its previously compiled version.
    pub fn reload_all(&mut self) -> usize {
        let mut names: Vec<String> = self.classes.keys().cloned().collect();
        names.sort();

        let mut reloaded = 0;
        for name in names {
            match ScriptClass::load(&self.engine, &name, &self.scripts_folder) {
                Ok(class) => {
                    self.install_reloaded(class);
                    reloaded += 1;
                }
                Err(e) => log::error!("Failed to reload script class '{}', keeping previous version: {}", name, e),
            }
        }

        log::info!("Reloaded {} script classes", reloaded);
        reloaded
    }

    /// Release everything `entity` holds for `class_name`
    ///
    /// The class itself is dropped once no entity is bound to it.
    pub fn unload_script(&mut self, class_name: &str, entity: Uuid) {
        let bound_here = self.bindings.get(&entity).map_or(true, |bound| bound == class_name);
        if bound_here {
            self.instances.remove(&entity);
            self.field_maps.remove(&entity);
            self.bindings.remove(&entity);
        }

        if !self.bindings.values().any(|bound| bound == class_name) && self.classes.remove(class_name).is_some() {
            log::info!("Unloaded script class '{}'", class_name);
        }
    }

    /// Release every binding whose entity fails `keep`
    pub fn retain_entities(&mut self, keep: impl Fn(Uuid) -> bool) {
        let stale: Vec<(Uuid, String)> = self
            .bindings
            .iter()
            .filter(|(entity, _)| !keep(**entity))
            .map(|(entity, class_name)| (*entity, class_name.clone()))
            .collect();
        for (entity, class_name) in stale {
            self.unload_script(&class_name, entity);
        }
    }

    /// Whether a class is compiled
    pub fn is_class_loaded(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Compiled class by name
    pub fn class(&self, class_name: &str) -> Option<&ScriptClass> {
        self.classes.get(class_name)
    }

    /// Class an entity is bound to
    pub fn bound_class(&self, entity: Uuid) -> Option<&str> {
        self.bindings.get(&entity).map(String::as_str)
    }

    /// Field values of an entity
    pub fn field_map(&self, entity: Uuid) -> Option<&ScriptFieldMap> {
        self.field_maps.get(&entity)
    }

    /// Edit one field of an entity, updating its live instance when running
    pub fn set_field_value(&mut self, entity: Uuid, name: &str, value: ScriptFieldValue) -> Result<(), ScriptError> {
        let class_name = self.bindings.get(&entity).ok_or(ScriptError::NotBound(entity))?;
        let class = self
            .classes
            .get(class_name)
            .ok_or_else(|| ScriptError::ClassNotLoaded(class_name.clone()))?;
        let field = class.field(name).ok_or_else(|| ScriptError::UnknownField {
            class: class_name.clone(),
            field: name.to_string(),
        })?;
        if field.ty != value.field_type() {
            return Err(ScriptError::FieldTypeMismatch {
                field: name.to_string(),
                expected: field.ty,
                actual: value.field_type(),
            });
        }

        let default = field.default;
        let storage = self
            .field_maps
            .entry(entity)
            .or_default()
            .entry(name.to_string())
            .or_insert(default);
        storage.set(value);

        if let Some(instance) = self.instances.get_mut(&entity) {
            instance.set_field_value(name, value);
        }
        Ok(())
    }

    /// Current value of a field on the live instance
    pub fn instance_field_value(&self, entity: Uuid, name: &str) -> Option<ScriptFieldValue> {
        self.instances.get(&entity)?.field_value(name)
    }

    /// Copy an entity's binding and field values onto another entity
    pub fn copy_fields(&mut self, from: Uuid, to: Uuid) {
        let Some(class_name) = self.bindings.get(&from).cloned() else {
            return;
        };
        let fields = self.field_maps.get(&from).cloned().unwrap_or_default();
        self.bindings.insert(to, class_name);
        self.field_maps.insert(to, fields);
    }

    /// Open a runtime session
    pub fn on_runtime_start(&mut self) {
        self.instances.clear();
        self.context = Some(ScriptContext::new());
    }

    /// Close the runtime session, releasing every instance
    pub fn on_runtime_stop(&mut self) {
        let released = self.instances.len();
        self.instances.clear();
        self.context = None;
        log::debug!("Released {} script instances", released);
    }

    /// Whether a runtime session is open
    pub fn is_running(&self) -> bool {
        self.context.is_some()
    }

    /// Refresh the script-visible view of the scene
    pub fn sync_context(&self, scene: &Scene) {
        if let Some(context) = &self.context {
            context.sync(scene);
        }
    }

    /// Build the live object for an entity
    pub fn instantiate_entity(&mut self, entity: Uuid, class_name: &str, entity_name: &str) -> Result<(), ScriptError> {
        self.ensure_bound(class_name, entity)?;
        let class = self
            .classes
            .get(class_name)
            .ok_or_else(|| ScriptError::ClassNotLoaded(class_name.to_string()))?;
        let instance = ScriptInstance::new(class, entity, entity_name, self.field_maps.get(&entity));
        self.instances.insert(entity, instance);
        Ok(())
    }

    /// Run the creation hook of an entity's instance
    pub fn on_create_entity(&mut self, entity: Uuid) {
        self.invoke(entity, ON_CREATE, None);
    }

    /// Run the per-frame hook of an entity's instance
    pub fn on_update_entity(&mut self, entity: Uuid, ts: Timestep) {
        self.invoke(entity, ON_UPDATE, Some(ts.as_seconds()));
    }

    /// Live instance of an entity
    pub fn instance(&self, entity: Uuid) -> Option<&ScriptInstance> {
        self.instances.get(&entity)
    }

    /// Number of live instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Take the world mutations queued by scripts
    pub fn drain_commands(&self) -> Vec<ScriptCommand> {
        self.context.as_ref().map(ScriptContext::drain_commands).unwrap_or_default()
    }

    /// Whether a script asked to stop the runtime, clearing the request
    pub fn take_stop_request(&self) -> bool {
        self.context.as_ref().is_some_and(ScriptContext::take_stop_request)
    }

    fn bind(&mut self, class_name: &str, entity: Uuid) {
        if let Some(previous) = self.bindings.get(&entity).cloned() {
            if previous != class_name {
                self.unload_script(&previous, entity);
            }
        }
        self.bindings.insert(entity, class_name.to_string());

        if let Some(class) = self.classes.get(class_name) {
            let map = self.field_maps.entry(entity).or_default();
            class.migrate_field_map(map);
        }
    }

    fn ensure_bound(&mut self, class_name: &str, entity: Uuid) -> Result<(), ScriptError> {
        if self.bound_class(entity) == Some(class_name) && self.is_class_loaded(class_name) {
            return Ok(());
        }
        if self.is_class_loaded(class_name) {
            self.bind(class_name, entity);
            return Ok(());
        }
        self.load_script(class_name, entity)
    }

    fn install_reloaded(&mut self, class: ScriptClass) {
        for (entity, bound) in &self.bindings {
            if bound == class.name() {
                class.migrate_field_map(self.field_maps.entry(*entity).or_default());
            }
        }
        self.classes.insert(class.name().to_string(), class);
    }

    fn invoke(&mut self, entity: Uuid, hook: &str, ts: Option<FLOAT>) {
        let Some(context) = self.context.clone() else {
            return;
        };
        let Some(instance) = self.instances.get_mut(&entity) else {
            return;
        };
        let Some(class) = self.classes.get(instance.class_name()) else {
            return;
        };

        let present = match ts {
            Some(_) => class.has_on_update(),
            None => class.has_on_create(),
        };
        if !present {
            return;
        }

        let entity_name = instance.entity_name().to_string();
        let mut scope = Scope::new();
        let options = CallFnOptions::new()
            .eval_ast(false)
            .rewind_scope(true)
            .bind_this_ptr(instance.this_mut());

        let result = match ts {
            Some(ts) => self
                .engine
                .call_fn_with_options::<Dynamic>(options, &mut scope, class.ast(), hook, (context, ts)),
            None => self
                .engine
                .call_fn_with_options::<Dynamic>(options, &mut scope, class.ast(), hook, (context,)),
        };

        if let Err(e) = result {
            log::error!("Script error in {}() of entity '{}': {}", hook, entity_name, e);
        }
    }
}
