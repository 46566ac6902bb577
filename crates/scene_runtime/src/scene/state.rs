//! Edit / Play / Simulation state machine
//!
//! The controller owns the edited scene and sequences every transition:
//! snapshot on the way in, start the physics and scripting bridges, tear
//! them down and restore the snapshot on the way out. Transitions take
//! `&mut self`, so they can never run from inside a frame; scripts can only
//! ask for a stop, which is honoured at the next frame boundary.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use super::render::{RenderCamera, RenderSink};
use super::serializer::{MemorySnapshot, SceneSerializer, SerializationError, SnapshotStore};
use super::{Entity, Scene};
use crate::config::RuntimeConfig;
use crate::ecs::components::ScriptComponent;
use crate::foundation::time::Timestep;
use crate::scripting::{ScriptEngine, ScriptError};

/// Operating mode of the edited scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneState {
    /// Authoring; nothing runs
    #[default]
    Edit,
    /// Physics and scripts run
    Play,
    /// Physics runs, scripts do not
    Simulation,
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit => write!(f, "Edit"),
            Self::Play => write!(f, "Play"),
            Self::Simulation => write!(f, "Simulation"),
        }
    }
}

/// State machine errors
#[derive(Error, Debug)]
pub enum StateError {
    /// Operation not allowed in the current state
    #[error("Cannot {requested} while in {from} state")]
    InvalidTransition {
        /// Current state
        from: SceneState,
        /// Refused operation
        requested: &'static str,
    },

    /// Snapshot or restore failed
    #[error("Scene snapshot failed: {0}")]
    Snapshot(#[from] SerializationError),

    /// Script binding failed
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
}

/// Drives one scene through Edit, Play and Simulation
pub struct SceneController {
    state: SceneState,
    scene: Scene,
    scripts: ScriptEngine,
    snapshots: Box<dyn SnapshotStore>,
    config: RuntimeConfig,
    viewport: (u32, u32),
}

impl SceneController {
    /// Wrap a scene in Edit state with an in-memory snapshot store
    pub fn new(scene: Scene, config: RuntimeConfig) -> Self {
        let scripts = ScriptEngine::new(&config.scripting);
        Self {
            state: SceneState::Edit,
            scene,
            scripts,
            snapshots: Box::new(MemorySnapshot::new()),
            config,
            viewport: (0, 0),
        }
    }

    /// Builder pattern: Replace the snapshot store
    pub fn with_snapshot_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        self.snapshots = Box::new(store);
        self
    }

    /// Current state
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// The edited scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The edited scene, mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Scripting bridge
    pub fn scripts(&self) -> &ScriptEngine {
        &self.scripts
    }

    /// Scripting bridge, mutably
    pub fn scripts_mut(&mut self) -> &mut ScriptEngine {
        &mut self.scripts
    }

    /// Runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Enter Play
    ///
    /// From Simulation the simulation is stopped first. When the snapshot
    /// fails the controller stays in Edit and nothing is started.
    pub fn play(&mut self) -> Result<(), StateError> {
        match self.state {
            SceneState::Play => return Ok(()),
            SceneState::Simulation => self.stop()?,
            SceneState::Edit => {}
        }

        self.flush_released_scripts();
        if self.config.scripting.reload_scripts_on_start {
            self.scripts.reload_all();
        }

        self.take_snapshot()?;
        self.apply_viewport();
        self.scene.on_runtime_start(&self.config.physics, &mut self.scripts);
        self.state = SceneState::Play;
        log::info!("Entered Play for scene '{}'", self.scene.name());
        Ok(())
    }

    /// Enter Simulation
    ///
    /// From Play the runtime is stopped first. Same snapshot failure rule as
    /// [`SceneController::play`].
    pub fn simulate(&mut self) -> Result<(), StateError> {
        match self.state {
            SceneState::Simulation => return Ok(()),
            SceneState::Play => self.stop()?,
            SceneState::Edit => {}
        }

        self.flush_released_scripts();
        self.take_snapshot()?;
        self.apply_viewport();
        self.scene.on_simulation_start(&self.config.physics);
        self.state = SceneState::Simulation;
        log::info!("Entered Simulation for scene '{}'", self.scene.name());
        Ok(())
    }

    /// Return to Edit, undoing every runtime change
    ///
    /// Teardown always completes and the state is Edit afterwards, even when
    /// the restore itself reports an error.
    pub fn stop(&mut self) -> Result<(), StateError> {
        match self.state {
            SceneState::Edit => return Ok(()),
            SceneState::Play => self.scene.on_runtime_stop(&mut self.scripts),
            SceneState::Simulation => self.scene.on_simulation_stop(),
        }

        let from = self.state;
        self.state = SceneState::Edit;

        // Runtime destructions are undone by the restore
        self.scene.take_released_scripts();
        let restored = self.snapshots.restore(&mut self.scene);
        self.snapshots.discard();
        self.apply_viewport();
        self.prune_script_bindings();

        match restored {
            Ok(()) => {
                log::info!("Stopped {} for scene '{}'", from, self.scene.name());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to restore scene '{}' after {}: {}", self.scene.name(), from, e);
                Err(e.into())
            }
        }
    }

    /// Advance one frame in the current state
    ///
    /// A stop requested by a script during the frame runs after it.
    pub fn on_update(
        &mut self,
        ts: Timestep,
        editor_camera: &RenderCamera,
        sink: &mut dyn RenderSink,
    ) -> Result<(), StateError> {
        match self.state {
            SceneState::Edit => self.scene.on_update_editor(ts, editor_camera, sink),
            SceneState::Play => {
                self.scene.on_update_runtime(ts, &mut self.scripts, sink);
                if self.scripts.take_stop_request() {
                    log::info!("Stop requested by script");
                    return self.stop();
                }
            }
            SceneState::Simulation => self.scene.on_update_simulation(ts, editor_camera, sink),
        }
        Ok(())
    }

    /// Store a new viewport size and apply it to the scene
    pub fn on_viewport_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.apply_viewport();
    }

    /// Attach a script class to an entity and load it
    pub fn bind_script(&mut self, entity: Entity, class_name: &str) -> Result<(), StateError> {
        self.scene
            .add_or_replace_component(entity, ScriptComponent::new(class_name));
        self.flush_released_scripts();
        let uuid = self.scene.uuid(entity);
        self.scripts.load_script(class_name, uuid)?;
        Ok(())
    }

    /// Duplicate an entity with its children and their script field values; only in Edit
    pub fn duplicate_entity(&mut self, entity: Entity) -> Result<Entity, StateError> {
        self.require_edit("duplicate an entity")?;
        let (copy, pairs) = self.scene.duplicate_hierarchy(entity);
        for (source, duplicate) in pairs {
            self.scripts.copy_fields(source, duplicate);
        }
        Ok(copy)
    }

    /// Save the scene to a file; only in Edit
    pub fn save_scene(&self, path: impl AsRef<Path>) -> Result<(), StateError> {
        self.require_edit("save a scene")?;
        SceneSerializer::serialize_to_file(&self.scene, path)?;
        Ok(())
    }

    /// Load a scene file over the current scene; only in Edit
    ///
    /// A failed load leaves the current scene untouched.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> Result<(), StateError> {
        self.require_edit("load a scene")?;
        SceneSerializer::deserialize_from_file(path, &mut self.scene)?;
        self.apply_viewport();
        self.prune_script_bindings();
        self.load_scene_scripts();
        Ok(())
    }

    /// Release interpreter bindings of removed script components
    pub fn flush_released_scripts(&mut self) {
        if self.state != SceneState::Edit {
            return;
        }
        for (entity, class_name) in self.scene.take_released_scripts() {
            self.scripts.unload_script(&class_name, entity);
        }
    }

    fn take_snapshot(&mut self) -> Result<(), StateError> {
        if let Err(e) = self.snapshots.snapshot(&self.scene) {
            log::error!("Failed to snapshot scene '{}', staying in Edit: {}", self.scene.name(), e);
            return Err(e.into());
        }
        Ok(())
    }

    fn apply_viewport(&mut self) {
        let (width, height) = self.viewport;
        if width > 0 && height > 0 {
            self.scene.on_viewport_resize(width, height);
        }
    }

    fn prune_script_bindings(&mut self) {
        let scene = &self.scene;
        self.scripts.retain_entities(|uuid| {
            scene
                .try_get_entity_by_uuid(uuid)
                .and_then(|entity| scene.try_get_component::<ScriptComponent>(entity))
                .is_some()
        });
    }

    fn load_scene_scripts(&mut self) {
        for binding in self.scene.script_bindings() {
            if self.scripts.bound_class(binding.entity) == Some(binding.class_name.as_str()) {
                continue;
            }
            if let Err(e) = self.scripts.load_script(&binding.class_name, binding.entity) {
                log::error!("Failed to load script for entity '{}': {}", binding.name, e);
            }
        }
    }

    fn require_edit(&self, requested: &'static str) -> Result<(), StateError> {
        if self.state == SceneState::Edit {
            Ok(())
        } else {
            Err(StateError::InvalidTransition {
                from: self.state,
                requested,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScriptConfig;
    use crate::ecs::components::{Rigidbody2DComponent, RigidBodyType, TransformComponent};
    use crate::foundation::math::Vec3;
    use crate::scene::NullRenderSink;

    fn controller() -> SceneController {
        let mut scene = Scene::new("State");
        let entity = scene.create_entity("Body");
        scene.get_component_mut::<TransformComponent>(entity).translation = Vec3::new(0.0, 10.0, 0.0);
        scene.add_component(entity, Rigidbody2DComponent::new(RigidBodyType::Dynamic));

        let config = RuntimeConfig {
            scripting: ScriptConfig::new("does/not/exist"),
            ..RuntimeConfig::default()
        };
        SceneController::new(scene, config)
    }

    fn frame(controller: &mut SceneController) {
        controller
            .on_update(Timestep::from_seconds(1.0 / 60.0), &RenderCamera::default(), &mut NullRenderSink)
            .unwrap();
    }

    #[test]
    fn test_play_and_stop() {
        let mut controller = controller();
        assert_eq!(controller.state(), SceneState::Edit);

        controller.play().unwrap();
        assert_eq!(controller.state(), SceneState::Play);
        assert!(controller.scene().is_running());

        controller.stop().unwrap();
        assert_eq!(controller.state(), SceneState::Edit);
        assert!(!controller.scene().is_running());
    }

    #[test]
    fn test_stop_restores_edit_state() {
        let mut controller = controller();
        controller.simulate().unwrap();
        for _ in 0..30 {
            frame(&mut controller);
        }

        controller.stop().unwrap();

        let body = controller.scene().find_entity_by_name("Body");
        let translation = controller.scene().get_component::<TransformComponent>(body).translation;
        assert_eq!(translation, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_simulation_to_play_goes_through_edit() {
        let mut controller = controller();
        controller.simulate().unwrap();
        frame(&mut controller);

        controller.play().unwrap();

        assert_eq!(controller.state(), SceneState::Play);
        let body = controller.scene().find_entity_by_name("Body");
        let translation = controller.scene().get_component::<TransformComponent>(body).translation;
        assert_eq!(translation, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_stop_in_edit_is_noop() {
        let mut controller = controller();
        controller.stop().unwrap();
        assert_eq!(controller.state(), SceneState::Edit);
    }

    #[test]
    fn test_save_refused_while_playing() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller();
        controller.play().unwrap();

        assert!(matches!(
            controller.save_scene(dir.path().join("scene.ron")),
            Err(StateError::InvalidTransition { from: SceneState::Play, .. })
        ));
    }

    #[test]
    fn test_failed_load_keeps_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(scene: ").unwrap();
        let mut controller = controller();

        assert!(controller.load_scene(&path).is_err());
        assert_eq!(controller.scene().entity_count(), 1);
    }
}
