//! Scene serialization
//!
//! Scenes are written as RON documents: the scene name followed by one
//! record per entity in id-storage order. Hierarchy links are stored by
//! uuid. Loading decodes and validates the whole document before touching
//! the target scene, so a bad file never leaves a half-loaded scene behind.
//!
//! The same format backs the Play/Simulation snapshot through
//! [`SnapshotStore`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Entity, Scene};
use crate::ecs::components::{
    BoxCollider2DComponent, CameraComponent, ChildComponent, CircleCollider2DComponent, CircleComponent,
    IDComponent, ParentComponent, Rigidbody2DComponent, ScriptComponent, SpriteComponent, TagComponent,
    TransformComponent, Uuid, WorldTransformComponent,
};
use crate::ecs::{Component, EntityId};

/// Scene serialization errors
#[derive(Error, Debug)]
pub enum SerializationError {
    /// File access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene could not be encoded
    #[error("Failed to encode scene: {0}")]
    Encode(String),

    /// Document could not be decoded or is inconsistent
    #[error("Failed to decode scene: {0}")]
    Decode(String),

    /// Restore requested without a snapshot
    #[error("No snapshot to restore from")]
    MissingSnapshot,

    /// Two records share a uuid
    #[error("Duplicate entity id {0}")]
    DuplicateId(Uuid),
}

#[derive(Serialize, Deserialize)]
struct SceneDocument {
    scene: String,
    entities: Vec<EntityRecord>,
}

#[derive(Serialize, Deserialize)]
struct EntityRecord {
    id: Uuid,
    tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transform: Option<TransformComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    world_transform: Option<WorldTransformComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    script: Option<ScriptComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    camera: Option<CameraComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sprite: Option<SpriteComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    circle: Option<CircleComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rigidbody2d: Option<Rigidbody2DComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    box_collider2d: Option<BoxCollider2DComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    circle_collider2d: Option<CircleCollider2DComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Uuid>,
}

/// Reads and writes scenes
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneSerializer;

impl SceneSerializer {
    /// Encode a scene as RON text
    pub fn serialize_to_string(scene: &Scene) -> Result<String, SerializationError> {
        let registry = scene.registry();
        let uuid_of = |id: EntityId| registry.get::<IDComponent>(id).id;

        let entities = scene
            .entities()
            .into_iter()
            .map(|entity| {
                let id = entity.id();
                EntityRecord {
                    id: uuid_of(id),
                    tag: registry.get::<TagComponent>(id).tag.clone(),
                    transform: registry.try_get::<TransformComponent>(id).copied(),
                    world_transform: registry.try_get::<WorldTransformComponent>(id).copied(),
                    script: registry.try_get::<ScriptComponent>(id).cloned(),
                    camera: registry.try_get::<CameraComponent>(id).cloned(),
                    sprite: registry.try_get::<SpriteComponent>(id).cloned(),
                    circle: registry.try_get::<CircleComponent>(id).cloned(),
                    rigidbody2d: registry.try_get::<Rigidbody2DComponent>(id).cloned(),
                    box_collider2d: registry.try_get::<BoxCollider2DComponent>(id).cloned(),
                    circle_collider2d: registry.try_get::<CircleCollider2DComponent>(id).cloned(),
                    parent: registry.try_get::<ChildComponent>(id).map(|link| uuid_of(link.parent)),
                    children: registry
                        .try_get::<ParentComponent>(id)
                        .map(|links| links.children.iter().map(|&child| uuid_of(child)).collect())
                        .unwrap_or_default(),
                }
            })
            .collect();

        let document = SceneDocument {
            scene: scene.name().to_string(),
            entities,
        };

        ron::ser::to_string_pretty(&document, PrettyConfig::default())
            .map_err(|e| SerializationError::Encode(e.to_string()))
    }

    /// Replace the contents of `scene` with a decoded document
    ///
    /// On error the scene is left untouched.
    pub fn deserialize_into(text: &str, scene: &mut Scene) -> Result<(), SerializationError> {
        let document: SceneDocument = ron::from_str(text).map_err(|e| SerializationError::Decode(e.to_string()))?;
        let links = validate(&document)?;

        scene.clear();
        scene.set_name(document.scene);

        for record in document.entities {
            let entity = scene.create_entity_with_uuid(&record.tag, record.id);
            scene.get_component_mut::<TagComponent>(entity).tag = record.tag;
            if let Some(transform) = record.transform {
                *scene.get_component_mut::<TransformComponent>(entity) = transform;
            }
            add_optional(scene, entity, record.world_transform);
            add_optional(scene, entity, record.script);
            add_optional(scene, entity, record.camera);
            add_optional(scene, entity, record.sprite);
            add_optional(scene, entity, record.circle);
            add_optional(scene, entity, record.rigidbody2d);
            add_optional(scene, entity, record.box_collider2d);
            add_optional(scene, entity, record.circle_collider2d);
        }

        for (parent, child) in links {
            let parent = scene.get_entity_by_uuid(parent);
            let child = scene.get_entity_by_uuid(child);
            scene.make_relationship(parent, child);
        }

        log::debug!("Deserialized scene '{}' with {} entities", scene.name(), scene.entity_count());
        Ok(())
    }

    /// Write a scene file
    pub fn serialize_to_file(scene: &Scene, path: impl AsRef<Path>) -> Result<(), SerializationError> {
        let path = path.as_ref();
        let text = Self::serialize_to_string(scene)?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, text)?;
        log::info!("Saved scene '{}' to {}", scene.name(), path.display());
        Ok(())
    }

    /// Load a scene file into `scene`
    pub fn deserialize_from_file(path: impl AsRef<Path>, scene: &mut Scene) -> Result<(), SerializationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::deserialize_into(&text, scene)?;
        log::info!("Loaded scene '{}' from {}", scene.name(), path.display());
        Ok(())
    }
}

fn add_optional<T: Component>(scene: &mut Scene, entity: Entity, component: Option<T>) {
    if let Some(component) = component {
        scene.add_component(entity, component);
    }
}

/// Check ids and hierarchy, returning `(parent, child)` links in child-list order
fn validate(document: &SceneDocument) -> Result<Vec<(Uuid, Uuid)>, SerializationError> {
    let mut ids = HashSet::new();
    for record in &document.entities {
        if !record.id.is_valid() {
            return Err(SerializationError::Decode("entity with invalid id".to_string()));
        }
        if !ids.insert(record.id) {
            return Err(SerializationError::DuplicateId(record.id));
        }
    }

    let unknown = |uuid: Uuid| SerializationError::Decode(format!("reference to unknown entity {uuid}"));
    let mut parent_of: HashMap<Uuid, Uuid> = HashMap::new();
    let mut links = Vec::new();

    for record in &document.entities {
        for &child in &record.children {
            if !ids.contains(&child) {
                return Err(unknown(child));
            }
            if parent_of.insert(child, record.id).is_some() {
                return Err(SerializationError::Decode(format!("entity {child} has more than one parent")));
            }
            links.push((record.id, child));
        }
    }
    for record in &document.entities {
        let Some(parent) = record.parent else {
            continue;
        };
        if !ids.contains(&parent) {
            return Err(unknown(parent));
        }
        match parent_of.get(&record.id) {
            Some(&listed) if listed != parent => {
                return Err(SerializationError::Decode(format!(
                    "entity {} names parent {} but is listed under {}",
                    record.id, parent, listed
                )));
            }
            Some(_) => {}
            None => {
                parent_of.insert(record.id, parent);
                links.push((parent, record.id));
            }
        }
    }

    for &start in parent_of.keys() {
        let mut current = start;
        let mut depth = 0;
        while let Some(&parent) = parent_of.get(&current) {
            depth += 1;
            if parent == start || depth > parent_of.len() {
                return Err(SerializationError::Decode(format!("hierarchy cycle through entity {start}")));
            }
            current = parent;
        }
    }

    Ok(links)
}

/// Transient storage for the Play/Simulation snapshot
pub trait SnapshotStore {
    /// Capture the scene; never mutates it
    fn snapshot(&mut self, scene: &Scene) -> Result<(), SerializationError>;

    /// Replace the scene's contents with the last snapshot
    fn restore(&mut self, scene: &mut Scene) -> Result<(), SerializationError>;

    /// Forget the last snapshot
    fn discard(&mut self);
}

/// Snapshot kept as RON text in memory
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    text: Option<String>,
}

impl MemorySnapshot {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a snapshot is held
    pub fn has_snapshot(&self) -> bool {
        self.text.is_some()
    }
}

impl SnapshotStore for MemorySnapshot {
    fn snapshot(&mut self, scene: &Scene) -> Result<(), SerializationError> {
        self.text = Some(SceneSerializer::serialize_to_string(scene)?);
        Ok(())
    }

    fn restore(&mut self, scene: &mut Scene) -> Result<(), SerializationError> {
        let text = self.text.as_deref().ok_or(SerializationError::MissingSnapshot)?;
        SceneSerializer::deserialize_into(text, scene)
    }

    fn discard(&mut self) {
        self.text = None;
    }
}

/// Snapshot kept in a RON file on disk
#[derive(Debug)]
pub struct FileSnapshot {
    path: PathBuf,
    taken: bool,
}

impl FileSnapshot {
    /// Store snapshots at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            taken: false,
        }
    }

    /// Snapshot file location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshot {
    fn snapshot(&mut self, scene: &Scene) -> Result<(), SerializationError> {
        SceneSerializer::serialize_to_file(scene, &self.path)?;
        self.taken = true;
        Ok(())
    }

    fn restore(&mut self, scene: &mut Scene) -> Result<(), SerializationError> {
        if !self.taken {
            return Err(SerializationError::MissingSnapshot);
        }
        SceneSerializer::deserialize_from_file(&self.path, scene)
    }

    fn discard(&mut self) {
        if self.taken {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!("Failed to remove snapshot {}: {}", self.path.display(), e);
            }
        }
        self.taken = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::RigidBodyType;
    use crate::foundation::math::{Vec3, Vec4};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new("Sample");
        let root = scene.create_entity("Root");
        scene.get_component_mut::<TransformComponent>(root).translation = Vec3::new(1.0, 2.0, 3.0);
        scene.add_component(root, SpriteComponent::new(Vec4::new(0.2, 0.4, 0.6, 1.0)));
        scene.add_component(root, Rigidbody2DComponent::new(RigidBodyType::Dynamic));
        scene.add_component(root, BoxCollider2DComponent::default());
        let child = scene.create_child_entity("Child", root);
        scene.add_component(child, ScriptComponent::new("Spinner"));
        scene
    }

    #[test]
    fn test_round_trip_preserves_entities() {
        let source = sample_scene();
        let text = SceneSerializer::serialize_to_string(&source).unwrap();

        let mut target = Scene::new("Other");
        SceneSerializer::deserialize_into(&text, &mut target).unwrap();

        assert_eq!(target.name(), "Sample");
        assert_eq!(target.entity_count(), 2);
        for entity in source.entities() {
            let copy = target.get_entity_by_uuid(source.uuid(entity));
            assert_eq!(target.tag(copy), source.tag(entity));
            assert_eq!(
                target.get_component::<TransformComponent>(copy),
                source.get_component::<TransformComponent>(entity)
            );
            assert_eq!(target.children(copy).len(), source.children(entity).len());
        }

        let root = target.find_entity_by_name("Root");
        assert!(target.has_component::<Rigidbody2DComponent>(root));
        let child = target.find_entity_by_name("Child");
        assert_eq!(target.parent(child), Some(root));
        assert_eq!(target.get_component::<ScriptComponent>(child).class_name, "Spinner");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let text = SceneSerializer::serialize_to_string(&sample_scene()).unwrap();
        let mut scene = Scene::new("Other");
        SceneSerializer::deserialize_into(&text, &mut scene).unwrap();

        assert_eq!(SceneSerializer::serialize_to_string(&scene).unwrap(), text);
    }

    #[test]
    fn test_restore_never_merges() {
        let text = SceneSerializer::serialize_to_string(&sample_scene()).unwrap();
        let mut target = Scene::new("Target");
        target.create_entity("Leftover");

        SceneSerializer::deserialize_into(&text, &mut target).unwrap();

        assert!(target.find_entity_by_name("Leftover").is_null());
        assert_eq!(target.entity_count(), 2);
    }

    #[test]
    fn test_bad_document_leaves_scene_untouched() {
        let mut target = Scene::new("Target");
        target.create_entity("Keep");

        assert!(matches!(
            SceneSerializer::deserialize_into("not ron at all", &mut target),
            Err(SerializationError::Decode(_))
        ));
        assert_eq!(target.entity_count(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected_before_clear() {
        let text = r#"(scene: "Dup", entities: [(id: 7, tag: "A"), (id: 7, tag: "B")])"#;
        let mut target = Scene::new("Target");
        target.create_entity("Keep");

        assert!(matches!(
            SceneSerializer::deserialize_into(text, &mut target),
            Err(SerializationError::DuplicateId(_))
        ));
        assert_eq!(target.entity_count(), 1);
    }

    #[test]
    fn test_hierarchy_cycle_rejected() {
        let text = r#"(scene: "Loop", entities: [(id: 1, tag: "A", children: [2]), (id: 2, tag: "B", children: [1])])"#;
        let mut target = Scene::new("Target");
        assert!(matches!(
            SceneSerializer::deserialize_into(text, &mut target),
            Err(SerializationError::Decode(_))
        ));
    }

    #[test]
    fn test_runtime_handles_not_persisted() {
        let mut scene = sample_scene();
        scene.on_physics_start(&crate::config::PhysicsConfig::default());
        let text = SceneSerializer::serialize_to_string(&scene).unwrap();

        let mut copy = Scene::new("Copy");
        SceneSerializer::deserialize_into(&text, &mut copy).unwrap();

        let root = copy.find_entity_by_name("Root");
        assert!(copy.get_component::<Rigidbody2DComponent>(root).runtime_body.is_none());
    }

    #[test]
    fn test_file_snapshot_restore_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSnapshot::new(dir.path().join("snapshot.ron"));
        let mut scene = sample_scene();

        assert!(matches!(store.restore(&mut scene), Err(SerializationError::MissingSnapshot)));

        store.snapshot(&scene).unwrap();
        scene.create_entity("Extra");
        store.restore(&mut scene).unwrap();
        assert_eq!(scene.entity_count(), 2);

        store.discard();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_round_trip_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes").join("level.ron");
        SceneSerializer::serialize_to_file(&sample_scene(), &path).unwrap();

        let mut scene = Scene::new("Loaded");
        SceneSerializer::deserialize_from_file(&path, &mut scene).unwrap();
        assert_eq!(scene.name(), "Sample");
    }
}
