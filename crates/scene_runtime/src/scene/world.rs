//! Scene
//!
//! A scene is the authoritative container of one simulated space: the
//! component registry, the uuid index and, while running, the physics world.
//! It is edited and played in place; the state machine snapshots it on entry
//! to Play and restores it on Stop.

use std::collections::HashMap;

use super::{Entity, SceneId};
use crate::ecs::components::{
    BoxCollider2DComponent, CameraComponent, ChildComponent, CircleCollider2DComponent, CircleComponent,
    IDComponent, ParentComponent, Rigidbody2DComponent, ScriptComponent, SpriteComponent, TagComponent,
    TransformComponent, Uuid, WorldTransformComponent,
};
use crate::ecs::{Component, EntityId, Registry};
use crate::foundation::math::Transform;
use crate::physics::PhysicsWorld2D;

/// A scripted entity as seen by the scripting bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBinding {
    /// Entity uuid
    pub entity: Uuid,
    /// Bound class
    pub class_name: String,
    /// Entity tag
    pub name: String,
}

/// The world of entities
pub struct Scene {
    id: SceneId,
    name: String,
    pub(super) registry: Registry,
    entity_map: HashMap<Uuid, EntityId>,
    pub(super) physics: Option<PhysicsWorld2D>,
    released_scripts: Vec<(Uuid, String)>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SceneId::next(),
            name: name.into(),
            registry: Registry::new(),
            entity_map: HashMap::new(),
            physics: None,
            released_scripts: Vec::new(),
        }
    }

    /// Process-unique identity
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the scene
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Component store
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Running physics world
    pub fn physics(&self) -> Option<&PhysicsWorld2D> {
        self.physics.as_ref()
    }

    /// Whether physics is running
    pub fn is_running(&self) -> bool {
        self.physics.is_some()
    }

    /// Create an entity with a fresh uuid
    pub fn create_entity(&mut self, name: &str) -> Entity {
        self.create_entity_with_uuid(name, Uuid::new())
    }

    /// Create an entity with a given uuid
    ///
    /// The entity starts with exactly an id, a tag and an identity transform.
    ///
    /// # Panics
    ///
    /// Panics when the uuid is invalid or already used in this scene.
    pub fn create_entity_with_uuid(&mut self, name: &str, uuid: Uuid) -> Entity {
        assert!(uuid.is_valid(), "cannot create an entity with the invalid uuid");
        assert!(
            !self.entity_map.contains_key(&uuid),
            "entity uuid {uuid} already exists in scene '{}'",
            self.name
        );

        let id = self.registry.create();
        self.registry.add(id, IDComponent { id: uuid });
        self.registry.add(id, TagComponent::new(if name.is_empty() { "Entity" } else { name }));
        self.registry.add(id, TransformComponent::identity());
        self.entity_map.insert(uuid, id);

        Entity::new(id, self.id)
    }

    /// Create an entity parented to `parent`
    pub fn create_child_entity(&mut self, name: &str, parent: Entity) -> Entity {
        let child = self.create_entity(name);
        self.make_relationship(parent, child);
        child
    }

    /// Destroy an entity, its children and every component they own
    pub fn destroy_entity(&mut self, entity: Entity) {
        let id = self.check(entity);
        self.destroy_id(id);
    }

    fn destroy_id(&mut self, id: EntityId) {
        assert!(self.registry.is_alive(id), "destroy_entity on dead entity {id:?}");

        let children = self
            .registry
            .try_get::<ParentComponent>(id)
            .map(|parent| parent.children.clone())
            .unwrap_or_default();
        for child in children {
            self.destroy_id(child);
        }
        self.detach(id);

        if let Some(body) = self.registry.try_get::<Rigidbody2DComponent>(id).and_then(|rb| rb.runtime_body) {
            if let Some(physics) = self.physics.as_mut() {
                physics.remove_body(body);
            }
        }

        let uuid = self.registry.get::<IDComponent>(id).id;
        self.registry.destroy(id);
        self.collect_released(Some((id, uuid)));
        self.entity_map.remove(&uuid);
    }

    /// Whether `entity` is alive in this scene
    pub fn is_valid(&self, entity: Entity) -> bool {
        entity.scene() == self.id && self.registry.is_alive(entity.id())
    }

    /// Entity with the given uuid
    ///
    /// # Panics
    ///
    /// Panics when no entity has this uuid.
    pub fn get_entity_by_uuid(&self, uuid: Uuid) -> Entity {
        self.try_get_entity_by_uuid(uuid)
            .unwrap_or_else(|| panic!("no entity with uuid {uuid} in scene '{}'", self.name))
    }

    /// Entity with the given uuid, if any
    pub fn try_get_entity_by_uuid(&self, uuid: Uuid) -> Option<Entity> {
        self.entity_map.get(&uuid).map(|&id| Entity::new(id, self.id))
    }

    /// First entity whose tag equals `name`, else the null entity
    pub fn find_entity_by_name(&self, name: &str) -> Entity {
        self.registry
            .iter::<TagComponent>()
            .find(|(_, tag)| tag.tag == name)
            .map_or_else(Entity::null, |(id, _)| Entity::new(id, self.id))
    }

    /// First camera flagged primary, else the null entity
    pub fn primary_camera_entity(&self) -> Entity {
        self.registry
            .iter::<CameraComponent>()
            .find(|(_, camera)| camera.primary)
            .map_or_else(Entity::null, |(id, _)| Entity::new(id, self.id))
    }

    /// Uuid of an entity
    pub fn uuid(&self, entity: Entity) -> Uuid {
        self.get_component::<IDComponent>(entity).id
    }

    /// Tag of an entity
    pub fn tag(&self, entity: Entity) -> &str {
        &self.get_component::<TagComponent>(entity).tag
    }

    /// Attach a component
    ///
    /// # Panics
    ///
    /// Panics when the entity already has a `T`.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> &mut T {
        let id = self.check(entity);
        self.registry.add(id, component)
    }

    /// Attach a component, replacing any existing one
    pub fn add_or_replace_component<T: Component>(&mut self, entity: Entity, component: T) -> &mut T {
        let id = self.check(entity);
        if self.registry.has::<T>(id) {
            self.remove_component::<T>(entity);
        }
        self.registry.add(id, component)
    }

    /// Detach a component
    ///
    /// # Panics
    ///
    /// Panics when the entity has no `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> T {
        let id = self.check(entity);
        let component = self.registry.remove::<T>(id);
        self.collect_released(None);
        component
    }

    /// Whether the entity has a `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        let id = self.check(entity);
        self.registry.has::<T>(id)
    }

    /// Component of an entity
    ///
    /// # Panics
    ///
    /// Panics when the entity has no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> &T {
        let id = self.check(entity);
        self.registry.get::<T>(id)
    }

    /// Mutable component of an entity
    ///
    /// # Panics
    ///
    /// Panics when the entity has no `T`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        let id = self.check(entity);
        self.registry.get_mut::<T>(id)
    }

    /// Component of an entity, if present
    pub fn try_get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        let id = self.check(entity);
        self.registry.try_get::<T>(id)
    }

    /// Mutable component of an entity, if present
    pub fn try_get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.check(entity);
        self.registry.try_get_mut::<T>(id)
    }

    /// Make `child` a child of `parent`, detaching it from any previous parent
    ///
    /// The child's local transform is kept as is.
    ///
    /// # Panics
    ///
    /// Panics when the link would create a cycle.
    pub fn make_relationship(&mut self, parent: Entity, child: Entity) {
        let parent_id = self.check(parent);
        let child_id = self.check(child);
        assert!(
            !self.is_ancestor_or_self(child_id, parent_id),
            "parenting {child_id:?} under {parent_id:?} would create a cycle"
        );

        self.detach(child_id);

        match self.registry.try_get_mut::<ParentComponent>(parent_id) {
            Some(links) => links.children.push(child_id),
            None => {
                self.registry.add(parent_id, ParentComponent { children: vec![child_id] });
            }
        }
        self.registry.add(child_id, ChildComponent { parent: parent_id });
    }

    /// Detach an entity from its parent
    pub fn make_orphan(&mut self, child: Entity) {
        let id = self.check(child);
        self.detach(id);
    }

    /// Direct children of an entity
    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.try_get_component::<ParentComponent>(entity)
            .map(|links| links.children.iter().map(|&id| Entity::new(id, self.id)).collect())
            .unwrap_or_default()
    }

    /// Parent of an entity
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.try_get_component::<ChildComponent>(entity)
            .map(|link| Entity::new(link.parent, self.id))
    }

    /// Local transform composed up the parent chain
    pub fn world_transform(&self, entity: Entity) -> Transform {
        let id = self.check(entity);
        self.world_transform_of(id)
    }

    /// Place an entity at a world transform, converting to its parent's space
    pub fn set_world_transform(&mut self, entity: Entity, world: &Transform) {
        let id = self.check(entity);
        self.set_world_transform_of(id, world);
    }

    /// Refresh every entity's `WorldTransformComponent`
    pub fn resolve_world_transforms(&mut self) {
        let resolved: Vec<(EntityId, Transform)> = self
            .registry
            .iter::<TransformComponent>()
            .map(|(id, _)| (id, self.world_transform_of(id)))
            .collect();

        for (id, transform) in resolved {
            match self.registry.try_get_mut::<WorldTransformComponent>(id) {
                Some(world) => world.transform = transform,
                None => {
                    self.registry.add(id, WorldTransformComponent { transform });
                }
            }
        }
    }

    /// Copy an entity and its children under a fresh uuid
    ///
    /// Runtime physics handles are never copied.
    pub fn duplicate_entity(&mut self, entity: Entity) -> Entity {
        self.duplicate_hierarchy(entity).0
    }

    /// Copy an entity and its children, also returning every `(source, copy)` uuid pair
    pub fn duplicate_hierarchy(&mut self, entity: Entity) -> (Entity, Vec<(Uuid, Uuid)>) {
        let id = self.check(entity);
        let mut copies = Vec::new();
        let copy = self.duplicate_id(id, &mut copies);
        (Entity::new(copy, self.id), copies)
    }

    fn duplicate_id(&mut self, source: EntityId, copies: &mut Vec<(Uuid, Uuid)>) -> EntityId {
        let name = self.registry.get::<TagComponent>(source).tag.clone();
        let copy = self.create_entity(&name).id();
        copies.push((self.registry.get::<IDComponent>(source).id, self.registry.get::<IDComponent>(copy).id));

        self.copy_component::<TransformComponent>(source, copy);
        self.copy_component::<WorldTransformComponent>(source, copy);
        self.copy_component::<ScriptComponent>(source, copy);
        self.copy_component::<CameraComponent>(source, copy);
        self.copy_component::<SpriteComponent>(source, copy);
        self.copy_component::<CircleComponent>(source, copy);
        if self.copy_component::<Rigidbody2DComponent>(source, copy) {
            self.registry.get_mut::<Rigidbody2DComponent>(copy).runtime_body = None;
        }
        if self.copy_component::<BoxCollider2DComponent>(source, copy) {
            self.registry.get_mut::<BoxCollider2DComponent>(copy).runtime_fixture = None;
        }
        if self.copy_component::<CircleCollider2DComponent>(source, copy) {
            self.registry.get_mut::<CircleCollider2DComponent>(copy).runtime_fixture = None;
        }

        if let Some(parent) = self.registry.try_get::<ChildComponent>(source).map(|link| link.parent) {
            self.make_relationship(Entity::new(parent, self.id), Entity::new(copy, self.id));
        }

        let children = self
            .registry
            .try_get::<ParentComponent>(source)
            .map(|links| links.children.clone())
            .unwrap_or_default();
        for child in children {
            let child_copy = self.duplicate_id(child, copies);
            self.make_relationship(Entity::new(copy, self.id), Entity::new(child_copy, self.id));
        }

        copy
    }

    fn copy_component<T: Component + Clone>(&mut self, from: EntityId, to: EntityId) -> bool {
        let Some(component) = self.registry.try_get::<T>(from).cloned() else {
            return false;
        };
        self.registry.add_or_replace(to, component);
        true
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Every entity, in id-storage order
    pub fn entities(&self) -> Vec<Entity> {
        self.registry
            .iter::<IDComponent>()
            .map(|(id, _)| Entity::new(id, self.id))
            .collect()
    }

    /// Drop every entity and the physics world without running hooks
    pub fn clear(&mut self) {
        self.registry.clear();
        self.entity_map.clear();
        self.physics = None;
    }

    /// Script bindings released since the last call, as `(entity, class)` pairs
    pub fn take_released_scripts(&mut self) -> Vec<(Uuid, String)> {
        std::mem::take(&mut self.released_scripts)
    }

    /// Every entity with a non-empty script class
    pub fn script_bindings(&self) -> Vec<ScriptBinding> {
        self.registry
            .iter::<ScriptComponent>()
            .filter(|(_, script)| !script.class_name.is_empty())
            .map(|(id, script)| ScriptBinding {
                entity: self.registry.get::<IDComponent>(id).id,
                class_name: script.class_name.clone(),
                name: self.registry.get::<TagComponent>(id).tag.clone(),
            })
            .collect()
    }

    /// Current viewport size
    pub fn viewport_size(&self) -> (u32, u32) {
        self.registry.viewport_size()
    }

    /// Store a new viewport size and resize every non-fixed camera
    pub fn on_viewport_resize(&mut self, width: u32, height: u32) {
        self.registry.set_viewport_size(width, height);
        for (_, camera) in self.registry.iter_mut::<CameraComponent>() {
            if !camera.fixed_aspect_ratio {
                camera.camera.set_viewport_size(width, height);
            }
        }
    }

    pub(super) fn world_transform_of(&self, id: EntityId) -> Transform {
        let local = self
            .registry
            .try_get::<TransformComponent>(id)
            .map(TransformComponent::to_math_transform)
            .unwrap_or_default();

        match self.registry.try_get::<ChildComponent>(id) {
            Some(link) => self.world_transform_of(link.parent).combine(&local),
            None => local,
        }
    }

    pub(super) fn set_world_transform_of(&mut self, id: EntityId, world: &Transform) {
        let local = match self.registry.try_get::<ChildComponent>(id) {
            Some(link) => self.world_transform_of(link.parent).inverse().combine(world),
            None => *world,
        };
        *self.registry.get_mut::<TransformComponent>(id) = TransformComponent::from_math_transform(&local);
    }

    pub(super) fn entity_id_of(&self, uuid: Uuid) -> Option<EntityId> {
        self.entity_map.get(&uuid).copied()
    }

    fn is_ancestor_or_self(&self, ancestor: EntityId, mut id: EntityId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.registry.try_get::<ChildComponent>(id) {
                Some(link) => id = link.parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, id: EntityId) {
        if !self.registry.has::<ChildComponent>(id) {
            return;
        }
        let parent = self.registry.remove::<ChildComponent>(id).parent;

        let now_empty = match self.registry.try_get_mut::<ParentComponent>(parent) {
            Some(links) => {
                links.children.retain(|&child| child != id);
                links.children.is_empty()
            }
            None => {
                log::warn!("Entity {:?} listed {:?} as parent without a child list", id, parent);
                false
            }
        };
        if now_empty {
            self.registry.remove::<ParentComponent>(parent);
        }
    }

    fn collect_released(&mut self, destroyed: Option<(EntityId, Uuid)>) {
        for binding in self.registry.take_released_bindings() {
            let uuid = match destroyed {
                Some((id, uuid)) if id == binding.entity => Some(uuid),
                _ => self.registry.try_get::<IDComponent>(binding.entity).map(|c| c.id),
            };
            match uuid {
                Some(uuid) => self.released_scripts.push((uuid, binding.class_name)),
                None => log::warn!("Dropped script release for unknown entity {:?}", binding.entity),
            }
        }
    }

    fn check(&self, entity: Entity) -> EntityId {
        assert!(!entity.is_null(), "null entity used with scene '{}'", self.name);
        assert_eq!(
            entity.scene(),
            self.id,
            "entity {:?} does not belong to scene '{}'",
            entity.id(),
            self.name
        );
        entity.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_created_entity_has_exactly_core_components() {
        let mut scene = Scene::new("Test");
        let entity = scene.create_entity("Player");

        assert_eq!(scene.tag(entity), "Player");
        assert_eq!(*scene.get_component::<TransformComponent>(entity), TransformComponent::identity());
        assert!(scene.has_component::<IDComponent>(entity));
        assert!(!scene.has_component::<ScriptComponent>(entity));
        assert!(!scene.has_component::<WorldTransformComponent>(entity));
        assert_eq!(scene.get_entity_by_uuid(scene.uuid(entity)), entity);
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_duplicate_uuid_panics() {
        let mut scene = Scene::new("Test");
        let uuid = Uuid::from_raw(42);
        scene.create_entity_with_uuid("A", uuid);
        scene.create_entity_with_uuid("B", uuid);
    }

    #[test]
    #[should_panic(expected = "does not belong")]
    fn test_foreign_entity_panics() {
        let mut a = Scene::new("A");
        let b = Scene::new("B");
        let entity = a.create_entity("E");
        b.tag(entity);
    }

    #[test]
    fn test_destroy_removes_uuid_and_children() {
        let mut scene = Scene::new("Test");
        let parent = scene.create_entity("Parent");
        let child = scene.create_child_entity("Child", parent);
        let (parent_uuid, child_uuid) = (scene.uuid(parent), scene.uuid(child));

        scene.destroy_entity(parent);

        assert!(scene.try_get_entity_by_uuid(parent_uuid).is_none());
        assert!(scene.try_get_entity_by_uuid(child_uuid).is_none());
        assert!(!scene.is_valid(child));
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn test_destroy_child_detaches_from_parent() {
        let mut scene = Scene::new("Test");
        let parent = scene.create_entity("Parent");
        let child = scene.create_child_entity("Child", parent);

        scene.destroy_entity(child);

        assert!(scene.children(parent).is_empty());
        assert!(!scene.has_component::<ParentComponent>(parent));
    }

    #[test]
    fn test_find_entity_by_name() {
        let mut scene = Scene::new("Test");
        let camera = scene.create_entity("Camera");

        assert_eq!(scene.find_entity_by_name("Camera"), camera);
        assert!(scene.find_entity_by_name("Missing").is_null());
    }

    #[test]
    fn test_removing_script_queues_release() {
        let mut scene = Scene::new("Test");
        let entity = scene.create_entity("Scripted");
        scene.add_component(entity, ScriptComponent::new("Player"));

        scene.remove_component::<ScriptComponent>(entity);

        assert_eq!(scene.take_released_scripts(), vec![(scene.uuid(entity), "Player".to_string())]);
    }

    #[test]
    fn test_destroying_scripted_entity_queues_release() {
        let mut scene = Scene::new("Test");
        let entity = scene.create_entity("Scripted");
        let uuid = scene.uuid(entity);
        scene.add_component(entity, ScriptComponent::new("Player"));

        scene.destroy_entity(entity);

        assert_eq!(scene.take_released_scripts(), vec![(uuid, "Player".to_string())]);
    }

    #[test]
    fn test_world_transform_composes_parent_chain() {
        let mut scene = Scene::new("Test");
        let parent = scene.create_entity("Parent");
        let child = scene.create_child_entity("Child", parent);
        *scene.get_component_mut::<TransformComponent>(parent) = TransformComponent::from_translation(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation_z(std::f32::consts::FRAC_PI_2)
            .with_uniform_scale(2.0);
        scene.get_component_mut::<TransformComponent>(child).translation = Vec3::new(1.0, 0.0, 0.0);

        let world = scene.world_transform(child);

        assert_relative_eq!(world.position, Vec3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(world.scale, Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_set_world_transform_round_trip() {
        let mut scene = Scene::new("Test");
        let parent = scene.create_entity("Parent");
        let child = scene.create_child_entity("Child", parent);
        scene.get_component_mut::<TransformComponent>(parent).translation = Vec3::new(3.0, 4.0, 0.0);

        let target = Transform {
            position: Vec3::new(-1.0, 2.0, 0.0),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        };
        scene.set_world_transform(child, &target);

        assert_relative_eq!(scene.get_component::<TransformComponent>(child).translation, Vec3::new(-4.0, -2.0, 0.0));
        assert_relative_eq!(scene.world_transform(child).position, target.position);
    }

    #[test]
    #[should_panic(expected = "cycle")]
    fn test_cycle_is_rejected() {
        let mut scene = Scene::new("Test");
        let a = scene.create_entity("A");
        let b = scene.create_child_entity("B", a);
        scene.make_relationship(b, a);
    }

    #[test]
    fn test_reparenting_cleans_old_parent() {
        let mut scene = Scene::new("Test");
        let a = scene.create_entity("A");
        let b = scene.create_entity("B");
        let child = scene.create_child_entity("Child", a);

        scene.make_relationship(b, child);

        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), vec![child]);
        assert_eq!(scene.parent(child), Some(b));
    }

    #[test]
    fn test_duplicate_copies_hierarchy_without_runtime_handles() {
        let mut scene = Scene::new("Test");
        let root = scene.create_entity("Root");
        scene.create_child_entity("Leaf", root);
        scene.add_component(root, SpriteComponent::default());

        let (copy, pairs) = scene.duplicate_hierarchy(root);

        assert_ne!(scene.uuid(copy), scene.uuid(root));
        assert_eq!(scene.tag(copy), "Root");
        assert!(scene.has_component::<SpriteComponent>(copy));
        assert_eq!(scene.children(copy).len(), 1);
        assert_eq!(scene.children(root).len(), 1);
        assert_eq!(pairs.len(), 2);
        assert_eq!(scene.entity_count(), 4);
    }

    #[test]
    fn test_viewport_resize_skips_fixed_cameras() {
        let mut scene = Scene::new("Test");
        let free = scene.create_entity("Free");
        let fixed = scene.create_entity("Fixed");
        scene.add_component(free, CameraComponent::default());
        scene.add_component(
            fixed,
            CameraComponent {
                fixed_aspect_ratio: true,
                ..CameraComponent::default()
            },
        );

        scene.on_viewport_resize(1000, 500);

        assert_relative_eq!(scene.get_component::<CameraComponent>(free).camera.aspect_ratio(), 2.0);
        assert_relative_eq!(
            scene.get_component::<CameraComponent>(fixed).camera.aspect_ratio(),
            16.0 / 9.0
        );
    }

    #[test]
    fn test_primary_camera() {
        let mut scene = Scene::new("Test");
        assert!(scene.primary_camera_entity().is_null());

        let secondary = scene.create_entity("Secondary");
        scene.add_component(
            secondary,
            CameraComponent {
                primary: false,
                ..CameraComponent::default()
            },
        );
        let main = scene.create_entity("Main");
        scene.add_component(main, CameraComponent::default());

        assert_eq!(scene.primary_camera_entity(), main);
    }
}
