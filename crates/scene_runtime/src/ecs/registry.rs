//! Component registry
//!
//! Owns every entity identity and one sparse-set storage per component type.
//! Structural misuse (double add, missing component, dead entity) is a
//! programming error and panics.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use slotmap::SlotMap;

use super::{
    AnyStorage, Component, ComponentSet, ComponentStorage, EntityId, HookContext, ReleasedBinding,
    View,
};

#[derive(Default)]
struct HookState {
    viewport_size: (u32, u32),
    released: Vec<ReleasedBinding>,
}

/// Entity and component store
#[derive(Default)]
pub struct Registry {
    entities: SlotMap<EntityId, ()>,
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
    hooks: HookState,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity identity
    pub fn create(&mut self) -> EntityId {
        self.entities.insert(())
    }

    /// Whether `id` refers to a live entity
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether there are no live entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Destroy an entity and every component it owns
    ///
    /// Removal hooks run for each component before it is erased.
    pub fn destroy(&mut self, id: EntityId) {
        assert!(self.is_alive(id), "destroy called on dead entity {id:?}");

        let mut ctx = HookContext {
            entity: id,
            viewport_size: self.hooks.viewport_size,
            released_bindings: &mut self.hooks.released,
        };
        for storage in self.storages.values_mut() {
            storage.remove_entity(id, &mut ctx);
        }

        self.entities.remove(id);
    }

    /// Drop every entity and component without running hooks
    pub fn clear(&mut self) {
        self.entities.clear();
        for storage in self.storages.values_mut() {
            storage.clear();
        }
    }

    /// Attach a component, running its `on_add` hook
    ///
    /// # Panics
    ///
    /// Panics when the entity is dead or already has a `T`.
    pub fn add<T: Component>(&mut self, id: EntityId, component: T) -> &mut T {
        assert!(self.is_alive(id), "add_component on dead entity {id:?}");
        assert!(
            !self.has::<T>(id),
            "entity {id:?} already has component {}",
            type_name::<T>()
        );

        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .unwrap_or_else(|| unreachable!("storage registered under a foreign type id"));

        let value = storage.insert(id, component);
        let mut ctx = HookContext {
            entity: id,
            viewport_size: self.hooks.viewport_size,
            released_bindings: &mut self.hooks.released,
        };
        value.on_add(&mut ctx);
        value
    }

    /// Attach a component, replacing any existing one
    ///
    /// The old value's `on_remove` hook runs before the new one's `on_add`.
    pub fn add_or_replace<T: Component>(&mut self, id: EntityId, component: T) -> &mut T {
        if self.has::<T>(id) {
            self.remove::<T>(id);
        }
        self.add(id, component)
    }

    /// Detach a component, running its `on_remove` hook first
    ///
    /// # Panics
    ///
    /// Panics when the entity has no `T`.
    pub fn remove<T: Component>(&mut self, id: EntityId) -> T {
        let mut ctx = HookContext {
            entity: id,
            viewport_size: self.hooks.viewport_size,
            released_bindings: &mut self.hooks.released,
        };
        let storage = self
            .storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<ComponentStorage<T>>());

        let Some(storage) = storage.filter(|storage| storage.contains(id)) else {
            panic!("entity {id:?} has no component {}", type_name::<T>());
        };

        if let Some(component) = storage.get_mut(id) {
            component.on_remove(&mut ctx);
        }
        storage
            .remove(id)
            .unwrap_or_else(|| unreachable!("component vanished during its removal hook"))
    }

    /// Whether `id` has a `T`
    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.storage::<T>().is_some_and(|storage| storage.contains(id))
    }

    /// Component of `id`
    ///
    /// # Panics
    ///
    /// Panics when the entity has no `T`.
    pub fn get<T: Component>(&self, id: EntityId) -> &T {
        self.try_get(id)
            .unwrap_or_else(|| panic!("entity {id:?} has no component {}", type_name::<T>()))
    }

    /// Mutable component of `id`
    ///
    /// # Panics
    ///
    /// Panics when the entity has no `T`.
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> &mut T {
        self.try_get_mut(id)
            .unwrap_or_else(|| panic!("entity {id:?} has no component {}", type_name::<T>()))
    }

    /// Component of `id`, if present
    pub fn try_get<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.storage::<T>()?.get(id)
    }

    /// Mutable component of `id`, if present
    pub fn try_get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(id)
    }

    /// Entities having every component in `S`
    pub fn view<S: ComponentSet>(&self) -> View<'_> {
        View::new(self, &S::type_ids())
    }

    /// Iterate `(id, component)` pairs of one type in storage order
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.storage::<T>().into_iter().flat_map(ComponentStorage::iter)
    }

    /// Iterate `(id, component)` pairs of one type mutably in storage order
    pub fn iter_mut<T: Component>(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.storage_mut::<T>().into_iter().flat_map(ComponentStorage::iter_mut)
    }

    /// Typed storage for `T`, if any component of that type was ever added
    pub fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    pub(super) fn storage_dyn(&self, type_id: TypeId) -> Option<&dyn AnyStorage> {
        self.storages.get(&type_id).map(|storage| &**storage)
    }

    /// Viewport size handed to `on_add` hooks
    pub fn viewport_size(&self) -> (u32, u32) {
        self.hooks.viewport_size
    }

    /// Set the viewport size handed to `on_add` hooks
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.hooks.viewport_size = (width, height);
    }

    /// Take the interpreter bindings released by removal hooks since the last call
    pub fn take_released_bindings(&mut self) -> Vec<ReleasedBinding> {
        std::mem::take(&mut self.hooks.released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position(f32, f32);
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity(f32, f32);
    impl Component for Velocity {}

    struct Health(u32);
    impl Component for Health {}

    struct Bound(&'static str);
    impl Component for Bound {
        fn on_add(&mut self, ctx: &mut HookContext<'_>) {
            if ctx.viewport_size.0 > 0 {
                self.0 = "sized";
            }
        }

        fn on_remove(&mut self, ctx: &mut HookContext<'_>) {
            ctx.released_bindings.push(ReleasedBinding {
                entity: ctx.entity,
                class_name: self.0.to_string(),
            });
        }
    }

    #[test]
    fn test_add_get_remove() {
        let mut registry = Registry::new();
        let e = registry.create();

        registry.add(e, Position(1.0, 2.0));
        assert!(registry.has::<Position>(e));
        assert_eq!(registry.get::<Position>(e), &Position(1.0, 2.0));

        registry.get_mut::<Position>(e).0 = 5.0;
        assert_eq!(registry.remove::<Position>(e), Position(5.0, 2.0));
        assert!(!registry.has::<Position>(e));
        assert!(registry.try_get::<Position>(e).is_none());
    }

    #[test]
    #[should_panic(expected = "already has component")]
    fn test_double_add_panics() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Health(1));
        registry.add(e, Health(2));
    }

    #[test]
    #[should_panic(expected = "has no component")]
    fn test_missing_get_panics() {
        let mut registry = Registry::new();
        let e = registry.create();
        let _ = registry.get::<Health>(e);
    }

    #[test]
    fn test_destroy_removes_everything_and_runs_hooks() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Position(0.0, 0.0));
        registry.add(e, Bound("Player"));

        registry.destroy(e);

        assert!(!registry.is_alive(e));
        assert!(!registry.has::<Position>(e));
        assert_eq!(registry.view::<(Position,)>().count(), 0);
        assert_eq!(
            registry.take_released_bindings(),
            vec![ReleasedBinding { entity: e, class_name: "Player".to_string() }]
        );
        assert!(registry.take_released_bindings().is_empty());
    }

    #[test]
    fn test_stale_id_is_not_alive() {
        let mut registry = Registry::new();
        let old = registry.create();
        registry.destroy(old);
        let new = registry.create();

        assert_ne!(old, new);
        assert!(!registry.is_alive(old));
        assert!(registry.is_alive(new));
    }

    #[test]
    fn test_on_add_sees_viewport() {
        let mut registry = Registry::new();
        registry.set_viewport_size(1280, 720);
        let e = registry.create();

        assert_eq!(registry.add(e, Bound("unsized")).0, "sized");
    }

    #[test]
    fn test_view_intersects_and_restarts() {
        let mut registry = Registry::new();
        let a = registry.create();
        let b = registry.create();
        let c = registry.create();

        registry.add(a, Position(0.0, 0.0));
        registry.add(b, Position(0.0, 0.0));
        registry.add(c, Position(0.0, 0.0));
        registry.add(b, Velocity(1.0, 0.0));
        registry.add(c, Velocity(1.0, 0.0));
        registry.add(c, Health(3));

        let mut view = registry.view::<(Position, Velocity)>();
        let mut first: Vec<_> = view.by_ref().collect();
        first.sort();
        let mut expected = vec![b, c];
        expected.sort();
        assert_eq!(first, expected);

        view.restart();
        assert_eq!(view.count(), 2);

        let all: Vec<_> = registry.view::<(Position, Velocity, Health)>().collect();
        assert_eq!(all, vec![c]);
    }

    #[test]
    fn test_view_of_unknown_type_is_empty() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Position(0.0, 0.0));

        assert_eq!(registry.view::<(Position, Health)>().count(), 0);
    }

    #[test]
    fn test_clear_skips_hooks() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Bound("Player"));

        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.take_released_bindings().is_empty());
    }
}
