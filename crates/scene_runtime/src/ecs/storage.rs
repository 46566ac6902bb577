//! Sparse-set component storage
//!
//! Each component type lives in its own [`ComponentStorage`]: a sparse index
//! from entity id to a slot in two packed arrays (ids and values). Insert,
//! remove and lookup are O(1); removal swaps the last element into the hole,
//! so dense order is insertion order until the first removal.

use std::any::Any;

use slotmap::SecondaryMap;

use super::{Component, EntityId, HookContext};

/// Packed storage for one component type
pub struct ComponentStorage<T> {
    sparse: SecondaryMap<EntityId, usize>,
    ids: Vec<EntityId>,
    components: Vec<T>,
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            sparse: SecondaryMap::new(),
            ids: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Store a component for `id`, replacing any previous value
    pub fn insert(&mut self, id: EntityId, component: T) -> &mut T {
        if let Some(&index) = self.sparse.get(id) {
            self.components[index] = component;
            return &mut self.components[index];
        }

        let index = self.components.len();
        self.sparse.insert(id, index);
        self.ids.push(id);
        self.components.push(component);
        &mut self.components[index]
    }

    /// Remove and return the component of `id`
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let index = self.sparse.remove(id)?;
        let removed = self.components.swap_remove(index);
        self.ids.swap_remove(index);

        if let Some(&moved) = self.ids.get(index) {
            self.sparse[moved] = index;
        }

        Some(removed)
    }

    /// Whether `id` has a component in this storage
    pub fn contains(&self, id: EntityId) -> bool {
        self.sparse.contains_key(id)
    }

    /// Component of `id`
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.sparse.get(id).map(|&index| &self.components[index])
    }

    /// Mutable component of `id`
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let index = *self.sparse.get(id)?;
        Some(&mut self.components[index])
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Entity ids in dense order
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Iterate `(id, component)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.ids.iter().copied().zip(self.components.iter())
    }

    /// Iterate `(id, component)` pairs mutably in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.ids.iter().copied().zip(self.components.iter_mut())
    }

    /// Drop every component without running hooks
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.ids.clear();
        self.components.clear();
    }
}

/// Type-erased view of a [`ComponentStorage`]
pub trait AnyStorage: Any {
    /// Whether `id` has a component in this storage
    fn contains(&self, id: EntityId) -> bool;

    /// Entity ids in dense order
    fn ids(&self) -> &[EntityId];

    /// Run the removal hook and erase the component of `id`, if present
    fn remove_entity(&mut self, id: EntityId, ctx: &mut HookContext<'_>) -> bool;

    /// Drop every component without running hooks
    fn clear(&mut self);

    /// Upcast for downcasting to the concrete storage
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete storage
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for ComponentStorage<T> {
    fn contains(&self, id: EntityId) -> bool {
        ComponentStorage::contains(self, id)
    }

    fn ids(&self) -> &[EntityId] {
        ComponentStorage::ids(self)
    }

    fn remove_entity(&mut self, id: EntityId, ctx: &mut HookContext<'_>) -> bool {
        match self.get_mut(id) {
            Some(component) => component.on_remove(ctx),
            None => return false,
        }
        self.remove(id).is_some()
    }

    fn clear(&mut self) {
        ComponentStorage::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
