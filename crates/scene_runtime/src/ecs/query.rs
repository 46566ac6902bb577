//! Multi-component views
//!
//! A [`View`] yields every entity that has all components of a set. It is
//! driven by the smallest participating storage and checks membership in the
//! others, so cost scales with the rarest component.

use std::any::TypeId;

use super::{AnyStorage, Component, EntityId, Registry};

/// A set of component types usable in [`Registry::view`]
pub trait ComponentSet: 'static {
    /// Type ids of every member
    fn type_ids() -> Vec<TypeId>;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn type_ids() -> Vec<TypeId> {
                vec![$(TypeId::of::<$name>()),+]
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);

/// Lazy iterator over entities having every component of a set
///
/// A clone continues from the original's position; `View::restart` rewinds
/// to the first entity.
#[derive(Clone)]
pub struct View<'a> {
    driver: &'a [EntityId],
    others: Vec<&'a dyn AnyStorage>,
    cursor: usize,
}

impl<'a> View<'a> {
    pub(super) fn new(registry: &'a Registry, types: &[TypeId]) -> Self {
        let mut storages = Vec::with_capacity(types.len());
        for type_id in types {
            match registry.storage_dyn(*type_id) {
                Some(storage) => storages.push(storage),
                None => return Self::empty(),
            }
        }

        let Some(smallest) = storages
            .iter()
            .enumerate()
            .min_by_key(|(_, storage)| storage.ids().len())
            .map(|(index, _)| index)
        else {
            return Self::empty();
        };

        let driver = storages.swap_remove(smallest).ids();
        Self {
            driver,
            others: storages,
            cursor: 0,
        }
    }

    fn empty() -> Self {
        Self {
            driver: &[],
            others: Vec::new(),
            cursor: 0,
        }
    }

    /// Rewind to the first entity
    pub fn restart(&mut self) {
        self.cursor = 0;
    }
}

impl Iterator for View<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&id) = self.driver.get(self.cursor) {
            self.cursor += 1;
            if self.others.iter().all(|storage| storage.contains(id)) {
                return Some(id);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.driver.len().saturating_sub(self.cursor)))
    }
}
