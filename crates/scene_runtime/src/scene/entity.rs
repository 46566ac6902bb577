//! Entity handle

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ecs::EntityId;

/// Process-unique scene identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    /// Identity of no scene
    pub const NONE: Self = Self(0);

    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Lightweight reference to an entity in a specific scene
///
/// Owns no state. Two handles are equal only when both the entity identity
/// and the owning scene match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: EntityId,
    scene: SceneId,
}

impl Entity {
    /// The "no entity" sentinel
    pub fn null() -> Self {
        Self {
            id: EntityId::null(),
            scene: SceneId::NONE,
        }
    }

    pub(crate) fn new(id: EntityId, scene: SceneId) -> Self {
        Self { id, scene }
    }

    /// Registry identity
    pub fn id(self) -> EntityId {
        self.id
    }

    /// Owning scene
    pub fn scene(self) -> SceneId {
        self.scene
    }

    /// Whether this is the sentinel
    pub fn is_null(self) -> bool {
        self.id.is_null()
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::null()
    }
}
