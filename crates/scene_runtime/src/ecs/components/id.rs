//! Stable entity identifiers

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Process-unique 64-bit identifier
///
/// The only entity key that survives a save/restore round trip. Zero is
/// reserved as the invalid id and is never generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uuid(u64);

impl Uuid {
    /// The reserved invalid id
    pub const INVALID: Self = Self(0);

    /// Generate a fresh random id
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let value: u64 = rng.gen();
            if value != 0 {
                return Self(value);
            }
        }
    }

    /// Wrap a raw value
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Raw value
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether this is a usable id
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for Uuid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Uuid {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identity component attached to every entity at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IDComponent {
    /// The entity's stable id
    pub id: Uuid,
}

impl Component for IDComponent {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let ids: HashSet<_> = (0..1000).map(|_| Uuid::new()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.is_valid()));
        assert!(!Uuid::INVALID.is_valid());
    }
}
