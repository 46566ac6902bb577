//! Display name component

use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Human-readable entity name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagComponent {
    /// Display name
    pub tag: String,
}

impl TagComponent {
    /// Create a tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Component for TagComponent {}
