//! Entity identity

use slotmap::Key;

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// A (slot, generation) pair allocated by the [`Registry`](super::Registry).
    /// A destroyed entity's slot may be reused, but never with the same
    /// generation, so stale ids never alias a live entity.
    pub struct EntityId;
}

impl EntityId {
    /// The null identity
    pub fn null() -> Self {
        <Self as Key>::null()
    }

    /// Whether this is the null identity
    pub fn is_null(self) -> bool {
        Key::is_null(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        assert!(EntityId::default().is_null());
        assert_eq!(EntityId::default(), EntityId::null());
    }
}
