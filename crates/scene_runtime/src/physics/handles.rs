//! Typed runtime handles into the physics bridge
//!
//! Components store these instead of backend pointers. They index tables
//! owned by [`PhysicsWorld2D`](super::PhysicsWorld2D) and are only meaningful
//! while that world exists.

slotmap::new_key_type! {
    /// Handle to a rigid body created by the physics bridge
    pub struct BodyHandle;

    /// Handle to a collider (fixture) created by the physics bridge
    pub struct FixtureHandle;
}
