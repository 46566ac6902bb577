//! # 2D Physics World
//!
//! Thin bridge over rapier2d. The world owns every rapier set and exposes
//! bodies and colliders through typed [`BodyHandle`] / [`FixtureHandle`]
//! keys, so nothing outside this module ever holds a backend handle.
//!
//! Values cross the boundary as plain `f32` components; the rapier math types
//! stay private to this file.

use rapier2d::prelude::*;
use slotmap::SlotMap;

use super::{BodyHandle, FixtureHandle};
use crate::config::PhysicsConfig;
use crate::ecs::components::RigidBodyType;
use crate::foundation::math::Vec2;

/// Parameters for a new body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    /// Simulation mode
    pub body_type: RigidBodyType,
    /// World-space position
    pub translation: Vec2,
    /// Rotation around Z in radians
    pub angle: f32,
    /// Lock rotation
    pub fixed_rotation: bool,
}

/// Surface parameters for a new fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureMaterial {
    /// Mass density
    pub density: f32,
    /// Friction coefficient
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
}

/// Fixture geometry, already scaled to world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureShape {
    /// Axis-aligned box given by half extents
    Box {
        /// Half width and half height
        half_extents: Vec2,
    },
    /// Circle
    Circle {
        /// Radius
        radius: f32,
    },
}

/// Body pose read back after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    /// World-space position
    pub translation: Vec2,
    /// Rotation around Z in radians
    pub angle: f32,
}

/// A running 2D physics simulation
pub struct PhysicsWorld2D {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    body_table: SlotMap<BodyHandle, RigidBodyHandle>,
    fixture_table: SlotMap<FixtureHandle, ColliderHandle>,
}

impl PhysicsWorld2D {
    /// Create an empty world
    pub fn new(config: &PhysicsConfig) -> Self {
        let integration_parameters = IntegrationParameters {
            max_velocity_iterations: config.velocity_iterations,
            max_stabilization_iterations: config.position_iterations,
            ..IntegrationParameters::default()
        };

        Self {
            gravity: vector![config.gravity[0], config.gravity[1]],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            body_table: SlotMap::with_key(),
            fixture_table: SlotMap::with_key(),
        }
    }

    /// Create a body
    pub fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.body_type {
            RigidBodyType::Static => RigidBodyBuilder::fixed(),
            RigidBodyType::Dynamic => RigidBodyBuilder::dynamic(),
            RigidBodyType::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };

        let mut builder = builder
            .translation(vector![desc.translation.x, desc.translation.y])
            .rotation(desc.angle);
        if desc.fixed_rotation {
            builder = builder.lock_rotations();
        }

        let handle = self.bodies.insert(builder.build());
        self.body_table.insert(handle)
    }

    /// Attach a fixture to a body
    ///
    /// # Panics
    ///
    /// Panics when `body` does not belong to this world.
    pub fn create_fixture(
        &mut self,
        body: BodyHandle,
        shape: FixtureShape,
        offset: Vec2,
        material: FixtureMaterial,
    ) -> FixtureHandle {
        let parent = self.rapier_body(body);
        let builder = match shape {
            FixtureShape::Box { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
            FixtureShape::Circle { radius } => ColliderBuilder::ball(radius),
        };

        let collider = builder
            .translation(vector![offset.x, offset.y])
            .density(material.density)
            .friction(material.friction)
            .restitution(material.restitution)
            .build();

        let handle = self.colliders.insert_with_parent(collider, parent, &mut self.bodies);
        self.fixture_table.insert(handle)
    }

    /// Remove a body together with its fixtures
    pub fn remove_body(&mut self, body: BodyHandle) {
        let Some(handle) = self.body_table.remove(body) else {
            return;
        };
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );

        let colliders = &self.colliders;
        self.fixture_table.retain(|_, collider| colliders.contains(*collider));
    }

    /// Give a dynamic body without fixtures a unit mass so it still reacts to gravity
    pub fn ensure_mass(&mut self, body: BodyHandle) {
        let parent = self.rapier_body(body);
        if let Some(rb) = self.bodies.get_mut(parent) {
            if rb.is_dynamic() && rb.mass() <= 0.0 {
                rb.set_additional_mass(1.0, true);
            }
        }
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Current pose of a body
    pub fn body_pose(&self, body: BodyHandle) -> Option<BodyPose> {
        let rb = self.bodies.get(*self.body_table.get(body)?)?;
        let translation = rb.translation();
        Some(BodyPose {
            translation: Vec2::new(translation.x, translation.y),
            angle: rb.rotation().angle(),
        })
    }

    /// Teleport a body
    pub fn set_body_pose(&mut self, body: BodyHandle, pose: BodyPose) {
        let Some(rb) = self
            .body_table
            .get(body)
            .and_then(|&handle| self.bodies.get_mut(handle))
        else {
            return;
        };

        let translation = vector![pose.translation.x, pose.translation.y];
        if rb.is_kinematic() {
            rb.set_next_kinematic_position(Isometry::new(translation, pose.angle));
        } else {
            rb.set_translation(translation, true);
            rb.set_rotation(Rotation::new(pose.angle), true);
        }
    }

    /// Apply an impulse at a world-space point
    pub fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2, point: Vec2, wake: bool) {
        if let Some(rb) = self.body_mut(body) {
            rb.apply_impulse_at_point(vector![impulse.x, impulse.y], point![point.x, point.y], wake);
        }
    }

    /// Apply an impulse at the center of mass
    pub fn apply_linear_impulse_to_center(&mut self, body: BodyHandle, impulse: Vec2, wake: bool) {
        if let Some(rb) = self.body_mut(body) {
            rb.apply_impulse(vector![impulse.x, impulse.y], wake);
        }
    }

    /// Linear velocity of a body
    pub fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        let rb = self.bodies.get(*self.body_table.get(body)?)?;
        let velocity = rb.linvel();
        Some(Vec2::new(velocity.x, velocity.y))
    }

    /// Whether `body` is live in this world
    pub fn contains_body(&self, body: BodyHandle) -> bool {
        self.body_table.contains_key(body)
    }

    /// Whether `fixture` is live in this world
    pub fn contains_fixture(&self, fixture: FixtureHandle) -> bool {
        self.fixture_table.contains_key(fixture)
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Gravity vector
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        let handle = *self.body_table.get(body)?;
        self.bodies.get_mut(handle)
    }

    fn rapier_body(&self, body: BodyHandle) -> RigidBodyHandle {
        match self.body_table.get(body) {
            Some(&handle) => handle,
            None => panic!("body handle {body:?} does not belong to this physics world"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dynamic_at(y: f32) -> BodyDesc {
        BodyDesc {
            body_type: RigidBodyType::Dynamic,
            translation: Vec2::new(0.0, y),
            angle: 0.0,
            fixed_rotation: false,
        }
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = PhysicsWorld2D::new(&PhysicsConfig::default());
        let body = world.create_body(&dynamic_at(10.0));
        world.ensure_mass(body);

        let mut last = world.body_pose(body).unwrap().translation.y;
        for _ in 0..10 {
            world.step(1.0 / 60.0);
            let y = world.body_pose(body).unwrap().translation.y;
            assert!(y < last, "expected {y} < {last}");
            last = y;
        }
    }

    #[test]
    fn test_static_body_stays_put() {
        let mut world = PhysicsWorld2D::new(&PhysicsConfig::default());
        let body = world.create_body(&BodyDesc {
            body_type: RigidBodyType::Static,
            ..dynamic_at(3.0)
        });
        world.create_fixture(
            body,
            FixtureShape::Box { half_extents: Vec2::new(5.0, 0.5) },
            Vec2::zeros(),
            FixtureMaterial { density: 1.0, friction: 0.5, restitution: 0.0 },
        );

        world.step(1.0 / 60.0);

        assert_relative_eq!(world.body_pose(body).unwrap().translation.y, 3.0);
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);
    }

    #[test]
    fn test_impulse_changes_velocity() {
        let mut world = PhysicsWorld2D::new(&PhysicsConfig {
            gravity: [0.0, 0.0],
            ..PhysicsConfig::default()
        });
        let body = world.create_body(&dynamic_at(0.0));
        world.create_fixture(
            body,
            FixtureShape::Circle { radius: 0.5 },
            Vec2::zeros(),
            FixtureMaterial { density: 1.0, friction: 0.5, restitution: 0.0 },
        );
        world.step(1.0 / 60.0);

        world.apply_linear_impulse_to_center(body, Vec2::new(1.0, 0.0), true);

        assert!(world.linear_velocity(body).unwrap().x > 0.0);
    }

    #[test]
    fn test_remove_body_drops_fixtures() {
        let mut world = PhysicsWorld2D::new(&PhysicsConfig::default());
        let body = world.create_body(&dynamic_at(0.0));
        let fixture = world.create_fixture(
            body,
            FixtureShape::Circle { radius: 0.5 },
            Vec2::zeros(),
            FixtureMaterial { density: 1.0, friction: 0.5, restitution: 0.0 },
        );

        world.remove_body(body);

        assert!(!world.contains_body(body));
        assert!(!world.contains_fixture(fixture));
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_zero_step_is_ignored() {
        let mut world = PhysicsWorld2D::new(&PhysicsConfig::default());
        let body = world.create_body(&dynamic_at(1.0));
        world.ensure_mass(body);

        world.step(0.0);

        assert_relative_eq!(world.body_pose(body).unwrap().translation.y, 1.0);
    }
}
