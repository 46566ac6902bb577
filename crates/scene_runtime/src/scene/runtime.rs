//! Runtime sessions
//!
//! Play and Simulation run the scene in place. Starting a session builds the
//! physics world from the authored rigid bodies and colliders (and, for Play,
//! instantiates every script); each frame advances scripts, then physics,
//! then renders; stopping tears everything down and nulls every runtime
//! handle.

use super::render::{RenderCamera, RenderSink};
use super::Scene;
use crate::config::PhysicsConfig;
use crate::ecs::components::{
    BoxCollider2DComponent, CircleCollider2DComponent, Rigidbody2DComponent, TransformComponent, Uuid,
};
use crate::ecs::EntityId;
use crate::foundation::math::{euler, Transform, Vec2};
use crate::foundation::time::Timestep;
use crate::physics::{BodyDesc, BodyHandle, BodyPose, FixtureMaterial, FixtureShape, PhysicsWorld2D};
use crate::scripting::{ScriptCommand, ScriptEngine};

impl Scene {
    /// Build the physics world from every rigid body
    pub fn on_physics_start(&mut self, config: &PhysicsConfig) {
        let mut physics = PhysicsWorld2D::new(config);

        let bodies: Vec<EntityId> = self
            .registry
            .view::<(Rigidbody2DComponent, TransformComponent)>()
            .collect();

        for id in bodies {
            let world = self.world_transform_of(id);
            let scale = Vec2::new(world.scale.x.abs(), world.scale.y.abs());

            let rb = self.registry.get_mut::<Rigidbody2DComponent>(id);
            let body = physics.create_body(&BodyDesc {
                body_type: rb.body_type,
                translation: Vec2::new(world.position.x, world.position.y),
                angle: euler::from_quat(&world.rotation).z,
                fixed_rotation: rb.fixed_rotation,
            });
            rb.runtime_body = Some(body);

            let mut fixtures = 0;
            if let Some(collider) = self.registry.try_get_mut::<BoxCollider2DComponent>(id) {
                let shape = FixtureShape::Box {
                    half_extents: collider.size.component_mul(&scale),
                };
                let material = FixtureMaterial {
                    density: collider.density,
                    friction: collider.friction,
                    restitution: collider.restitution,
                };
                collider.runtime_fixture = Some(physics.create_fixture(body, shape, collider.offset, material));
                fixtures += 1;
            }
            if let Some(collider) = self.registry.try_get_mut::<CircleCollider2DComponent>(id) {
                let shape = FixtureShape::Circle {
                    radius: collider.radius * scale.x,
                };
                let material = FixtureMaterial {
                    density: collider.density,
                    friction: collider.friction,
                    restitution: collider.restitution,
                };
                collider.runtime_fixture = Some(physics.create_fixture(body, shape, collider.offset, material));
                fixtures += 1;
            }
            if fixtures == 0 {
                physics.ensure_mass(body);
            }
        }

        log::info!(
            "Physics started for scene '{}': {} bodies, {} colliders",
            self.name(),
            physics.body_count(),
            physics.collider_count()
        );
        self.physics = Some(physics);
    }

    /// Advance physics and copy body poses back into transforms
    pub fn step_physics(&mut self, dt: f32) {
        let Some(physics) = self.physics.as_mut() else {
            return;
        };
        physics.step(dt);

        let mut poses: Vec<(EntityId, BodyPose)> = Vec::new();
        for (id, rb) in self.registry.iter::<Rigidbody2DComponent>() {
            let pose = rb.runtime_body.and_then(|body| physics.body_pose(body));
            debug_assert!(pose.is_some(), "rigid body of {id:?} has no live physics body");
            if let Some(pose) = pose {
                poses.push((id, pose));
            }
        }

        for (id, pose) in poses {
            let mut world = self.world_transform_of(id);
            world.position.x = pose.translation.x;
            world.position.y = pose.translation.y;
            world.rotation = euler::with_z(&world.rotation, pose.angle);
            self.set_world_transform_of(id, &world);
        }
    }

    /// Drop the physics world and null every runtime handle
    pub fn on_physics_stop(&mut self) {
        if self.physics.take().is_none() {
            return;
        }

        for (_, rb) in self.registry.iter_mut::<Rigidbody2DComponent>() {
            rb.runtime_body = None;
        }
        for (_, collider) in self.registry.iter_mut::<BoxCollider2DComponent>() {
            collider.runtime_fixture = None;
        }
        for (_, collider) in self.registry.iter_mut::<CircleCollider2DComponent>() {
            collider.runtime_fixture = None;
        }
        log::info!("Physics stopped for scene '{}'", self.name());
    }

    /// Start Play: physics, then every script instance, then every creation hook
    pub fn on_runtime_start(&mut self, physics: &PhysicsConfig, scripts: &mut ScriptEngine) {
        self.on_physics_start(physics);
        self.resolve_world_transforms();

        scripts.on_runtime_start();
        scripts.sync_context(self);

        let bindings = self.script_bindings();
        for binding in &bindings {
            if let Err(e) = scripts.instantiate_entity(binding.entity, &binding.class_name, &binding.name) {
                log::error!(
                    "Failed to instantiate script '{}' on entity '{}': {}",
                    binding.class_name,
                    binding.name,
                    e
                );
            }
        }
        for binding in &bindings {
            scripts.on_create_entity(binding.entity);
        }

        self.apply_script_commands(scripts.drain_commands());
        self.resolve_world_transforms();
        log::info!(
            "Runtime started for scene '{}' with {} script instances",
            self.name(),
            scripts.instance_count()
        );
    }

    /// Start Simulation: physics only
    pub fn on_simulation_start(&mut self, physics: &PhysicsConfig) {
        self.on_physics_start(physics);
        self.resolve_world_transforms();
    }

    /// Stop Play: release every script instance, then physics
    pub fn on_runtime_stop(&mut self, scripts: &mut ScriptEngine) {
        scripts.on_runtime_stop();
        self.on_physics_stop();
    }

    /// Stop Simulation
    pub fn on_simulation_stop(&mut self) {
        self.on_physics_stop();
    }

    /// One Play frame: scripts, physics, primary-camera render
    pub fn on_update_runtime(&mut self, ts: Timestep, scripts: &mut ScriptEngine, sink: &mut dyn RenderSink) {
        scripts.sync_context(self);
        for binding in self.script_bindings() {
            scripts.on_update_entity(binding.entity, ts);
        }
        self.apply_script_commands(scripts.drain_commands());

        self.step_physics(ts.as_seconds());
        self.resolve_world_transforms();
        self.render_runtime(sink);
    }

    /// One Simulation frame: physics, editor-camera render
    pub fn on_update_simulation(&mut self, ts: Timestep, camera: &RenderCamera, sink: &mut dyn RenderSink) {
        self.step_physics(ts.as_seconds());
        self.resolve_world_transforms();
        self.render_with_camera(camera, sink);
    }

    /// One Edit frame: editor-camera render only
    pub fn on_update_editor(&mut self, _ts: Timestep, camera: &RenderCamera, sink: &mut dyn RenderSink) {
        self.resolve_world_transforms();
        self.render_with_camera(camera, sink);
    }

    /// Apply world mutations queued by scripts, in order
    pub fn apply_script_commands(&mut self, commands: Vec<ScriptCommand>) {
        for command in commands {
            match command {
                ScriptCommand::SetTranslation { entity, translation } => {
                    let Some(id) = self.script_target(entity) else {
                        continue;
                    };
                    if let Some(transform) = self.script_transform_mut(id) {
                        transform.translation = translation;
                        self.teleport_body(id);
                    }
                }
                ScriptCommand::SetRotation { entity, rotation } => {
                    let Some(id) = self.script_target(entity) else {
                        continue;
                    };
                    if let Some(transform) = self.script_transform_mut(id) {
                        transform.set_euler_angles(rotation);
                        self.teleport_body(id);
                    }
                }
                ScriptCommand::SetScale { entity, scale } => {
                    let Some(id) = self.script_target(entity) else {
                        continue;
                    };
                    if let Some(transform) = self.script_transform_mut(id) {
                        transform.scale = scale;
                    }
                }
                ScriptCommand::ApplyLinearImpulse { entity, impulse, point, wake } => {
                    let Some(body) = self.script_target(entity).and_then(|id| self.runtime_body(id)) else {
                        continue;
                    };
                    if let Some(physics) = self.physics.as_mut() {
                        match point {
                            Some(point) => physics.apply_linear_impulse(body, impulse, point, wake),
                            None => physics.apply_linear_impulse_to_center(body, impulse, wake),
                        }
                    }
                }
            }
        }
    }

    fn script_target(&self, uuid: Uuid) -> Option<EntityId> {
        let id = self.entity_id_of(uuid);
        if id.is_none() {
            log::warn!("Script command for unknown entity {}", uuid);
        }
        id
    }

    fn script_transform_mut(&mut self, id: EntityId) -> Option<&mut TransformComponent> {
        let transform = self.registry.try_get_mut::<TransformComponent>(id);
        if transform.is_none() {
            log::warn!("Script command for entity {:?} without a transform", id);
        }
        transform
    }

    fn runtime_body(&self, id: EntityId) -> Option<BodyHandle> {
        self.registry
            .try_get::<Rigidbody2DComponent>(id)
            .and_then(|rb| rb.runtime_body)
    }

    fn teleport_body(&mut self, id: EntityId) {
        let Some(body) = self.runtime_body(id) else {
            return;
        };
        let world: Transform = self.world_transform_of(id);
        if let Some(physics) = self.physics.as_mut() {
            physics.set_body_pose(
                body,
                BodyPose {
                    translation: Vec2::new(world.position.x, world.position.y),
                    angle: euler::from_quat(&world.rotation).z,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::RigidBodyType;
    use crate::foundation::math::Vec3;
    use crate::scene::{Entity, NullRenderSink, RenderFrame};
    use approx::assert_relative_eq;

    fn falling_box(scene: &mut Scene, y: f32) -> Entity {
        let entity = scene.create_entity("Box");
        scene.get_component_mut::<TransformComponent>(entity).translation = Vec3::new(0.0, y, 0.0);
        scene.add_component(entity, Rigidbody2DComponent::new(RigidBodyType::Dynamic));
        scene.add_component(entity, BoxCollider2DComponent::default());
        entity
    }

    #[test]
    fn test_physics_start_assigns_handles() {
        let mut scene = Scene::new("Physics");
        let entity = falling_box(&mut scene, 5.0);

        scene.on_physics_start(&PhysicsConfig::default());

        assert!(scene.get_component::<Rigidbody2DComponent>(entity).runtime_body.is_some());
        assert!(scene.get_component::<BoxCollider2DComponent>(entity).runtime_fixture.is_some());
        assert_eq!(scene.physics().unwrap().body_count(), 1);
    }

    #[test]
    fn test_physics_stop_nulls_handles() {
        let mut scene = Scene::new("Physics");
        let entity = falling_box(&mut scene, 5.0);
        scene.on_physics_start(&PhysicsConfig::default());

        scene.on_physics_stop();

        assert!(scene.physics().is_none());
        assert!(scene.get_component::<Rigidbody2DComponent>(entity).runtime_body.is_none());
        assert!(scene.get_component::<BoxCollider2DComponent>(entity).runtime_fixture.is_none());
    }

    #[test]
    fn test_step_writes_back_transform() {
        let mut scene = Scene::new("Physics");
        let entity = falling_box(&mut scene, 5.0);
        scene.on_physics_start(&PhysicsConfig::default());

        for _ in 0..30 {
            scene.step_physics(1.0 / 60.0);
        }

        let translation = scene.get_component::<TransformComponent>(entity).translation;
        assert!(translation.y < 5.0);
        assert_relative_eq!(translation.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_simulation_frame_renders_through_editor_camera() {
        let mut scene = Scene::new("Physics");
        falling_box(&mut scene, 5.0);
        scene.on_simulation_start(&PhysicsConfig::default());

        let mut frames = Vec::new();
        let mut sink = |frame: &RenderFrame| frames.push(frame.camera);
        let camera = RenderCamera::default();
        scene.on_update_simulation(Timestep::from_seconds(1.0 / 60.0), &camera, &mut sink);

        assert_eq!(frames, vec![camera]);
    }

    #[test]
    fn test_translation_command_teleports_body() {
        let mut scene = Scene::new("Physics");
        let entity = falling_box(&mut scene, 5.0);
        let uuid = scene.uuid(entity);
        scene.on_physics_start(&PhysicsConfig::default());

        scene.apply_script_commands(vec![ScriptCommand::SetTranslation {
            entity: uuid,
            translation: Vec3::new(3.0, 7.0, 0.0),
        }]);

        let body = scene.get_component::<Rigidbody2DComponent>(entity).runtime_body.unwrap();
        let pose = scene.physics().unwrap().body_pose(body).unwrap();
        assert_relative_eq!(pose.translation, Vec2::new(3.0, 7.0));
    }

    #[test]
    fn test_unknown_command_target_is_ignored() {
        let mut scene = Scene::new("Physics");
        scene.apply_script_commands(vec![ScriptCommand::SetScale {
            entity: Uuid::from_raw(7),
            scale: Vec3::new(2.0, 2.0, 2.0),
        }]);
        scene.on_update_editor(Timestep::from_seconds(0.016), &RenderCamera::default(), &mut NullRenderSink);
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn test_transform_command_without_transform_is_ignored() {
        let mut scene = Scene::new("Physics");
        let entity = scene.create_entity("Bare");
        let uuid = scene.uuid(entity);
        scene.remove_component::<TransformComponent>(entity);

        scene.apply_script_commands(vec![
            ScriptCommand::SetTranslation {
                entity: uuid,
                translation: Vec3::new(1.0, 2.0, 0.0),
            },
            ScriptCommand::SetRotation {
                entity: uuid,
                rotation: Vec3::new(0.0, 0.0, 1.0),
            },
            ScriptCommand::SetScale {
                entity: uuid,
                scale: Vec3::new(2.0, 2.0, 2.0),
            },
        ]);

        assert!(!scene.has_component::<TransformComponent>(entity));
        assert!(scene.is_valid(entity));
    }

    #[test]
    fn test_destroy_during_run_removes_body() {
        let mut scene = Scene::new("Physics");
        let entity = falling_box(&mut scene, 5.0);
        scene.on_physics_start(&PhysicsConfig::default());

        scene.destroy_entity(entity);
        scene.step_physics(1.0 / 60.0);

        assert_eq!(scene.physics().unwrap().body_count(), 0);
    }
}
