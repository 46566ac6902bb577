//! Physics bridge integration tests
//!
//! Bodies are built from authored components on Play and their poses flow
//! back into transforms every frame.

use scene_runtime::prelude::*;

fn controller_with(scene: Scene) -> SceneController {
    let config = RuntimeConfig {
        scripting: ScriptConfig {
            reload_scripts_on_start: false,
            ..ScriptConfig::new("assets/scripts")
        },
        ..RuntimeConfig::default()
    };
    SceneController::new(scene, config)
}

fn step(controller: &mut SceneController) {
    controller
        .on_update(Timestep::from_seconds(1.0 / 60.0), &RenderCamera::default(), &mut NullRenderSink)
        .unwrap();
}

#[test]
fn dynamic_body_falls_monotonically_for_sixty_steps() {
    let mut scene = Scene::new("FreeFall");
    let a = scene.create_entity("A");
    scene.get_component_mut::<TransformComponent>(a).translation = Vec3::new(0.0, 10.0, 0.0);
    scene.add_component(a, Rigidbody2DComponent::new(RigidBodyType::Dynamic));

    let mut controller = controller_with(scene);
    controller.play().unwrap();

    let mut last_y = 10.0;
    for _ in 0..60 {
        step(&mut controller);
        let a = controller.scene().find_entity_by_name("A");
        let y = controller.scene().get_component::<TransformComponent>(a).translation.y;
        assert!(y <= last_y, "y went up: {y} > {last_y}");
        last_y = y;
    }

    assert!(last_y < 10.0);
    // One second of free fall under 9.8
    assert!(last_y < 5.3 && last_y > 4.8, "unexpected fall distance, y = {last_y}");
}

#[test]
fn box_comes_to_rest_on_static_ground() {
    let mut scene = Scene::new("Ground");
    let ground = scene.create_entity("Ground");
    scene.get_component_mut::<TransformComponent>(ground).scale = Vec3::new(10.0, 1.0, 1.0);
    scene.add_component(ground, Rigidbody2DComponent::new(RigidBodyType::Static));
    scene.add_component(ground, BoxCollider2DComponent::default());

    let crate_box = scene.create_entity("Crate");
    scene.get_component_mut::<TransformComponent>(crate_box).translation = Vec3::new(0.0, 3.0, 0.0);
    scene.add_component(crate_box, Rigidbody2DComponent::new(RigidBodyType::Dynamic));
    scene.add_component(crate_box, BoxCollider2DComponent::default());

    let mut controller = controller_with(scene);
    controller.simulate().unwrap();
    for _ in 0..240 {
        step(&mut controller);
    }

    let scene = controller.scene();
    let crate_box = scene.find_entity_by_name("Crate");
    let y = scene.get_component::<TransformComponent>(crate_box).translation.y;
    // Ground top is at 0.5, crate half height is 0.5
    assert!((y - 1.0).abs() < 0.1, "crate should rest on the ground, y = {y}");

    let ground = scene.find_entity_by_name("Ground");
    assert_eq!(scene.get_component::<TransformComponent>(ground).translation, Vec3::zeros());
}

#[test]
fn fixed_rotation_body_keeps_its_angle() {
    let mut scene = Scene::new("Spin");
    let ground = scene.create_entity("Ground");
    *scene.get_component_mut::<TransformComponent>(ground) =
        TransformComponent::identity().with_rotation_z(0.4).with_scale(Vec3::new(10.0, 1.0, 1.0));
    scene.add_component(ground, Rigidbody2DComponent::new(RigidBodyType::Static));
    scene.add_component(ground, BoxCollider2DComponent::default());

    let wheel = scene.create_entity("Wheel");
    scene.get_component_mut::<TransformComponent>(wheel).translation = Vec3::new(0.0, 2.0, 0.0);
    scene.add_component(wheel, Rigidbody2DComponent::new(RigidBodyType::Dynamic).with_fixed_rotation(true));
    scene.add_component(wheel, CircleCollider2DComponent::default());

    let mut controller = controller_with(scene);
    controller.simulate().unwrap();
    for _ in 0..120 {
        step(&mut controller);
    }

    let scene = controller.scene();
    let wheel = scene.find_entity_by_name("Wheel");
    let angle = scene.get_component::<TransformComponent>(wheel).euler_angles().z;
    assert!(angle.abs() < 1e-4, "fixed-rotation body rotated to {angle}");
}

#[test]
fn stop_clears_every_runtime_handle() {
    let mut scene = Scene::new("Handles");
    let body = scene.create_entity("Body");
    scene.add_component(body, Rigidbody2DComponent::new(RigidBodyType::Dynamic));
    scene.add_component(body, CircleCollider2DComponent::default());

    let mut controller = controller_with(scene);
    controller.play().unwrap();
    step(&mut controller);
    controller.stop().unwrap();

    let scene = controller.scene();
    assert!(scene.physics().is_none());
    for (_, rb) in scene.registry().iter::<Rigidbody2DComponent>() {
        assert!(rb.runtime_body.is_none());
    }
    for (_, collider) in scene.registry().iter::<CircleCollider2DComponent>() {
        assert!(collider.runtime_fixture.is_none());
    }
}
