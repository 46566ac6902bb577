//! Sandbox host for the scene runtime
//!
//! Builds a small level, plays it headless for a fixed number of frames and
//! prints what the restored edit scene looks like afterwards. A scripted
//! camera follows the player and asks the runtime to stop once it lands.

use std::path::Path;

use rand::prelude::*;
use scene_runtime::foundation::time::Timer;
use scene_runtime::prelude::*;

const CONFIG_PATH: &str = "config/runtime.toml";
const FRAME_COUNT: usize = 240;
const FRAME_TIME: f32 = 1.0 / 60.0;
const BALL_COUNT: usize = 3;

/// Sink that logs a summary of every 60th frame
struct FrameLogger {
    frames: usize,
}

impl RenderSink for FrameLogger {
    fn submit(&mut self, frame: &RenderFrame) {
        if self.frames % 60 == 0 {
            log::info!(
                "Frame {}: {} sprites, {} circles",
                self.frames,
                frame.sprites.len(),
                frame.circles.len()
            );
        }
        self.frames += 1;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut config = RuntimeConfig::load_or_default(root.join(CONFIG_PATH));
    if config.scripting.scripts_folder.is_relative() {
        config.scripting.scripts_folder = root.join(&config.scripting.scripts_folder);
    }
    scene_runtime::foundation::logging::init_with_level(&config.log_level);
    if let Err(e) = config.validate() {
        log::warn!("Invalid runtime configuration, using defaults: {}", e);
        config = RuntimeConfig::default();
    }

    let mut controller = SceneController::new(Scene::new("Sandbox"), config);
    controller.on_viewport_resize(1280, 720);
    build_level(&mut controller)?;

    log::info!("Available script classes: {:?}", controller.scripts().available_modules()?);
    controller.play()?;

    let mut sink = FrameLogger { frames: 0 };
    let editor_camera = RenderCamera::default();
    let mut timer = Timer::new();
    for _ in 0..FRAME_COUNT {
        controller.on_update(Timestep::from_seconds(FRAME_TIME), &editor_camera, &mut sink)?;
        timer.tick();
        if controller.state() == SceneState::Edit {
            log::info!("Play ended by script after {} frames", sink.frames);
            break;
        }
    }
    controller.stop()?;
    log::info!(
        "Ran {} frames in {:.3}s ({:.0} frames/s)",
        timer.frame_count(),
        timer.total_time(),
        timer.average_fps()
    );

    print_scene(controller.scene());
    Ok(())
}

fn build_level(controller: &mut SceneController) -> Result<(), StateError> {
    let scene = controller.scene_mut();

    let ground = scene.create_entity("Ground");
    *scene.get_component_mut::<TransformComponent>(ground) =
        TransformComponent::from_translation(Vec3::new(0.0, -0.5, 0.0)).with_scale(Vec3::new(20.0, 1.0, 1.0));
    scene.add_component(ground, SpriteComponent::new(Vec4::new(0.3, 0.3, 0.3, 1.0)));
    scene.add_component(ground, Rigidbody2DComponent::new(RigidBodyType::Static));
    scene.add_component(ground, BoxCollider2DComponent::default());

    let player = scene.create_entity("Player");
    scene.get_component_mut::<TransformComponent>(player).translation = Vec3::new(0.0, 6.0, 0.0);
    scene.add_component(player, SpriteComponent::new(Vec4::new(0.9, 0.4, 0.1, 1.0)));
    scene.add_component(player, Rigidbody2DComponent::new(RigidBodyType::Dynamic).with_fixed_rotation(true));
    scene.add_component(player, BoxCollider2DComponent::default());

    let mut rng = thread_rng();
    for i in 0..BALL_COUNT {
        let ball = scene.create_entity(&format!("Ball {i}"));
        scene.get_component_mut::<TransformComponent>(ball).translation =
            Vec3::new(rng.gen_range(-6.0..6.0), rng.gen_range(3.0..9.0), 0.0);
        scene.add_component(
            ball,
            CircleComponent {
                color: Vec4::new(rng.gen(), rng.gen(), rng.gen(), 1.0),
                ..CircleComponent::default()
            },
        );
        scene.add_component(ball, Rigidbody2DComponent::new(RigidBodyType::Dynamic));
        scene.add_component(ball, CircleCollider2DComponent::default());
    }

    let camera = scene.create_entity("Camera");
    scene.add_component(camera, CameraComponent::default());

    controller.bind_script(player, "PlayerController")?;
    controller.bind_script(camera, "CameraController")?;
    let camera_uuid = controller.scene().uuid(camera);
    controller
        .scripts_mut()
        .set_field_value(camera_uuid, "follow_speed", ScriptFieldValue::Float(6.0))?;
    Ok(())
}

fn print_scene(scene: &Scene) {
    println!("Scene '{}' after stop ({} entities):", scene.name(), scene.entity_count());
    for entity in scene.entities() {
        let transform = scene.get_component::<TransformComponent>(entity);
        println!(
            "  {:<10} at ({:>6.2}, {:>6.2})",
            scene.tag(entity),
            transform.translation.x,
            transform.translation.y
        );
    }
}
