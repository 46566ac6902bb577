//! Script API registration
//!
//! Registers the vector value types and the `World` context type with the
//! interpreter. Vectors are nalgebra values; scripts build them with
//! `vec2(x, y)`, `vec3(x, y, z)` and `vec4(x, y, z, w)`.

use rhai::{Engine, FLOAT};

use super::ScriptContext;
use crate::foundation::math::{Vec2, Vec3, Vec4};

/// Arithmetic shared by every vector type
macro_rules! register_vector_ops {
    ($engine:expr, $($ty:ty),+) => {
        $(
            $engine
                .register_fn("+", |a: $ty, b: $ty| a + b)
                .register_fn("-", |a: $ty, b: $ty| a - b)
                .register_fn("-", |a: $ty| -a)
                .register_fn("*", |a: $ty, s: FLOAT| a * s)
                .register_fn("*", |s: FLOAT, a: $ty| a * s)
                .register_fn("/", |a: $ty, s: FLOAT| a / s)
                .register_fn("==", |a: $ty, b: $ty| a == b)
                .register_fn("!=", |a: $ty, b: $ty| a != b)
                .register_fn("length", |v: &mut $ty| v.norm())
                .register_fn("dot", |a: &mut $ty, b: $ty| a.dot(&b))
                .register_fn("normalize", |v: &mut $ty| {
                    if v.norm() > 0.0 { v.normalize() } else { *v }
                });
        )+
    };
}

/// Register every runtime type and function
pub(crate) fn register_api(engine: &mut Engine) {
    register_vector2(engine);
    register_vector3(engine);
    register_vector4(engine);
    register_vector_ops!(engine, Vec2, Vec3, Vec4);
    register_world(engine);

    engine.on_print(|text| log::info!("[script] {text}"));
    engine.on_debug(|text, source, pos| {
        log::debug!("[script] {}{pos:?}: {text}", source.unwrap_or(""));
    });
}

fn register_vector2(engine: &mut Engine) {
    engine
        .register_type_with_name::<Vec2>("Vector2")
        .register_fn("vec2", |x: FLOAT, y: FLOAT| Vec2::new(x, y))
        .register_get_set("x", |v: &mut Vec2| v.x, |v: &mut Vec2, value: FLOAT| v.x = value)
        .register_get_set("y", |v: &mut Vec2| v.y, |v: &mut Vec2, value: FLOAT| v.y = value)
        .register_fn("to_string", |v: &mut Vec2| format!("({}, {})", v.x, v.y))
        .register_fn("to_debug", |v: &mut Vec2| format!("vec2({}, {})", v.x, v.y));
}

fn register_vector3(engine: &mut Engine) {
    engine
        .register_type_with_name::<Vec3>("Vector3")
        .register_fn("vec3", |x: FLOAT, y: FLOAT, z: FLOAT| Vec3::new(x, y, z))
        .register_get_set("x", |v: &mut Vec3| v.x, |v: &mut Vec3, value: FLOAT| v.x = value)
        .register_get_set("y", |v: &mut Vec3| v.y, |v: &mut Vec3, value: FLOAT| v.y = value)
        .register_get_set("z", |v: &mut Vec3| v.z, |v: &mut Vec3, value: FLOAT| v.z = value)
        .register_fn("to_string", |v: &mut Vec3| format!("({}, {}, {})", v.x, v.y, v.z))
        .register_fn("to_debug", |v: &mut Vec3| format!("vec3({}, {}, {})", v.x, v.y, v.z));
}

fn register_vector4(engine: &mut Engine) {
    engine
        .register_type_with_name::<Vec4>("Vector4")
        .register_fn("vec4", |x: FLOAT, y: FLOAT, z: FLOAT, w: FLOAT| Vec4::new(x, y, z, w))
        .register_get_set("x", |v: &mut Vec4| v.x, |v: &mut Vec4, value: FLOAT| v.x = value)
        .register_get_set("y", |v: &mut Vec4| v.y, |v: &mut Vec4, value: FLOAT| v.y = value)
        .register_get_set("z", |v: &mut Vec4| v.z, |v: &mut Vec4, value: FLOAT| v.z = value)
        .register_get_set("w", |v: &mut Vec4| v.w, |v: &mut Vec4, value: FLOAT| v.w = value)
        .register_fn("to_string", |v: &mut Vec4| format!("({}, {}, {}, {})", v.x, v.y, v.z, v.w))
        .register_fn("to_debug", |v: &mut Vec4| format!("vec4({}, {}, {}, {})", v.x, v.y, v.z, v.w));
}

fn register_world(engine: &mut Engine) {
    engine
        .register_type_with_name::<ScriptContext>("World")
        .register_fn("find_entity_by_name", ScriptContext::find_entity_by_name)
        .register_fn("entity_name", ScriptContext::entity_name)
        .register_fn("translation", ScriptContext::translation)
        .register_fn("set_translation", ScriptContext::set_translation)
        .register_fn("rotation", ScriptContext::rotation)
        .register_fn("set_rotation", ScriptContext::set_rotation)
        .register_fn("scale", ScriptContext::scale)
        .register_fn("set_scale", ScriptContext::set_scale)
        .register_fn("has_rigidbody", ScriptContext::has_rigidbody)
        .register_fn("linear_velocity", ScriptContext::linear_velocity)
        .register_fn("apply_linear_impulse", ScriptContext::apply_linear_impulse)
        .register_fn("apply_linear_impulse_to_center", ScriptContext::apply_linear_impulse_to_center)
        .register_fn("request_stop", ScriptContext::request_stop)
        .register_fn("log_info", |_: &mut ScriptContext, text: &str| log::info!("[script] {text}"))
        .register_fn("log_warn", |_: &mut ScriptContext, text: &str| log::warn!("[script] {text}"))
        .register_fn("log_error", |_: &mut ScriptContext, text: &str| log::error!("[script] {text}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> Engine {
        let mut engine = Engine::new();
        register_api(&mut engine);
        engine
    }

    #[test]
    fn test_vector_arithmetic() {
        let v: Vec3 = engine()
            .eval("let a = vec3(1.0, 2.0, 3.0); let b = vec3(1.0, 1.0, 1.0); (a - b) * 2.0")
            .unwrap();
        assert_relative_eq!(v, Vec3::new(0.0, 2.0, 4.0));
    }

    #[test]
    fn test_vector_properties() {
        let y: FLOAT = engine().eval("let v = vec2(3.0, 4.0); v.y = 8.0; v.y").unwrap();
        assert_relative_eq!(y, 8.0);

        let len: FLOAT = engine().eval("vec2(3.0, 4.0).length()").unwrap();
        assert_relative_eq!(len, 5.0);
    }
}
