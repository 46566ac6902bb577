//! Script classes
//!
//! A class is one `.rhai` module. Its top-level variables are the class
//! fields; `fn on_create(world)` and `fn on_update(world, ts)` are its
//! lifecycle hooks. Variables starting with `_` and function pointers are
//! private and never reflected.

use std::path::{Path, PathBuf};

use rhai::{Engine, FnPtr, Scope, AST};

use super::{ScriptError, ScriptField, ScriptFieldMap, ScriptFieldStorage, ScriptFieldValue};

/// Name of the creation hook
pub const ON_CREATE: &str = "on_create";

/// Name of the per-frame hook
pub const ON_UPDATE: &str = "on_update";

/// A compiled and reflected script class
pub struct ScriptClass {
    name: String,
    path: PathBuf,
    ast: AST,
    fields: Vec<ScriptField>,
    has_on_create: bool,
    has_on_update: bool,
}

impl ScriptClass {
    /// Compile `<folder>/<name>.rhai` and reflect its fields
    pub fn load(engine: &Engine, name: &str, folder: &Path) -> Result<Self, ScriptError> {
        let path = folder.join(format!("{name}.rhai"));
        if !path.is_file() {
            return Err(ScriptError::ModuleNotFound(path.display().to_string()));
        }

        let source = std::fs::read_to_string(&path)?;
        let ast = engine.compile(&source).map_err(|e| ScriptError::Compile {
            class: name.to_string(),
            message: e.to_string(),
        })?;

        let fields = reflect_fields(engine, name, &ast)?;
        let has_on_create = has_hook(&ast, ON_CREATE, 1);
        let has_on_update = has_hook(&ast, ON_UPDATE, 2);

        log::debug!(
            "Reflected script class '{}': {} fields, on_create: {}, on_update: {}",
            name,
            fields.len(),
            has_on_create,
            has_on_update
        );

        Ok(Self {
            name: name.to_string(),
            path,
            ast,
            fields,
            has_on_create,
            has_on_update,
        })
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reflected fields in declaration order
    pub fn fields(&self) -> &[ScriptField] {
        &self.fields
    }

    /// Reflected field by name
    pub fn field(&self, name: &str) -> Option<&ScriptField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether the class defines `on_create(world)`
    pub fn has_on_create(&self) -> bool {
        self.has_on_create
    }

    /// Whether the class defines `on_update(world, ts)`
    pub fn has_on_update(&self) -> bool {
        self.has_on_update
    }

    /// Field map holding every class default
    pub fn default_field_map(&self) -> ScriptFieldMap {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.default))
            .collect()
    }

    /// Bring an existing field map in line with this class
    ///
    /// Values of fields that still exist with the same kind are kept; fields
    /// that disappeared or changed kind are dropped; new fields get defaults.
    pub fn migrate_field_map(&self, map: &mut ScriptFieldMap) {
        map.retain(|name, storage| {
            self.field(name)
                .is_some_and(|field| field.ty == storage.field_type())
        });
        for field in &self.fields {
            map.entry(field.name.clone()).or_insert(field.default);
        }
    }

    pub(crate) fn ast(&self) -> &AST {
        &self.ast
    }
}

fn reflect_fields(engine: &Engine, class: &str, ast: &AST) -> Result<Vec<ScriptField>, ScriptError> {
    let mut scope = Scope::new();
    engine
        .run_ast_with_scope(&mut scope, ast)
        .map_err(|e| ScriptError::Evaluate {
            class: class.to_string(),
            message: e.to_string(),
        })?;

    let mut fields: Vec<ScriptField> = Vec::new();
    for (name, _, value) in scope.iter() {
        if name.starts_with('_') || value.is::<FnPtr>() {
            continue;
        }

        let Some(default) = ScriptFieldValue::from_dynamic(&value) else {
            log::warn!(
                "Unknown field type: {} ({}), class - {}",
                name,
                value.type_name(),
                class
            );
            continue;
        };

        let field = ScriptField {
            name: name.to_string(),
            ty: default.field_type(),
            default: ScriptFieldStorage::new(default),
        };

        // A shadowed variable keeps its last value
        match fields.iter_mut().find(|existing| existing.name == field.name) {
            Some(existing) => *existing = field,
            None => fields.push(field),
        }
    }

    Ok(fields)
}

fn has_hook(ast: &AST, name: &str, arity: usize) -> bool {
    ast.iter_functions()
        .any(|f| f.name == name && f.params.len() == arity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scripting::api::register_api;
    use crate::scripting::ScriptFieldType;

    fn engine() -> Engine {
        let mut engine = Engine::new();
        register_api(&mut engine);
        engine
    }

    fn write_class(dir: &Path, name: &str, source: &str) {
        std::fs::write(dir.join(format!("{name}.rhai")), source).unwrap();
    }

    #[test]
    fn test_reflects_public_supported_fields() {
        let dir = tempfile::tempdir().unwrap();
        write_class(
            dir.path(),
            "Player",
            r#"
                let speed = 2.5;
                let lives = 3;
                let grounded = false;
                let spawn_point = vec3(1.0, 2.0, 0.0);
                let _hidden = 10;
                let label = "text";
                let callback = Fn("on_create");

                fn on_create(world) {}
                fn on_update(world, ts) {}
            "#,
        );

        let class = ScriptClass::load(&engine(), "Player", dir.path()).unwrap();
        let names: Vec<_> = class.fields().iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names, vec!["speed", "lives", "grounded", "spawn_point"]);
        assert_eq!(class.field("speed").unwrap().ty, ScriptFieldType::Float);
        assert_eq!(class.field("lives").unwrap().default.value(), ScriptFieldValue::Int(3));
        assert_eq!(
            class.field("spawn_point").unwrap().default.value(),
            ScriptFieldValue::Vector3(Vec3::new(1.0, 2.0, 0.0))
        );
        assert!(class.has_on_create());
        assert!(class.has_on_update());
    }

    #[test]
    fn test_missing_module() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ScriptClass::load(&engine(), "Ghost", dir.path()),
            Err(ScriptError::ModuleNotFound(_))
        ));
    }

    #[test]
    fn test_compile_error() {
        let dir = tempfile::tempdir().unwrap();
        write_class(dir.path(), "Broken", "let x = ;");
        assert!(matches!(
            ScriptClass::load(&engine(), "Broken", dir.path()),
            Err(ScriptError::Compile { .. })
        ));
    }

    #[test]
    fn test_migrate_keeps_matching_values() {
        let dir = tempfile::tempdir().unwrap();
        write_class(dir.path(), "Mover", "let speed = 1.0; let kept = 1;");
        let old = ScriptClass::load(&engine(), "Mover", dir.path()).unwrap();
        let mut map = old.default_field_map();
        map.get_mut("speed").unwrap().set(ScriptFieldValue::Float(9.0));
        map.get_mut("kept").unwrap().set(ScriptFieldValue::Int(7));

        write_class(dir.path(), "Mover", "let speed = true; let kept = 1; let added = vec2(1.0, 1.0);");
        let new = ScriptClass::load(&engine(), "Mover", dir.path()).unwrap();
        new.migrate_field_map(&mut map);

        assert_eq!(map["kept"].value(), ScriptFieldValue::Int(7));
        assert_eq!(map["speed"].value(), ScriptFieldValue::Bool(true));
        assert_eq!(map["added"].field_type(), ScriptFieldType::Vector2);
        assert_eq!(map.len(), 3);
    }
}
