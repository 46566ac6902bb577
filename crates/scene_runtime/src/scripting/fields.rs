//! Script field reflection types
//!
//! A script class exposes a closed set of field kinds. Values are kept in a
//! fixed 16-byte buffer tagged with their kind, so editor-side storage never
//! holds interpreter objects.

use std::collections::BTreeMap;
use std::fmt;
use std::mem::size_of;

use bytemuck::Pod;
use rhai::{Dynamic, FLOAT, INT};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3, Vec4};

/// Supported field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptFieldType {
    /// 64-bit signed integer
    Int,
    /// 32-bit float
    Float,
    /// Boolean
    Bool,
    /// Two-component vector
    Vector2,
    /// Three-component vector
    Vector3,
    /// Four-component vector
    Vector4,
}

impl ScriptFieldType {
    /// Script-side type name
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Vector4 => "Vector4",
        }
    }
}

impl fmt::Display for ScriptFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptFieldValue {
    /// Integer value
    Int(INT),
    /// Float value
    Float(FLOAT),
    /// Boolean value
    Bool(bool),
    /// Vector2 value
    Vector2(Vec2),
    /// Vector3 value
    Vector3(Vec3),
    /// Vector4 value
    Vector4(Vec4),
}

impl ScriptFieldValue {
    /// Kind of this value
    pub fn field_type(&self) -> ScriptFieldType {
        match self {
            Self::Int(_) => ScriptFieldType::Int,
            Self::Float(_) => ScriptFieldType::Float,
            Self::Bool(_) => ScriptFieldType::Bool,
            Self::Vector2(_) => ScriptFieldType::Vector2,
            Self::Vector3(_) => ScriptFieldType::Vector3,
            Self::Vector4(_) => ScriptFieldType::Vector4,
        }
    }

    /// Convert an interpreter value, if its kind is supported
    pub fn from_dynamic(value: &Dynamic) -> Option<Self> {
        if let Ok(v) = value.as_int() {
            Some(Self::Int(v))
        } else if let Ok(v) = value.as_float() {
            Some(Self::Float(v))
        } else if let Ok(v) = value.as_bool() {
            Some(Self::Bool(v))
        } else if value.is::<Vec2>() {
            Some(Self::Vector2(value.clone_cast()))
        } else if value.is::<Vec3>() {
            Some(Self::Vector3(value.clone_cast()))
        } else if value.is::<Vec4>() {
            Some(Self::Vector4(value.clone_cast()))
        } else {
            None
        }
    }

    /// Convert to an interpreter value
    pub fn to_dynamic(self) -> Dynamic {
        match self {
            Self::Int(v) => Dynamic::from_int(v),
            Self::Float(v) => Dynamic::from_float(v),
            Self::Bool(v) => Dynamic::from_bool(v),
            Self::Vector2(v) => Dynamic::from(v),
            Self::Vector3(v) => Dynamic::from(v),
            Self::Vector4(v) => Dynamic::from(v),
        }
    }
}

/// Fixed-size tagged storage for one field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptFieldStorage {
    ty: ScriptFieldType,
    buffer: [u8; 16],
}

impl ScriptFieldStorage {
    /// Store a value
    pub fn new(value: ScriptFieldValue) -> Self {
        let mut storage = Self {
            ty: value.field_type(),
            buffer: [0; 16],
        };
        storage.write(value);
        storage
    }

    /// Kind of the stored value
    pub fn field_type(&self) -> ScriptFieldType {
        self.ty
    }

    /// Raw bytes
    pub fn buffer(&self) -> &[u8; 16] {
        &self.buffer
    }

    /// Decode the stored value
    pub fn value(&self) -> ScriptFieldValue {
        match self.ty {
            ScriptFieldType::Int => ScriptFieldValue::Int(read(&self.buffer)),
            ScriptFieldType::Float => ScriptFieldValue::Float(read(&self.buffer)),
            ScriptFieldType::Bool => ScriptFieldValue::Bool(read::<u8>(&self.buffer) != 0),
            ScriptFieldType::Vector2 => ScriptFieldValue::Vector2(read::<[f32; 2]>(&self.buffer).into()),
            ScriptFieldType::Vector3 => ScriptFieldValue::Vector3(read::<[f32; 3]>(&self.buffer).into()),
            ScriptFieldType::Vector4 => ScriptFieldValue::Vector4(read::<[f32; 4]>(&self.buffer).into()),
        }
    }

    /// Overwrite the stored value; rejected when the kind differs
    pub fn set(&mut self, value: ScriptFieldValue) -> bool {
        if value.field_type() != self.ty {
            return false;
        }
        self.write(value);
        true
    }

    fn write(&mut self, value: ScriptFieldValue) {
        self.buffer = [0; 16];
        match value {
            ScriptFieldValue::Int(v) => write(&mut self.buffer, v),
            ScriptFieldValue::Float(v) => write(&mut self.buffer, v),
            ScriptFieldValue::Bool(v) => write(&mut self.buffer, u8::from(v)),
            ScriptFieldValue::Vector2(v) => write(&mut self.buffer, [v.x, v.y]),
            ScriptFieldValue::Vector3(v) => write(&mut self.buffer, [v.x, v.y, v.z]),
            ScriptFieldValue::Vector4(v) => write(&mut self.buffer, [v.x, v.y, v.z, v.w]),
        }
    }
}

fn write<T: Pod>(buffer: &mut [u8; 16], value: T) {
    let bytes = bytemuck::bytes_of(&value);
    buffer[..bytes.len()].copy_from_slice(bytes);
}

fn read<T: Pod>(buffer: &[u8; 16]) -> T {
    bytemuck::pod_read_unaligned(&buffer[..size_of::<T>()])
}

/// A reflected field of a script class
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptField {
    /// Field name
    pub name: String,
    /// Field kind
    pub ty: ScriptFieldType,
    /// Class-declared default value
    pub default: ScriptFieldStorage,
}

/// Per-entity field values, keyed by field name
pub type ScriptFieldMap = BTreeMap<String, ScriptFieldStorage>;
