//! # Runtime Configuration
//!
//! Settings consumed by the scene state machine and its two bridges.
//!
//! ## Configuration Categories
//!
//! - **Physics**: gravity and solver iteration budget
//! - **Scripting**: where script modules live and when they are reloaded
//! - **Logging**: default log filter for the binary

use serde::{Serialize, Deserialize};
use std::path::PathBuf;

use super::Config;

/// # Physics Configuration
///
/// Parameters for the 2D physics world created when Play or Simulation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector in world units per second squared
    pub gravity: [f32; 2],
    /// Velocity solver iterations per step
    pub velocity_iterations: usize,
    /// Position (stabilization) iterations per step
    pub position_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.8],
            velocity_iterations: 6,
            position_iterations: 2,
        }
    }
}

impl PhysicsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(format!("Gravity must be finite, got {:?}", self.gravity));
        }
        if self.velocity_iterations == 0 || self.position_iterations == 0 {
            return Err("Solver iteration counts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// # Script Configuration
///
/// Location of script modules and reload behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Folder searched for `<ClassName>.rhai` modules
    pub scripts_folder: PathBuf,
    /// Reload every script bound in the scene right before entering Play
    pub reload_scripts_on_start: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            scripts_folder: PathBuf::from("assets/scripts"),
            reload_scripts_on_start: true,
        }
    }
}

impl ScriptConfig {
    /// Create a script configuration rooted at the given folder
    pub fn new(scripts_folder: impl Into<PathBuf>) -> Self {
        Self {
            scripts_folder: scripts_folder.into(),
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.scripts_folder.as_os_str().is_empty() {
            return Err("Scripts folder cannot be empty".to_string());
        }
        Ok(())
    }
}

/// # Runtime Configuration
///
/// Top-level configuration file for hosts embedding the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Default log filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Physics settings
    pub physics: PhysicsConfig,
    /// Scripting settings
    pub scripting: ScriptConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            physics: PhysicsConfig::default(),
            scripting: ScriptConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.log_level.as_str()) {
            return Err(format!("Unknown log level: {}", self.log_level));
        }
        self.physics.validate()?;
        self.scripting.validate()
    }
}

impl Config for RuntimeConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_defaults_are_valid() {
        let config = RuntimeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.physics.velocity_iterations, 6);
        assert_eq!(config.physics.position_iterations, 2);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.toml");

        let mut config = RuntimeConfig::default();
        config.physics.gravity = [0.0, -20.0];
        config.scripting.reload_scripts_on_start = false;
        config.save_to_file(&path).unwrap();

        let loaded = RuntimeConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.ron");
        std::fs::write(&path, "(log_level: \"debug\")").unwrap();

        let loaded = RuntimeConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(loaded.physics, PhysicsConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(matches!(
            RuntimeConfig::load_from_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invalid_iterations_rejected() {
        let mut config = RuntimeConfig::default();
        config.physics.velocity_iterations = 0;
        assert!(config.validate().is_err());
    }
}
