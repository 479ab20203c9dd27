//! Editor configuration
//!
//! All sections default to the values the editor ships with, so a TOML file only needs
//! to list what it overrides:
//!
//! ```toml
//! [camera]
//! frustum_size = 80.0
//!
//! [snap]
//! translation = 0.5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub snap: SnapIncrements,
    /// Background RGBA
    pub clear_color: [f32; 4],
    /// Objects placed on the ground plane at startup
    pub objects: Vec<ObjectSeed>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            snap: SnapIncrements::default(),
            clear_color: [1.0, 1.0, 1.0, 1.0],
            objects: default_seed(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Plane Editor".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// Orthographic camera rig and pan/zoom control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical extent of the view volume in world units
    pub frustum_size: f32,
    /// Height of the camera above the origin
    pub height: f32,
    pub near: f32,
    pub far: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            frustum_size: 60.0,
            height: 200.0,
            near: -1000.0,
            far: 1000.0,
            zoom_speed: 1.2,
            pan_speed: 1.0,
            min_zoom: 0.1,
            max_zoom: 20.0,
        }
    }
}

/// Increments applied by the transform handle while snapping is enabled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapIncrements {
    /// World units
    pub translation: f32,
    /// Radians
    pub rotation: f32,
    pub scale: f32,
}

impl Default for SnapIncrements {
    fn default() -> Self {
        Self {
            translation: 1.0,
            rotation: std::f32::consts::PI / 8.0,
            scale: 0.25,
        }
    }
}

/// Ground-plane position and `#rrggbb` color of a startup object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSeed {
    pub x: f32,
    pub z: f32,
    pub color: String,
}

impl ObjectSeed {
    pub fn new(x: f32, z: f32, color: &str) -> Self {
        Self {
            x,
            z,
            color: color.to_string(),
        }
    }
}

fn default_seed() -> Vec<ObjectSeed> {
    vec![
        ObjectSeed::new(0.0, 0.0, "#2563eb"),
        ObjectSeed::new(10.0, 0.0, "#60a5fa"),
        ObjectSeed::new(20.0, 0.0, "#bfdbfe"),
        ObjectSeed::new(0.0, 10.0, "#4f46e5"),
        ObjectSeed::new(10.0, 10.0, "#818cf8"),
        ObjectSeed::new(20.0, 10.0, "#c7d2fe"),
        ObjectSeed::new(0.0, 20.0, "#7c3aed"),
        ObjectSeed::new(10.0, 20.0, "#a78bfa"),
        ObjectSeed::new(20.0, 20.0, "#ddd6fe"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = EditorConfig::from_toml_str(
            r#"
            [camera]
            frustum_size = 80.0

            [snap]
            translation = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.frustum_size, 80.0);
        assert_eq!(config.camera.height, 200.0);
        assert_eq!(config.snap.translation, 0.5);
        assert_eq!(config.snap.scale, 0.25);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.objects.len(), 9);
    }

    #[test]
    fn test_objects_override_seed() {
        let config = EditorConfig::from_toml_str(
            r##"
            [[objects]]
            x = 5.0
            z = -5.0
            color = "#ff0000"
            "##,
        )
        .unwrap();

        assert_eq!(config.objects, vec![ObjectSeed::new(5.0, -5.0, "#ff0000")]);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = EditorConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(EditorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EditorConfig::load("does/not/exist/editor.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let err = EditorConfig::from_toml_str("[camera\nfrustum_size = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
