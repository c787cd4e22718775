//! User preferences that shape drawing behaviour.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shapes::{DEFAULT_BRUSH_WIDTH, DEFAULT_STROKE_WIDTH, Rgb, TextStyle};

/// Settings loading errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Drawing preferences. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Classify closed pen traces as circles, triangles and rectangles.
    pub shape_recognition: bool,
    /// Snap lines and arrows to the horizontal and vertical axes.
    pub line_snap: bool,
    pub stroke_width: f64,
    pub brush_width: f64,
    pub color: Rgb,
    pub text_style: TextStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shape_recognition: false,
            line_snap: false,
            stroke_width: DEFAULT_STROKE_WIDTH,
            brush_width: DEFAULT_BRUSH_WIDTH,
            color: Rgb::white(),
            text_style: TextStyle::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path`, falling back to defaults when the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring settings at {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Platform config location, e.g. `~/.config/drawly/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("drawly").join("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.shape_recognition);
        assert!(!settings.line_snap);
        assert!((settings.stroke_width - 3.0).abs() < f64::EPSILON);
        assert!((settings.brush_width - 6.0).abs() < f64::EPSILON);
        assert_eq!(settings.color, Rgb::white());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r##"{"lineSnap": true, "color": "#ff8800"}"##).unwrap();
        assert!(settings.line_snap);
        assert!(!settings.shape_recognition);
        assert_eq!(settings.color, Rgb::new(0xff, 0x88, 0x00));
        assert!((settings.text_style.size - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Settings::from_json("{"), Err(SettingsError::Parse(_))));
        assert!(matches!(Settings::from_json(r#"{"color": "red"}"#), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings { shape_recognition: true, ..Settings::default() };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_or_default_on_bad_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
