//! Engine settings, loadable from a JSON file.
//!
//! Every field has a default so a settings file only needs to spell out
//! what it overrides; a missing file is not an error for callers that fall
//! back to [`EngineSettings::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::GlSettings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which context acquisition backend to use.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// GL context bound to the native window surface.
    Native,
    /// Off-screen EGL device context, no window system required.
    Headless,
    /// Inert placeholder; every driver operation is a no-op.
    Stub,
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub window: WindowSettings,
    pub context: ContextSettings,
    /// `env_logger`-style filter, e.g. `"sill_engine=debug"`.
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    pub backend: BackendChoice,
    /// Requested core-profile GL version.
    pub gl_major: u8,
    pub gl_minor: u8,
    /// Compute device index for the headless backend.
    pub device_index: usize,
    pub vsync: bool,
    /// Request a debug context from the driver.
    pub debug: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "sill".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            backend: BackendChoice::Native,
            gl_major: 3,
            gl_minor: 3,
            device_index: 0,
            vsync: true,
            debug: false,
        }
    }
}

impl EngineSettings {
    /// Reads and parses a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Context creation parameters implied by these settings.
    pub fn gl(&self) -> GlSettings {
        GlSettings {
            version: (self.context.gl_major, self.context.gl_minor),
            debug: self.context.debug,
            vsync: self.context.vsync,
            device_index: self.context.device_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_defaults() {
        let s = EngineSettings::from_json("{}").unwrap();
        assert_eq!(s.window.title, "sill");
        assert_eq!((s.window.width, s.window.height), (1280, 720));
        assert_eq!(s.context.backend, BackendChoice::Native);
        assert_eq!((s.context.gl_major, s.context.gl_minor), (3, 3));
        assert!(s.context.vsync);
        assert_eq!(s.log_filter, None);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let s = EngineSettings::from_json(
            r#"{ "window": { "title": "demo", "width": 640 },
                 "context": { "backend": "headless", "device_index": 1 } }"#,
        )
        .unwrap();
        assert_eq!(s.window.title, "demo");
        assert_eq!(s.window.width, 640);
        assert_eq!(s.window.height, 720);
        assert_eq!(s.context.backend, BackendChoice::Headless);
        assert_eq!(s.context.device_index, 1);
        assert_eq!(s.context.gl_major, 3);
    }

    #[test]
    fn backend_names_are_lowercase() {
        let s = EngineSettings::from_json(r#"{ "context": { "backend": "stub" } }"#).unwrap();
        assert_eq!(s.context.backend, BackendChoice::Stub);
        EngineSettings::from_json(r#"{ "context": { "backend": "Native" } }"#).unwrap_err();
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = EngineSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn gl_settings_projection() {
        let s = EngineSettings::from_json(
            r#"{ "context": { "gl_major": 4, "gl_minor": 1, "vsync": false } }"#,
        )
        .unwrap();
        let gl = s.gl();
        assert_eq!(gl.version, (4, 1));
        assert!(!gl.vsync);
    }
}
