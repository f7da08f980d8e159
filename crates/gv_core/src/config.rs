use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::camera::CameraSettings;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub projection: ProjectionSettings,
    pub frame_loop: FrameLoopSettings,
    pub assets: AssetSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Glimpse Viewer".to_string(),
            width: 512,
            height: 512,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ProjectionSettings {
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RedrawPolicy {
    /// Render only when input arrived or the camera moved.
    #[default]
    OnChange,
    /// Render every tick.
    Continuous,
}

impl RedrawPolicy {
    pub fn toggled(self) -> Self {
        match self {
            Self::OnChange => Self::Continuous,
            Self::Continuous => Self::OnChange,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FrameLoopSettings {
    pub wait_timeout_ms: u64,
    pub max_delta_seconds: f32,
    pub redraw: RedrawPolicy,
}

impl Default for FrameLoopSettings {
    fn default() -> Self {
        Self {
            wait_timeout_ms: 20,
            max_delta_seconds: 0.25,
            redraw: RedrawPolicy::OnChange,
        }
    }
}

impl FrameLoopSettings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AssetSettings {
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub texture: PathBuf,
    pub hot_reload: bool,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            vertex_shader: PathBuf::from("assets/shaders/scene.vert.wgsl"),
            fragment_shader: PathBuf::from("assets/shaders/scene.frag.wgsl"),
            texture: PathBuf::from("assets/textures/container.png"),
            hot_reload: true,
        }
    }
}

pub fn parse_config(raw: &str) -> Result<ViewerConfig, String> {
    let config: ViewerConfig =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse viewer config JSON: {e}"))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_config_from_path(path: &Path) -> Result<ViewerConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read viewer config {}: {e}", path.display()))?;
    parse_config(&raw).map_err(|e| format!("{}: {e}", path.display()))
}

/// Missing file means defaults; a present but broken file is an error.
pub fn load_config_or_default(path: &Path) -> Result<ViewerConfig, String> {
    if !path.exists() {
        log::info!(
            "Viewer config '{}' not found, using defaults",
            path.display()
        );
        return Ok(ViewerConfig::default());
    }
    load_config_from_path(path)
}

pub fn validate_config(config: &ViewerConfig) -> Result<(), String> {
    if config.window.width == 0 || config.window.height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} must be non-zero",
            config.window.width, config.window.height
        ));
    }

    let camera = &config.camera;
    if !(camera.movement_speed > 0.0) {
        return Err("Config validation failed: camera.movement_speed must be > 0".to_string());
    }
    if !(camera.mouse_sensitivity > 0.0) {
        return Err("Config validation failed: camera.mouse_sensitivity must be > 0".to_string());
    }
    if !(camera.min_zoom > 0.0) || camera.min_zoom > camera.max_zoom {
        return Err(format!(
            "Config validation failed: zoom range [{}, {}] is invalid",
            camera.min_zoom, camera.max_zoom
        ));
    }
    if !(camera.pitch_limit > 0.0 && camera.pitch_limit < 90.0) {
        return Err(format!(
            "Config validation failed: camera.pitch_limit {} must be inside (0, 90)",
            camera.pitch_limit
        ));
    }

    let projection = &config.projection;
    if !(projection.near > 0.0) || projection.near >= projection.far {
        return Err(format!(
            "Config validation failed: projection near {} / far {} are invalid",
            projection.near, projection.far
        ));
    }

    if !(config.frame_loop.max_delta_seconds > 0.0) {
        return Err("Config validation failed: frame_loop.max_delta_seconds must be > 0".to_string());
    }

    Ok(())
}
