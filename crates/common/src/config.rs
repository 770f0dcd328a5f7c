//! Demo configuration: every construction parameter of the world, the viewer
//! and the render loop.
//!
//! Loaded from YAML, or JSON when the file ends in `.json`. Missing fields take
//! their defaults, so an empty file is a valid configuration.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// World dimensions and population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub object_count: usize,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 5000,
            height: 5000,
            depth: 5000,
            object_count: 10_000,
            seed: 42,
        }
    }
}

/// Viewer start position, frustum and scale factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub start: IVec3,
    pub frustum_width: i32,
    pub frustum_height: i32,
    pub frustum_depth: i32,
    /// Base-size-to-pixel multiplier.
    pub size_scale: f32,
    /// Depth at which rendered size falls to zero.
    pub distance_scale: f32,
    /// Depth at which screen offsets converge on the viewport centre.
    pub infinity: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            start: IVec3::new(500, 500, 0),
            frustum_width: 600,
            frustum_height: 600,
            frustum_depth: 250,
            size_scale: 4.0,
            distance_scale: 400.0,
            infinity: 1000.0,
        }
    }
}

/// Movement step sizes and timer intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Units moved per frame while a movement key is held.
    pub step: i32,
    /// Units moved forward per drift tick.
    pub drift_step: i32,
    pub auto_drift: bool,
    pub drift_interval_ms: u64,
    pub status_interval_ms: u64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            step: 2,
            drift_step: 1,
            auto_drift: true,
            drift_interval_ms: 5,
            status_interval_ms: 500,
        }
    }
}

/// Window and frame-rate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub title: String,
    pub icon: Option<PathBuf>,
    pub sprite_sheet: Option<PathBuf>,
    /// Edge length of one square sprite-sheet cell, in pixels.
    pub sprite_cell: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            frame_rate: 50,
            title: "3D Space".into(),
            icon: None,
            sprite_sheet: None,
            sprite_cell: 32,
        }
    }
}

/// Top-level demo configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub world: WorldConfig,
    pub view: ViewConfig,
    pub movement: MovementConfig,
    pub display: DisplayConfig,
}

impl DemoConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document; treat it as all defaults.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the render loop cannot run with.
    ///
    /// Negative world or frustum extents are allowed: they only produce an
    /// empty world or an empty view.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.frame_rate == 0 {
            return Err(ConfigError::Invalid("display.frame_rate must be positive".into()));
        }
        if d.width == 0 || d.height == 0 {
            return Err(ConfigError::Invalid("display size must be non-zero".into()));
        }
        if d.sprite_cell == 0 {
            return Err(ConfigError::Invalid("display.sprite_cell must be non-zero".into()));
        }
        let v = &self.view;
        if v.distance_scale.is_nan() || v.distance_scale <= 0.0 {
            return Err(ConfigError::Invalid("view.distance_scale must be positive".into()));
        }
        if v.infinity.is_nan() || v.infinity <= 0.0 {
            return Err(ConfigError::Invalid("view.infinity must be positive".into()));
        }
        let m = &self.movement;
        if m.drift_interval_ms == 0 || m.status_interval_ms == 0 {
            return Err(ConfigError::Invalid("timer intervals must be non-zero".into()));
        }
        Ok(())
    }
}
