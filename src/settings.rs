//! Runtime settings
//!
//! Defaults reproduce the built-in constants. A JSON file may override any
//! subset of fields; missing fields fall back to their defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Physics world parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
    /// Fixed step, independent of measured frame time
    pub timestep: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::from_array(GRAVITY),
            timestep: SIM_DT,
            velocity_iterations: VELOCITY_ITERATIONS,
            position_iterations: POSITION_ITERATIONS,
        }
    }
}

/// Frame pacing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    pub target_fps: f64,
    /// Stop after this many frames (headless runs)
    pub frame_limit: Option<u64>,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            frame_limit: None,
        }
    }
}

/// Character spawning on pointer press
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            min_size: 10.0,
            max_size: 800.0,
        }
    }
}

impl SpawnSettings {
    /// Size of a character spawned by a press at screen-space `y`
    pub fn size_for_screen_y(&self, y: f32) -> f32 {
        y.clamp(self.min_size, self.max_size)
    }
}

/// Starting scene layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Ground edge half-length, centered on the origin at y = 0
    pub ground_half_length: f32,
    /// Size of the starter character (0 disables it)
    pub starter_size: f32,
    pub starter_position: Vec2,
    /// Number of domino pieces lined up right of the starter
    pub dominoes: u32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            ground_half_length: 40.0,
            starter_size: 500.0,
            starter_position: Vec2::new(-30.0, 11.25),
            dominoes: 60,
        }
    }
}

/// Viewport used to map screen coordinates into the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub center: Vec2,
    pub zoom: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.0, 20.0),
            zoom: 1.0,
            width: 1280,
            height: 800,
        }
    }
}

/// All runtime settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    pub pacing: PacingSettings,
    pub spawn: SpawnSettings,
    pub scene: SceneSettings,
    pub camera: CameraSettings,
    /// Seed for the headless input script
    pub seed: u64,
}

impl Settings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| SimError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject values the frame loop cannot run with
    pub fn validate(&self) -> SimResult<()> {
        let physics = &self.physics;
        if !physics.gravity.is_finite() {
            return Err(SimError::invalid("physics.gravity", "must be finite"));
        }
        if !(physics.timestep.is_finite() && physics.timestep > 0.0) {
            return Err(SimError::invalid("physics.timestep", "must be positive"));
        }
        if physics.velocity_iterations == 0 {
            return Err(SimError::invalid(
                "physics.velocity_iterations",
                "must be at least 1",
            ));
        }
        if physics.position_iterations == 0 {
            return Err(SimError::invalid(
                "physics.position_iterations",
                "must be at least 1",
            ));
        }
        if !(self.pacing.target_fps.is_finite() && self.pacing.target_fps > 0.0) {
            return Err(SimError::invalid("pacing.target_fps", "must be positive"));
        }
        let spawn = &self.spawn;
        if !(spawn.min_size > 0.0 && spawn.min_size <= spawn.max_size) {
            return Err(SimError::invalid(
                "spawn",
                format!(
                    "needs 0 < min_size <= max_size, got {}..{}",
                    spawn.min_size, spawn.max_size
                ),
            ));
        }
        if self.scene.starter_size < 0.0 {
            return Err(SimError::invalid("scene.starter_size", "must not be negative"));
        }
        if self.camera.width == 0 || self.camera.height == 0 || self.camera.zoom <= 0.0 {
            return Err(SimError::invalid("camera", "viewport must be non-empty"));
        }
        Ok(())
    }
}
