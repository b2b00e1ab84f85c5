use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::controllers::cue::CueConfig;
use crate::core::material::{ContactPairing, Material};
use crate::core::physics::is_positive;
use crate::error::ConfigError;
use crate::objects::ball::BallConfig;
use crate::objects::table::TableConfig;
use crate::objects::wall::{check_walls_face_inward, WallConfig};
use crate::renderer::camera::PerspectiveCamera;

/// Initial camera placement. The aspect comes from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = PerspectiveCamera::default();
        Self {
            eye: camera.eye.to_array(),
            target: camera.target.to_array(),
            fov_y_degrees: camera.fov_y.to_degrees(),
            near: camera.near,
            far: camera.far,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self, aspect: f32) -> PerspectiveCamera {
        PerspectiveCamera {
            eye: Vec3::from(self.eye),
            target: Vec3::from(self.target),
            fov_y: self.fov_y_degrees.to_radians(),
            aspect,
            near: self.near,
            far: self.far,
            ..PerspectiveCamera::default()
        }
    }
}

/// Everything needed to assemble a room. Loaded from JSON at runtime;
/// missing fields take the defaults of the standard room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub gravity: [f32; 3],
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_time_step: f32,
    /// Cap on physics steps per frame (default: 3).
    pub max_sub_steps: u32,
    pub table: TableConfig,
    pub walls: Vec<WallConfig>,
    pub balls: Vec<BallConfig>,
    pub cue: CueConfig,
    pub pairings: Vec<ContactPairing>,
    /// Full width of the random x/z offset applied to each ball at spawn.
    pub jitter: f32,
    pub seed: u64,
    pub camera: CameraConfig,
    /// Viewport size in pixels (width, height).
    pub viewport: [f32; 2],
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            fixed_time_step: 1.0 / 60.0,
            max_sub_steps: 3,
            table: TableConfig::default(),
            walls: vec![
                WallConfig::new(Vec3::new(0.0, 12.5, -25.0), 0.0),
                WallConfig::new(Vec3::new(0.0, 12.5, 25.0), PI),
                WallConfig::new(Vec3::new(-25.0, 12.5, 0.0), FRAC_PI_2),
                WallConfig::new(Vec3::new(25.0, 12.5, 0.0), -FRAC_PI_2),
            ],
            balls: vec![
                BallConfig::new("White", Vec3::new(0.0, 5.5, 0.0), 0xffffff),
                BallConfig::new("Blue", Vec3::new(-2.0, 5.5, -1.0), 0x4169e1),
                BallConfig::new("Green", Vec3::new(2.0, 5.5, -1.0), 0x3cb371),
                BallConfig::new("Yellow", Vec3::new(0.0, 5.5, -2.0), 0xffd700),
                BallConfig::new("Red", Vec3::new(4.0, 5.5, 0.0), 0xff0000),
                BallConfig::new("Brown", Vec3::new(-4.0, 5.5, 1.0), 0x8b4513),
            ],
            cue: CueConfig::default(),
            pairings: vec![
                ContactPairing::new(Material::Ball, Material::Ball, 0.1, 0.9),
                ContactPairing::new(Material::Ball, Material::Table, 0.3, 0.6),
            ],
            jitter: 0.01,
            seed: 42,
            camera: CameraConfig::default(),
            viewport: [1280.0, 720.0],
        }
    }
}

impl RoomConfig {
    /// Parse a config from a JSON string. Does not validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject anything the room cannot be built from. Never clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_time_step.is_finite() && self.fixed_time_step > 0.0) {
            return Err(ConfigError::InvalidTimestep(self.fixed_time_step));
        }
        if self.max_sub_steps == 0 {
            return Err(ConfigError::ZeroSubSteps);
        }
        if let Some(&value) = self.gravity.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::NonFinite {
                field: "gravity",
                value,
            });
        }
        if !(self.jitter.is_finite() && self.jitter >= 0.0) {
            return Err(ConfigError::InvalidJitter(self.jitter));
        }
        let [width, height] = self.viewport;
        if !(is_positive(width) && is_positive(height)) {
            return Err(ConfigError::InvalidViewport(width, height));
        }
        self.cue.validate()?;
        self.table.validate()?;
        check_walls_face_inward(&self.walls)?;

        let mut names = HashSet::new();
        for ball in &self.balls {
            ball.validate()?;
            if !names.insert(ball.name.as_str()) {
                return Err(ConfigError::DuplicateBallName(ball.name.clone()));
            }
        }
        Ok(())
    }
}
