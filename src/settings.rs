//! Simulation settings
//!
//! Loaded from JSON by the host; every field falls back to its default.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;

/// Camera placement used for pointer rays and click picking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Viewport width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, CAMERA_HEIGHT, CAMERA_DISTANCE),
            target: Vec3::ZERO,
            fov_degrees: CAMERA_FOV_DEGREES,
            aspect: 16.0 / 9.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub camera: CameraSettings,
    /// Mass assumed for partners without kinematics
    pub obstacle_mass: f32,
    /// Contact distances below this are skipped
    pub contact_epsilon: f32,
    /// Per-tick dt clamp (seconds)
    pub max_frame_dt: f32,
    /// Height of the plane pointer control projects onto
    pub ground_height: f32,
    /// Auto-pause after this many seconds of play (0 disables)
    pub countdown: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            obstacle_mass: OBSTACLE_MASS,
            contact_epsilon: CONTACT_EPSILON,
            max_frame_dt: MAX_FRAME_DT,
            ground_height: 0.0,
            countdown: 0.0,
        }
    }
}

impl SimConfig {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace nonsensical values with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.obstacle_mass.is_finite() && self.obstacle_mass > 0.0) {
            log::warn!("Ignoring obstacle_mass {}, using default", self.obstacle_mass);
            self.obstacle_mass = defaults.obstacle_mass;
        }
        if !(self.contact_epsilon.is_finite() && self.contact_epsilon >= 0.0) {
            log::warn!("Ignoring contact_epsilon {}, using default", self.contact_epsilon);
            self.contact_epsilon = defaults.contact_epsilon;
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            log::warn!("Ignoring max_frame_dt {}, using default", self.max_frame_dt);
            self.max_frame_dt = defaults.max_frame_dt;
        }
        if !(self.countdown.is_finite() && self.countdown >= 0.0) {
            self.countdown = 0.0;
        }
        self
    }
}
