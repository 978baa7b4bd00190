//! Gameframe - a minimal real-time game framework
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scene objects, kinematics, collisions, frame loop)
//! - `renderer`: Renderable boundary exposed to the host
//! - `settings`: Data-driven simulation configuration
//! - `error`: Error taxonomy for rejected configuration

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{FrameError, Result};
pub use settings::{CameraSettings, SimConfig};

use glam::{Vec2, Vec3};

/// Framework constants
pub mod consts {
    /// Mass given to partners that cannot move (walls, fixed posts)
    pub const OBSTACLE_MASS: f32 = 99_999_999.0;
    /// Contact distances below this are treated as already resolved
    pub const CONTACT_EPSILON: f32 = 1.0e-4;
    /// Largest dt a single tick will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default camera placement (looks at the origin from above and behind)
    pub const CAMERA_HEIGHT: f32 = 200.0;
    pub const CAMERA_DISTANCE: f32 = 200.0;
    pub const CAMERA_FOV_DEGREES: f32 = 45.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 10_000.0;

    /// Default keyboard control step (world units per tick)
    pub const DEFAULT_CONTROL_SPEED: f32 = 1.0;

    /// Average reaction times (seconds) opening each level, slowest first
    pub const REACTION_LEVELS: [f64; 9] = [6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.5, 0.3, 0.2];
    /// Answers quicker than this are accidental and not recorded
    pub const MIN_REACTION_SECS: f64 = 0.1;
    /// Number of equal score bands below the highest score
    pub const SCORE_LEVELS: usize = 10;
}

/// Project a world position onto the horizontal (XZ) plane
#[inline]
pub fn xz(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Replace the horizontal components of `v`, keeping its height
#[inline]
pub fn with_xz(v: Vec3, plane: Vec2) -> Vec3 {
    Vec3::new(plane.x, v.y, plane.y)
}

/// Whether the open intervals [a_min, a_max] and [b_min, b_max] overlap.
///
/// Touching ends do not count as overlap.
#[inline]
pub fn spans_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min < b_max && a_max > b_min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xz_roundtrip_keeps_height() {
        let v = Vec3::new(1.0, 7.0, -3.0);
        assert_eq!(xz(v), Vec2::new(1.0, -3.0));
        assert_eq!(with_xz(v, Vec2::new(4.0, 5.0)), Vec3::new(4.0, 7.0, 5.0));
    }

    #[test]
    fn test_spans_overlap() {
        assert!(spans_overlap(-1.0, 1.0, 0.5, 2.0));
        assert!(spans_overlap(-5.0, 5.0, -1.0, 1.0));
        // Touching is not overlapping
        assert!(!spans_overlap(-1.0, 1.0, 1.0, 3.0));
        assert!(!spans_overlap(2.0, 3.0, -1.0, 1.0));
    }
}
