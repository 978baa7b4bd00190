//! Per-frame input snapshot
//!
//! The host records pointer motion, key state and releases however it likes
//! and hands the simulation one snapshot per tick.

use bitflags::bitflags;
use glam::Vec2;

bitflags! {
    /// Direction keys currently held down
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Keys: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

bitflags! {
    /// How a rigid body is driven (modes may be combined)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ControlMode: u8 {
        /// Follow the pointer (mouse or touch) projected onto the ground
        const POINTER = 1 << 0;
        /// Step along x/z while direction keys are held
        const KEYBOARD = 1 << 1;
    }
}

/// Input state for a single tick
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Last known pointer position in normalized device coordinates ([-1, 1] on both axes)
    pub pointer: Option<Vec2>,
    /// Direction keys held this frame
    pub keys: Keys,
    /// Pointer releases since the last tick, in normalized device coordinates
    pub releases: Vec<Vec2>,
    /// New viewport size (width, height) if the host was resized
    pub resized: Option<(u32, u32)>,
}

impl InputSnapshot {
    /// Snapshot with only a pointer position
    pub fn pointer_at(ndc: Vec2) -> Self {
        Self {
            pointer: Some(clamp_ndc(ndc)),
            ..Default::default()
        }
    }

    /// Snapshot with only direction keys held
    pub fn with_keys(keys: Keys) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    /// Record a pointer release (click/tap end)
    pub fn release_at(&mut self, ndc: Vec2) {
        self.releases.push(clamp_ndc(ndc));
    }

    /// Clear one-shot events after a tick consumed them
    pub fn clear_events(&mut self) {
        self.releases.clear();
        self.resized = None;
    }
}

/// Convert a pixel position to normalized device coordinates (y up)
pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

#[inline]
fn clamp_ndc(ndc: Vec2) -> Vec2 {
    ndc.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        assert_eq!(pixel_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(pixel_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_clear_events_keeps_held_state() {
        let mut input = InputSnapshot::with_keys(Keys::UP | Keys::LEFT);
        input.release_at(Vec2::new(0.2, 3.0));
        input.resized = Some((640, 480));
        assert_eq!(input.releases[0], Vec2::new(0.2, 1.0));

        input.clear_events();
        assert!(input.releases.is_empty());
        assert!(input.resized.is_none());
        assert!(input.keys.contains(Keys::UP | Keys::LEFT));
    }
}
