//! Sprite-sheet effects
//!
//! Only timing lives here: which frame of the sheet is showing and whether
//! the effect is still playing. Drawing is the renderer's business; it reads
//! [`Effect::uv_offset`] and [`Effect::uv_scale`].

use glam::{Vec2, Vec3};

use crate::error::{FrameError, Result};

/// A sprite-sheet animation
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    /// Position (relative to the owning object when attached to one)
    pub position: Vec3,
    pub scale: f32,
    pub visible: bool,
    /// Restart automatically when the last frame is reached
    pub looping: bool,
    texture: String,
    audio: Option<String>,
    rows: u32,
    cols: u32,
    /// Full playback time in seconds
    duration: f32,
    timer: f32,
    current_frame: usize,
    active: bool,
    /// Frame offsets into the sheet, top row first
    uv_offsets: Vec<Vec2>,
    /// Detached copies playing at their own world positions
    satellites: Vec<Effect>,
}

impl Effect {
    pub fn new(texture: impl Into<String>, rows: u32, cols: u32, frames: u32, duration: f32) -> Result<Self> {
        let fits = rows.checked_mul(cols).is_some_and(|cells| frames <= cells);
        if frames == 0 || !fits {
            return Err(FrameError::InvalidEffect(format!(
                "{frames} frames do not fit a {rows}x{cols} sheet"
            )));
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(FrameError::InvalidEffect(format!(
                "duration must be positive, got {duration}"
            )));
        }

        // Row-major from the top of the sheet; only the used cells
        let uv_offsets = (0..frames)
            .map(|i| {
                let (row, col) = (rows - 1 - i / cols, i % cols);
                Vec2::new(col as f32 / cols as f32, row as f32 / rows as f32)
            })
            .collect();

        Ok(Self {
            position: Vec3::ZERO,
            scale: 1.0,
            visible: false,
            looping: false,
            texture: texture.into(),
            audio: None,
            rows,
            cols,
            duration,
            timer: 0.0,
            current_frame: 0,
            active: false,
            uv_offsets,
            satellites: Vec::new(),
        })
    }

    pub fn with_audio(mut self, path: impl Into<String>) -> Self {
        self.audio = Some(path.into());
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn audio(&self) -> Option<&str> {
        self.audio.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn frame_count(&self) -> usize {
        self.uv_offsets.len()
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Sheet offset of the frame currently showing
    pub fn uv_offset(&self) -> Vec2 {
        self.uv_offsets
            .get(self.current_frame)
            .copied()
            .unwrap_or(Vec2::ZERO)
    }

    /// Size of one frame in sheet UV space
    pub fn uv_scale(&self) -> Vec2 {
        Vec2::new(1.0 / self.cols as f32, 1.0 / self.rows as f32)
    }

    pub fn satellites(&self) -> &[Effect] {
        &self.satellites
    }

    pub fn play(&mut self) {
        self.active = true;
        self.visible = true;
    }

    /// Halt on the current frame
    pub fn pause(&mut self) {
        self.active = false;
    }

    /// Rewind and hide (restarts immediately when looping)
    pub fn stop(&mut self) {
        self.active = false;
        self.visible = false;
        self.timer = 0.0;
        self.current_frame = 0;
        if self.looping {
            self.play();
        }
    }

    /// Spawn a one-shot copy playing at a world position
    pub fn play_detached(&mut self, position: Vec3) {
        let mut copy = Self {
            position,
            looping: false,
            timer: 0.0,
            current_frame: 0,
            satellites: Vec::new(),
            ..self.clone()
        };
        copy.play();
        self.satellites.push(copy);
    }

    /// Advance this effect's own animation by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.timer += dt;
        let frame_time = self.duration / self.uv_offsets.len() as f32;
        self.current_frame = (self.timer / frame_time).floor() as usize;
        if self.current_frame >= self.uv_offsets.len() {
            self.stop();
        }
    }

    /// Advance the effect and its satellites, dropping satellites that finished
    pub fn advance_all(&mut self, dt: f32) {
        self.advance(dt);
        for satellite in &mut self.satellites {
            satellite.advance(dt);
        }
        self.satellites.retain(Effect::is_active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explosion() -> Effect {
        // 2x3 sheet with 5 used frames, 1 second total
        Effect::new("explosion.png", 2, 3, 5, 1.0).unwrap()
    }

    #[test]
    fn test_sheet_layout_top_row_first() {
        let fx = explosion();
        assert_eq!(fx.frame_count(), 5);
        assert_eq!(fx.uv_offset(), Vec2::new(0.0, 0.5));
        assert_eq!(fx.uv_scale(), Vec2::new(1.0 / 3.0, 0.5));
    }

    #[test]
    fn test_invalid_sheets_rejected() {
        assert!(Effect::new("x.png", 1, 2, 3, 1.0).is_err());
        assert!(Effect::new("x.png", 0, 2, 1, 1.0).is_err());
        assert!(Effect::new("x.png", 1, 2, 2, 0.0).is_err());
        assert!(matches!(
            Effect::new("x.png", u32::MAX, 2, 3, 1.0),
            Err(FrameError::InvalidEffect(_))
        ));
    }

    #[test]
    fn test_large_sheet_keeps_only_used_frames() {
        let fx = Effect::new("strip.png", 60_000, 60_000, 3, 1.0).unwrap();
        assert_eq!(fx.frame_count(), 3);
        assert_eq!(fx.uv_offset(), Vec2::new(0.0, 59_999.0 / 60_000.0));
    }

    #[test]
    fn test_plays_through_then_stops() {
        let mut fx = explosion();
        fx.advance(0.5);
        assert_eq!(fx.current_frame(), 0, "idle effects do not advance");

        fx.play();
        assert!(fx.visible);
        fx.advance(0.45);
        assert_eq!(fx.current_frame(), 2);
        fx.advance(0.6);
        assert!(!fx.is_active());
        assert!(!fx.visible);
        assert_eq!(fx.current_frame(), 0);
    }

    #[test]
    fn test_looping_restarts() {
        let mut fx = explosion();
        fx.looping = true;
        fx.play();
        fx.advance(1.1);
        assert!(fx.is_active());
        assert_eq!(fx.current_frame(), 0);
    }

    #[test]
    fn test_pause_holds_frame() {
        let mut fx = explosion();
        fx.play();
        fx.advance(0.25);
        fx.pause();
        fx.advance(10.0);
        assert_eq!(fx.current_frame(), 1);
        assert!(fx.visible);
    }

    #[test]
    fn test_detached_copies_finish_and_drop() {
        let mut fx = explosion().with_audio("boom.ogg");
        fx.looping = true;
        fx.play_detached(Vec3::new(5.0, 0.0, 5.0));
        fx.play_detached(Vec3::new(-5.0, 0.0, 5.0));
        assert_eq!(fx.satellites().len(), 2);
        assert!(!fx.is_active(), "owner is not started by detached plays");
        assert_eq!(fx.satellites()[0].audio(), Some("boom.ogg"));
        assert!(!fx.satellites()[0].looping);

        fx.advance_all(0.5);
        assert_eq!(fx.satellites().len(), 2);
        fx.advance_all(0.6);
        assert!(fx.satellites().is_empty());
    }
}
