//! Frame loop and game lifecycle
//!
//! One call to [`GameManager::tick`] is one frame: clicks, motion,
//! collisions, effects, deferred scene changes, the game's own tick hook and
//! finally a render. Nothing but a resize redraw happens unless running.

use super::camera::Camera;
use super::collision::{CollisionEngine, ContactParams};
use super::input::InputSnapshot;
use super::object::{ControlInput, ObjectId};
use super::scene::{Commands, Scene};
use super::state::{GameClock, Status, Transition};
use crate::error::Result;
use crate::renderer::Renderer;
use crate::settings::SimConfig;

/// Game-level lifecycle hooks
///
/// All methods default to no-ops.
pub trait GameHooks {
    fn on_start(&mut self, _scene: &mut Scene) {}
    fn on_pause(&mut self, _scene: &mut Scene) {}
    fn on_stop(&mut self, _scene: &mut Scene) {}

    /// Runs once per running frame after objects were stepped
    fn on_tick(&mut self, _scene: &mut Scene, _clock: &GameClock) -> Option<Transition> {
        None
    }
}

impl GameHooks for () {}

/// Owns the scene, the camera and the lifecycle
#[derive(Debug)]
pub struct GameManager<H: GameHooks = ()> {
    pub scene: Scene,
    pub camera: Camera,
    pub hooks: H,
    engine: CollisionEngine,
    config: SimConfig,
    status: Status,
    clock: GameClock,
}

impl<H: GameHooks> GameManager<H> {
    /// New manager in the running state with an empty scene
    pub fn new(config: SimConfig, hooks: H) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::from_settings(&config.camera),
            hooks,
            engine: CollisionEngine::new(ContactParams::from(&config)),
            clock: GameClock::new(config.countdown),
            config,
            status: Status::Running,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.status == Status::Stopped
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Simulated seconds since the last (re)start
    pub fn elapsed_seconds(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn remaining_countdown(&self) -> f64 {
        self.clock.remaining()
    }

    pub fn set_countdown(&mut self, seconds: f32) {
        self.clock.set_countdown(seconds);
    }

    /// Run (or resume). Coming from stopped, every object and the clock reset first.
    pub fn start(&mut self) {
        if self.status == Status::Stopped {
            self.scene.reset_all();
            self.clock.restart();
            log::info!("Restarting: {} objects reset", self.scene.len());
        }
        self.status = Status::Running;
        log::info!("Started at {:.2}s", self.clock.elapsed());
        self.hooks.on_start(&mut self.scene);
    }

    pub fn pause(&mut self) {
        self.status = Status::Paused;
        log::info!("Paused at {:.2}s", self.clock.elapsed());
        self.hooks.on_pause(&mut self.scene);
    }

    pub fn stop(&mut self) {
        self.status = Status::Stopped;
        log::info!("Stopped at {:.2}s", self.clock.elapsed());
        self.hooks.on_stop(&mut self.scene);
    }

    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Start => self.start(),
            Transition::Pause => self.pause(),
            Transition::Stop => self.stop(),
        }
    }

    /// Freeze an object for `seconds` of simulated time
    pub fn freeze(&mut self, id: ObjectId, seconds: f32) -> Result<()> {
        self.scene.freeze(id, seconds, self.clock.elapsed())
    }

    /// Advance one frame and render it
    pub fn tick(&mut self, input: &InputSnapshot, dt: f32, renderer: &mut dyn Renderer) {
        if let Some((width, height)) = input.resized {
            self.camera.resize(width, height);
        }
        if self.status != Status::Running {
            if input.resized.is_some() {
                renderer.render(&self.scene, &self.camera);
            }
            return;
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };
        self.clock.advance(dt);
        if self.clock.countdown_elapsed() {
            log::info!("Countdown of {:.1}s elapsed", self.clock.countdown());
            self.pause();
            return;
        }
        let now = self.clock.elapsed();
        let mut commands = Commands::default();

        for &ndc in &input.releases {
            let ray = self.camera.ray(ndc);
            self.scene.dispatch_click(&ray, dt, now, &mut commands);
        }

        let control = ControlInput {
            input,
            camera: &self.camera,
            ground_height: self.config.ground_height,
        };
        self.scene.integrate(dt, now, &control, &mut commands);
        self.scene.collide(&self.engine, dt, now, &mut commands);
        self.scene.advance_effects(dt);
        self.scene.apply(commands, now);

        if let Some(transition) = self.hooks.on_tick(&mut self.scene, &self.clock) {
            log::debug!("Tick hook requested {:?}", transition);
            self.apply(transition);
        }

        renderer.render(&self.scene, &self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::CountingRenderer;
    use crate::sim::input::Keys;
    use crate::sim::object::Body;
    use glam::Vec3;

    #[derive(Debug, Default)]
    struct Recorder {
        starts: u32,
        pauses: u32,
        stops: u32,
        ticks: u32,
        stop_after: Option<u32>,
    }

    impl GameHooks for Recorder {
        fn on_start(&mut self, _scene: &mut Scene) {
            self.starts += 1;
        }

        fn on_pause(&mut self, _scene: &mut Scene) {
            self.pauses += 1;
        }

        fn on_stop(&mut self, _scene: &mut Scene) {
            self.stops += 1;
        }

        fn on_tick(&mut self, _scene: &mut Scene, _clock: &GameClock) -> Option<Transition> {
            self.ticks += 1;
            (Some(self.ticks) == self.stop_after).then_some(Transition::Stop)
        }
    }

    fn manager() -> GameManager<Recorder> {
        GameManager::new(SimConfig::default(), Recorder::default())
    }

    fn drifter() -> Body {
        Body::movable(1.0)
            .unwrap()
            .with_circle(1.0)
            .unwrap()
            .with_velocity(Vec3::new(10.0, 0.0, 0.0))
    }

    #[test]
    fn test_lifecycle_is_total() {
        let mut game = manager();
        assert!(game.is_running());

        for from in [Transition::Start, Transition::Pause, Transition::Stop] {
            for to in [Transition::Start, Transition::Pause, Transition::Stop] {
                game.apply(from);
                game.apply(to);
                let expected = match to {
                    Transition::Start => Status::Running,
                    Transition::Pause => Status::Paused,
                    Transition::Stop => Status::Stopped,
                };
                assert_eq!(game.status(), expected, "{:?} -> {:?}", from, to);
            }
        }
        // Every call fires exactly one hook
        assert_eq!(game.hooks.starts, 6);
        assert_eq!(game.hooks.pauses, 6);
        assert_eq!(game.hooks.stops, 6);
    }

    #[test]
    fn test_tick_moves_objects_and_renders() {
        let mut game = manager();
        let id = game.scene.add(drifter());
        let mut renderer = CountingRenderer::default();

        game.tick(&InputSnapshot::default(), 0.05, &mut renderer);
        assert!((game.scene.body(id).unwrap().position - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(renderer.frames, 1);
        assert_eq!(game.hooks.ticks, 1);
    }

    #[test]
    fn test_paused_only_renders_on_resize() {
        let mut game = manager();
        let id = game.scene.add(drifter());
        let mut renderer = CountingRenderer::default();
        game.pause();

        game.tick(&InputSnapshot::default(), 0.05, &mut renderer);
        assert_eq!(renderer.frames, 0);
        assert_eq!(game.elapsed_seconds(), 0.0);

        let resize = InputSnapshot {
            resized: Some((800, 400)),
            ..Default::default()
        };
        game.tick(&resize, 0.05, &mut renderer);
        assert_eq!(renderer.frames, 1);
        assert_eq!(game.camera.aspect, 2.0);
        assert_eq!(game.scene.body(id).unwrap().position, Vec3::ZERO);
        assert_eq!(game.hooks.ticks, 0);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut game = manager();
        let id = game.scene.add(drifter());
        game.tick(&InputSnapshot::default(), 5.0, &mut CountingRenderer::default());
        assert!((game.scene.body(id).unwrap().position.x - 1.0).abs() < 1e-5);
        assert!((game.elapsed_seconds() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_countdown_auto_pauses_and_freezes_clock() {
        let mut game = manager();
        game.set_countdown(10.0);
        let mut renderer = CountingRenderer::default();

        for _ in 0..101 {
            game.tick(&InputSnapshot::default(), 0.1, &mut renderer);
        }
        assert!(game.is_paused());
        assert_eq!(game.hooks.pauses, 1);
        assert_eq!(game.remaining_countdown(), 0.0);

        let frozen = game.elapsed_seconds();
        assert!(frozen >= 10.0);
        game.tick(&InputSnapshot::default(), 0.1, &mut renderer);
        assert_eq!(game.elapsed_seconds(), frozen);
    }

    #[test]
    fn test_stop_then_start_resets_scene_and_clock() {
        let mut game = manager();
        let id = game.scene.add(drifter());
        let mut renderer = CountingRenderer::default();
        for _ in 0..3 {
            game.tick(&InputSnapshot::default(), 0.1, &mut renderer);
        }
        game.freeze(id, 60.0).unwrap();

        game.stop();
        game.start();
        let body = game.scene.body(id).unwrap();
        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(body.velocity(), Vec3::new(10.0, 0.0, 0.0));
        assert!(!body.is_frozen(0.0));
        assert_eq!(game.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_pause_then_start_resumes_in_place() {
        let mut game = manager();
        let id = game.scene.add(drifter());
        game.tick(&InputSnapshot::default(), 0.1, &mut CountingRenderer::default());
        game.pause();
        game.start();
        assert!((game.scene.body(id).unwrap().position.x - 1.0).abs() < 1e-5);
        assert!(game.elapsed_seconds() > 0.0);
    }

    #[test]
    fn test_tick_hook_can_stop_the_game() {
        let mut game = GameManager::new(
            SimConfig::default(),
            Recorder {
                stop_after: Some(2),
                ..Default::default()
            },
        );
        let mut renderer = CountingRenderer::default();
        for _ in 0..5 {
            game.tick(&InputSnapshot::default(), 0.1, &mut renderer);
        }
        assert!(game.is_stopped());
        assert_eq!(game.hooks.ticks, 2);
        assert_eq!(renderer.frames, 2);
    }

    #[test]
    fn test_frozen_object_holds_position() {
        let mut game = manager();
        let id = game.scene.add(drifter());
        game.freeze(id, 0.25).unwrap();
        let mut renderer = CountingRenderer::default();

        for _ in 0..2 {
            game.tick(&InputSnapshot::default(), 0.1, &mut renderer);
        }
        assert_eq!(game.scene.body(id).unwrap().position, Vec3::ZERO);

        for _ in 0..2 {
            game.tick(&InputSnapshot::default(), 0.1, &mut renderer);
        }
        assert!(game.scene.body(id).unwrap().position.x > 0.0);
    }

    #[test]
    fn test_keyboard_paddle_steps_per_tick() {
        let mut game = manager();
        let mut paddle = Body::rigid(10.0).unwrap().with_circle(2.0).unwrap();
        paddle.enable_keyboard_control(2.0);
        let id = game.scene.add(paddle);

        game.tick(&InputSnapshot::with_keys(Keys::UP | Keys::RIGHT), 0.016, &mut CountingRenderer::default());
        assert_eq!(game.scene.body(id).unwrap().position, Vec3::new(2.0, 0.0, -2.0));
    }
}
