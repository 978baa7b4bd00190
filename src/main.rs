//! Gameframe headless demo
//!
//! Builds a walled arena with a keyboard-driven paddle and a handful of
//! randomly placed pucks, then runs the frame loop without a window until
//! the countdown pauses it.
//!
//! Usage: `gameframe-demo [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec3;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use gameframe::renderer::{CountingRenderer, Drawable};
    use gameframe::sim::{
        Behavior, Body, Effect, GameClock, GameHooks, GameManager, HookContext, InputSnapshot, Keys, ObjectId,
        Scene, SceneObject, Transition,
    };
    use gameframe::{Result, SimConfig};

    const ARENA_HALF: f32 = 100.0;
    const WALL_THICKNESS: f32 = 10.0;
    const WALL_HEIGHT: f32 = 20.0;
    const PUCK_COUNT: usize = 8;
    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60;

    /// Sparks on every hit, freezes briefly when clicked
    struct Puck {
        hits: u32,
    }

    impl Behavior for Puck {
        fn on_click(&mut self, body: &mut Body, ctx: &mut HookContext<'_>) {
            log::info!("Puck {} clicked, freezing for 1s", body.id());
            ctx.commands.freeze(body.id(), 1.0);
        }

        fn on_collision(&mut self, body: &mut Body, other: ObjectId, ctx: &mut HookContext<'_>) {
            self.hits += 1;
            log::trace!("Puck {} hit {} (hit #{})", body.id(), other, self.hits);
            ctx.commands.play_effect_at(body.id(), 0, body.position);
        }
    }

    /// Logs progress once a second, stops if a puck escapes the walls
    #[derive(Default)]
    struct Arena {
        ticks: u32,
    }

    impl GameHooks for Arena {
        fn on_start(&mut self, scene: &mut Scene) {
            log::info!("Arena live with {} objects", scene.len());
        }

        fn on_pause(&mut self, _scene: &mut Scene) {
            log::info!("Arena paused after {} ticks", self.ticks);
        }

        fn on_tick(&mut self, scene: &mut Scene, clock: &GameClock) -> Option<Transition> {
            self.ticks += 1;
            if self.ticks % 60 == 0 {
                let moving = scene.bodies().filter(|b| b.velocity().length_squared() > 0.01).count();
                log::info!(
                    "t={:.1}s remaining={:.1}s moving={}",
                    clock.elapsed(),
                    clock.remaining(),
                    moving
                );
            }
            let escaped = scene
                .bodies()
                .any(|b| b.is_movable() && !b.is_rigid() && b.position.x.abs() > ARENA_HALF * 2.0);
            escaped.then(|| {
                log::warn!("A puck escaped the arena");
                Transition::Stop
            })
        }
    }

    fn wall(x: f32, z: f32, width: f32, depth: f32) -> Result<Body> {
        Ok(Body::fixed()
            .with_box(width, WALL_HEIGHT, depth)?
            .with_position(Vec3::new(x, 0.0, z))
            .with_color(0x3050a0))
    }

    fn puck(rng: &mut Pcg32) -> Result<SceneObject> {
        let position = Vec3::new(
            rng.random_range(-ARENA_HALF + 20.0..ARENA_HALF - 20.0),
            0.0,
            rng.random_range(-ARENA_HALF + 20.0..ARENA_HALF - 40.0),
        );
        let heading: f32 = rng.random_range(0.0..std::f32::consts::TAU);
        let speed: f32 = rng.random_range(40.0..80.0);
        let velocity = Vec3::new(heading.cos(), 0.0, heading.sin()) * speed;

        let body = Body::movable(rng.random_range(1.0..3.0))?
            .with_sphere(4.0)?
            .with_position(position)
            .with_velocity(velocity)
            .with_color(0xe0c040);
        let sparks = Effect::new("sparks.png", 4, 4, 16, 0.5)?.with_scale(6.0);
        Ok(SceneObject::new(body)
            .with_behavior(Puck { hits: 0 })
            .with_effect(sparks))
    }

    fn build(game: &mut GameManager<Arena>, seed: u64) -> Result<()> {
        let span = ARENA_HALF * 2.0 + WALL_THICKNESS * 2.0;
        let offset = ARENA_HALF + WALL_THICKNESS / 2.0;
        game.scene.add(wall(0.0, offset, span, WALL_THICKNESS)?);
        game.scene.add(wall(0.0, -offset, span, WALL_THICKNESS)?);
        game.scene.add(wall(offset, 0.0, WALL_THICKNESS, span)?);
        game.scene.add(wall(-offset, 0.0, WALL_THICKNESS, span)?);

        let mut paddle = Body::rigid(50.0)?
            .with_cylinder(8.0, 8.0, 6.0)?
            .with_position(Vec3::new(0.0, 0.0, ARENA_HALF - 20.0))
            .with_color(0xf0f0f0);
        paddle.enable_keyboard_control(2.0);
        paddle.set_movable_area(ARENA_HALF, ARENA_HALF / 2.0, -ARENA_HALF, ARENA_HALF);
        game.scene.add(paddle);

        let mut rng = Pcg32::seed_from_u64(seed);
        for _ in 0..PUCK_COUNT {
            game.scene.add(puck(&mut rng)?);
        }
        Ok(())
    }

    /// Scripted input: sweep the paddle left and right, click the center now and then
    fn script(frame: u32) -> InputSnapshot {
        let keys = if (frame / 90) % 2 == 0 { Keys::LEFT } else { Keys::RIGHT };
        let mut input = InputSnapshot::with_keys(keys);
        if frame % 120 == 60 {
            input.release_at(glam::Vec2::ZERO);
        }
        if frame == 1 {
            input.resized = Some((1280, 720));
        }
        input
    }

    fn load_config(path: Option<&str>) -> SimConfig {
        let Some(path) = path else {
            return SimConfig {
                countdown: 10.0,
                ..SimConfig::default()
            };
        };
        match std::fs::read_to_string(path) {
            Ok(json) => match SimConfig::from_json(&json) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("Ignoring {}: {}", path, err);
                    SimConfig::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read {}: {}", path, err);
                SimConfig::default()
            }
        }
    }

    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let config = load_config(args.next().as_deref());
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
        log::info!("Seed: {}", seed);

        let mut game = GameManager::new(config, Arena::default());
        build(&mut game, seed)?;
        game.start();

        let mut renderer = CountingRenderer::default();
        let mut frame = 0;
        while game.is_running() && frame < MAX_FRAMES {
            game.tick(&script(frame), FRAME_DT, &mut renderer);
            frame += 1;
        }

        let sprites = renderer
            .last
            .iter()
            .filter(|item| matches!(item.drawable, Drawable::Sprite { .. }))
            .count();
        log::info!(
            "Finished: {:?} after {} frames ({:.2}s simulated, {} rendered, {} items / {} sprites in last frame)",
            game.status(),
            frame,
            game.elapsed_seconds(),
            renderer.frames,
            renderer.last.len(),
            sprites
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Gameframe demo starting...");
    if let Err(err) = demo::run() {
        log::error!("Demo failed: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive GameManager::tick from their own frame callback
}
