//! Scene graph and per-object hooks
//!
//! The scene owns every top-level object in insertion order. That order is
//! the iteration order for integration, collision and click dispatch, so
//! earlier objects win ties.
//!
//! Hooks never touch the object list directly. Spawning, despawning and
//! freezing requested from inside a tick are queued in [`Commands`] and
//! applied once the object phase is over.

use std::fmt;

use glam::Vec3;

use super::camera::Ray;
use super::collision::{CollisionEngine, pick};
use super::object::{Body, ControlInput, ObjectId};
use super::vfx::Effect;
use crate::error::{FrameError, Result};

/// Game-specific behavior attached to a scene object
///
/// All methods default to no-ops.
pub trait Behavior {
    /// Per-frame logic, run right after the body moved (not while frozen)
    fn update(&mut self, _body: &mut Body, _ctx: &mut HookContext<'_>) {}

    /// The object was clicked while the simulation was running
    fn on_click(&mut self, _body: &mut Body, _ctx: &mut HookContext<'_>) {}

    /// A contact involving this object was resolved
    fn on_collision(&mut self, _body: &mut Body, _other: ObjectId, _ctx: &mut HookContext<'_>) {}
}

/// Behavior that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl Behavior for Inert {}

/// What a hook can see and request
pub struct HookContext<'a> {
    pub dt: f32,
    /// Simulation time in seconds
    pub now: f64,
    pub commands: &'a mut Commands,
}

/// Scene changes requested during a tick
#[derive(Default)]
pub struct Commands {
    spawn: Vec<SceneObject>,
    despawn: Vec<ObjectId>,
    freeze: Vec<(ObjectId, f32)>,
    play: Vec<(ObjectId, usize, Option<Vec3>)>,
}

impl Commands {
    pub fn spawn(&mut self, object: SceneObject) {
        self.spawn.push(object);
    }

    pub fn despawn(&mut self, id: ObjectId) {
        self.despawn.push(id);
    }

    pub fn freeze(&mut self, id: ObjectId, seconds: f32) {
        self.freeze.push((id, seconds));
    }

    /// Play effect `index` attached to object `owner`
    pub fn play_effect(&mut self, owner: ObjectId, index: usize) {
        self.play.push((owner, index, None));
    }

    /// Play a detached copy of effect `index` of `owner` at a world position
    pub fn play_effect_at(&mut self, owner: ObjectId, index: usize, position: Vec3) {
        self.play.push((owner, index, Some(position)));
    }

    pub fn is_empty(&self) -> bool {
        self.spawn.is_empty() && self.despawn.is_empty() && self.freeze.is_empty() && self.play.is_empty()
    }
}

/// A body plus its behavior and attached effects
pub struct SceneObject {
    pub body: Body,
    pub effects: Vec<Effect>,
    behavior: Box<dyn Behavior>,
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("body", &self.body)
            .field("effects", &self.effects.len())
            .finish_non_exhaustive()
    }
}

impl From<Body> for SceneObject {
    fn from(body: Body) -> Self {
        Self::new(body)
    }
}

impl SceneObject {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            effects: Vec::new(),
            behavior: Box::new(Inert),
        }
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.body.id()
    }

    fn advance_effects(&mut self, dt: f32) {
        for effect in &mut self.effects {
            effect.advance_all(dt);
        }
    }
}

/// Ordered collection of scene objects and free-standing effects
#[derive(Debug)]
pub struct Scene {
    objects: Vec<SceneObject>,
    effects: Vec<Effect>,
    next_id: ObjectId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            effects: Vec::new(),
            next_id: 1,
        }
    }

    /// Register an object; its current state becomes its reset state
    pub fn add(&mut self, object: impl Into<SceneObject>) -> ObjectId {
        let mut object = object.into();
        let id = self.next_id;
        self.next_id += 1;
        object.body.assign_id(id);
        object.body.snapshot_defaults();
        log::debug!(
            "Registered object {} ({:?}, movable: {}, rigid: {})",
            id,
            object.body.shape_kind(),
            object.body.is_movable(),
            object.body.is_rigid()
        );
        self.objects.push(object);
        id
    }

    /// Register a free-standing effect; returns its index
    pub fn add_effect(&mut self, effect: Effect) -> usize {
        self.effects.push(effect);
        self.effects.len() - 1
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        log::debug!("Removed object {}", id);
        Some(self.objects.remove(index))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn body(&self, id: ObjectId) -> Option<&Body> {
        self.get(id).map(|o| &o.body)
    }

    pub fn body_mut(&mut self, id: ObjectId) -> Option<&mut Body> {
        self.get_mut(id).map(|o| &mut o.body)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.objects.iter().map(|o| &o.body)
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut [Effect] {
        &mut self.effects
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    /// Freeze an object's integration for `seconds` from `now`
    pub fn freeze(&mut self, id: ObjectId, seconds: f32, now: f64) -> Result<()> {
        let body = self.body_mut(id).ok_or(FrameError::UnknownObject(id))?;
        body.freeze(seconds, now);
        Ok(())
    }

    /// Restore every object to its registered state
    pub fn reset_all(&mut self) {
        for object in &mut self.objects {
            object.body.reset();
        }
    }

    /// Move every visible movable object and run its update hook
    pub fn integrate(&mut self, dt: f32, now: f64, control: &ControlInput<'_>, commands: &mut Commands) {
        for object in &mut self.objects {
            if !object.body.visible || !object.body.is_movable() {
                continue;
            }
            if object.body.begin_step(dt, now, control) {
                let mut ctx = HookContext {
                    dt,
                    now,
                    commands: &mut *commands,
                };
                object.behavior.update(&mut object.body, &mut ctx);
                object.body.end_step();
            }
        }
    }

    /// Test every visible movable object against every other visible object
    pub fn collide(&mut self, engine: &CollisionEngine, dt: f32, now: f64, commands: &mut Commands) {
        let count = self.objects.len();
        for i in 0..count {
            let body = &self.objects[i].body;
            if !body.visible || !body.is_movable() {
                continue;
            }
            for j in 0..count {
                if i == j || !self.objects[j].body.visible {
                    continue;
                }
                let (a, b) = pair_mut(&mut self.objects, i, j);
                let fired = engine.process(&mut a.body, &mut b.body, dt);
                let (a_id, b_id) = (a.id(), b.id());
                for _ in 0..fired.count() {
                    let mut ctx = HookContext {
                        dt,
                        now,
                        commands: &mut *commands,
                    };
                    a.behavior.on_collision(&mut a.body, b_id, &mut ctx);
                    b.behavior.on_collision(&mut b.body, a_id, &mut ctx);
                }
            }
        }
    }

    /// Send a click to the nearest visible object under `ray`
    pub fn dispatch_click(&mut self, ray: &Ray, dt: f32, now: f64, commands: &mut Commands) -> Option<ObjectId> {
        let id = pick(self.bodies(), ray)?;
        let object = self.get_mut(id)?;
        log::debug!("Click on object {}", id);
        let mut ctx = HookContext {
            dt,
            now,
            commands: &mut *commands,
        };
        object.behavior.on_click(&mut object.body, &mut ctx);
        Some(id)
    }

    /// Advance attached and free-standing effects
    pub fn advance_effects(&mut self, dt: f32) {
        for object in &mut self.objects {
            object.advance_effects(dt);
        }
        for effect in &mut self.effects {
            effect.advance_all(dt);
        }
    }

    /// Apply requests queued by hooks during the tick
    pub fn apply(&mut self, commands: Commands, now: f64) {
        let Commands {
            spawn,
            despawn,
            freeze,
            play,
        } = commands;

        for (id, seconds) in freeze {
            if let Err(err) = self.freeze(id, seconds, now) {
                log::warn!("Dropped freeze request: {}", err);
            }
        }
        for (owner, index, position) in play {
            let Some(effect) = self.get_mut(owner).and_then(|o| o.effects.get_mut(index)) else {
                log::warn!("Dropped effect request: object {} has no effect {}", owner, index);
                continue;
            };
            match position {
                Some(position) => effect.play_detached(position),
                None => effect.play(),
            }
        }
        for id in despawn {
            self.remove(id);
        }
        for object in spawn {
            self.add(object);
        }
    }
}

/// Two distinct mutable elements of a slice
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (low, high) = items.split_at_mut(j);
        (&mut low[i], &mut high[0])
    } else {
        let (low, high) = items.split_at_mut(i);
        (&mut high[0], &mut low[j])
    }
}
