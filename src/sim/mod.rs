//! Simulation module
//!
//! All gameplay logic lives here and never touches a graphics API:
//! - Simulated clock only (paused time does not pass)
//! - Stable iteration order (scene insertion order)
//! - Hooks request scene changes through deferred commands

pub mod camera;
pub mod collision;
pub mod input;
pub mod object;
pub mod reaction;
pub mod rect;
pub mod scene;
pub mod state;
pub mod tick;
pub mod vfx;

pub use camera::{Camera, Ray};
pub use collision::{Authority, CollisionEngine, ContactParams, Contacts, Passes, passes_for, pick};
pub use input::{ControlMode, InputSnapshot, Keys, pixel_to_ndc};
pub use object::{
    Appearance, Body, BoundingShape, ControlInput, Geometry, Motion, MovableArea, ObjectId, ShapeKind,
};
pub use reaction::ReactionTimer;
pub use rect::{Footprint, Region};
pub use scene::{Behavior, Commands, HookContext, Inert, Scene, SceneObject};
pub use state::{GameClock, Status, Transition};
pub use tick::{GameHooks, GameManager};
pub use vfx::Effect;
