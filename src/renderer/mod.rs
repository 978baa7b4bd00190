//! Rendering boundary
//!
//! The framework does not draw. Each running frame (and each resize while
//! not running) it hands the scene and camera to a host [`Renderer`].
//! [`render_items`] flattens the scene into world-space draw items so hosts
//! do not have to walk the object tree themselves.

use glam::{Vec2, Vec3};

use crate::sim::camera::Camera;
use crate::sim::object::{Appearance, Body, BoundingShape, Geometry, ObjectId};
use crate::sim::scene::Scene;
use crate::sim::vfx::Effect;

/// Host-side drawing surface
pub trait Renderer {
    fn render(&mut self, scene: &Scene, camera: &Camera);
}

/// What to draw
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// A body (or one child of a compound body)
    Body {
        id: ObjectId,
        /// Mesh to draw; `Geometry::None` leaves the choice to the host
        geometry: Geometry,
        shape: BoundingShape,
        appearance: Appearance,
    },
    /// One frame of a sprite-sheet effect
    Sprite {
        texture: String,
        uv_offset: Vec2,
        uv_scale: Vec2,
        scale: f32,
    },
}

/// A drawable at its world position
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub position: Vec3,
    pub drawable: Drawable,
}

/// Flatten every visible body, child and effect into world-space items
pub fn render_items(scene: &Scene) -> Vec<RenderItem> {
    let mut items = Vec::new();
    for object in scene.objects() {
        if !object.body.visible {
            continue;
        }
        push_body(&mut items, &object.body, Vec3::ZERO);
        for effect in &object.effects {
            push_effect(&mut items, effect, object.body.position);
        }
    }
    for effect in scene.effects() {
        push_effect(&mut items, effect, Vec3::ZERO);
    }
    items
}

fn push_body(items: &mut Vec<RenderItem>, body: &Body, origin: Vec3) {
    let position = origin + body.position;
    items.push(RenderItem {
        position,
        drawable: Drawable::Body {
            id: body.id(),
            geometry: body.geometry(),
            shape: body.shape(),
            appearance: body.appearance.clone(),
        },
    });
    for child in body.children.iter().filter(|c| c.visible) {
        push_body(items, child, position);
    }
}

fn push_effect(items: &mut Vec<RenderItem>, effect: &Effect, origin: Vec3) {
    if effect.visible {
        items.push(sprite(effect, origin + effect.position));
    }
    // Detached copies are already in world space
    for satellite in effect.satellites().iter().filter(|s| s.visible) {
        items.push(sprite(satellite, satellite.position));
    }
}

fn sprite(effect: &Effect, position: Vec3) -> RenderItem {
    RenderItem {
        position,
        drawable: Drawable::Sprite {
            texture: effect.texture().to_string(),
            uv_offset: effect.uv_offset(),
            uv_scale: effect.uv_scale(),
            scale: effect.scale,
        },
    }
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _scene: &Scene, _camera: &Camera) {}
}

/// Headless renderer that keeps the last frame's items
#[derive(Debug, Clone, Default)]
pub struct CountingRenderer {
    pub frames: u64,
    pub last: Vec<RenderItem>,
}

impl Renderer for CountingRenderer {
    fn render(&mut self, scene: &Scene, _camera: &Camera) {
        self.frames += 1;
        self.last = render_items(scene);
    }
}
