//! Collision detection and response on the ground plane
//!
//! Three independent passes run for every (movable A, other B) pair:
//! 1. rigid circle vs soft circle: only B is displaced and re-velocitized
//! 2. soft circle vs soft (or fixed) circle: both separate, elastic exchange
//! 3. circle vs rectangle: region-classified contact point, elastic exchange
//!
//! Contact math happens in the XZ plane. Heights only gate contacts through
//! the vertical overlap pre-filter and are never changed here.

use glam::{Vec2, Vec3};

use super::camera::Ray;
use super::object::{Body, BoundingShape, Geometry, ObjectId, ShapeKind};
use super::rect::Footprint;
use crate::consts::{CONTACT_EPSILON, OBSTACLE_MASS};
use crate::settings::SimConfig;
use crate::{spans_overlap, with_xz, xz};

/// Tunables for contact resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactParams {
    /// Mass assumed for partners without motion
    pub obstacle_mass: f32,
    /// Distances below this are treated as already resolved
    pub epsilon: f32,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            obstacle_mass: OBSTACLE_MASS,
            epsilon: CONTACT_EPSILON,
        }
    }
}

impl From<&SimConfig> for ContactParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            obstacle_mass: config.obstacle_mass,
            epsilon: config.contact_epsilon,
        }
    }
}

/// Collision role of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authority {
    /// No motion: an obstacle
    Fixed,
    /// Movable and pushed around by contacts
    Soft,
    /// Movable, pushes others, never pushed
    Rigid,
}

impl Authority {
    pub fn of(body: &Body) -> Self {
        if body.is_rigid() {
            Authority::Rigid
        } else if body.is_movable() {
            Authority::Soft
        } else {
            Authority::Fixed
        }
    }
}

/// Contact passes selected for an ordered pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Passes {
    pub rigid_circle: bool,
    pub soft_circle: bool,
    pub circle_rectangle: bool,
}

impl Passes {
    pub fn any(&self) -> bool {
        self.rigid_circle || self.soft_circle || self.circle_rectangle
    }
}

/// Contacts resolved for one pair in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contacts {
    pub rigid_circle: bool,
    pub soft_circle: bool,
    /// Rectangles touched; a compound body can contribute several
    pub rectangles: usize,
}

impl Contacts {
    /// One per resolved contact, so collision hooks fire this many times
    pub fn count(&self) -> usize {
        usize::from(self.rigid_circle) + usize::from(self.soft_circle) + self.rectangles
    }
}

/// Which passes may act on the ordered pair (A, B)
pub fn passes_for(a: &Body, b: &Body) -> Passes {
    use Authority::*;
    use ShapeKind::*;

    let circle_circle = match (a.shape_kind(), b.shape_kind(), Authority::of(a), Authority::of(b)) {
        (Circle, Circle, Rigid, Soft) => Passes {
            rigid_circle: true,
            ..Default::default()
        },
        (Circle, Circle, Soft, Soft | Fixed) => Passes {
            soft_circle: true,
            ..Default::default()
        },
        _ => Passes::default(),
    };

    // Compound bodies are searched for rectangles whatever their own shape
    let circle_rectangle = a.is_circle()
        && Authority::of(a) == Soft
        && (b.is_rectangle() || !b.children.is_empty());

    Passes {
        circle_rectangle,
        ..circle_circle
    }
}

/// Outcome of a 1-D elastic exchange decomposed on a contact basis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exchange {
    pub v1n_after: f32,
    pub v2n_after: f32,
    pub v1_after: Vec2,
    pub v2_after: Vec2,
}

/// Post-collision normal speeds for a 1-D elastic collision
#[inline]
pub fn elastic_1d(v1: f32, v2: f32, m1: f32, m2: f32) -> (f32, f32) {
    let total = m1 + m2;
    (
        (v1 * (m1 - m2) + 2.0 * m2 * v2) / total,
        (v2 * (m2 - m1) + 2.0 * m1 * v1) / total,
    )
}

/// Elastic exchange along unit `normal`; tangential components are kept
pub fn exchange(normal: Vec2, v1: Vec2, v2: Vec2, m1: f32, m2: f32) -> Exchange {
    let tangent = normal.perp();
    let (v1n, v1t) = (v1.dot(normal), v1.dot(tangent));
    let (v2n, v2t) = (v2.dot(normal), v2.dot(tangent));
    let (v1n_after, v2n_after) = elastic_1d(v1n, v2n, m1, m2);
    Exchange {
        v1n_after,
        v2n_after,
        v1_after: normal * v1n_after + tangent * v1t,
        v2_after: normal * v2n_after + tangent * v2t,
    }
}

/// Vertical overlap pre-filter on [y - h, y + h] spans
#[inline]
fn vertically_overlapping(y1: f32, half1: f32, y2: f32, half2: f32) -> bool {
    spans_overlap(y1 - half1, y1 + half1, y2 - half2, y2 + half2)
}

/// Rigid circle `a` against soft circle `b`.
///
/// `a` is only read. `b` is first pushed out of `a`'s previous position (so
/// fast movers do not tunnel), then out of its current position, and
/// finally given its post-exchange velocity relative to `a`.
pub fn resolve_rigid_circle(a: &Body, b: &mut Body, dt: f32, params: &ContactParams) -> bool {
    if !a.is_rigid() || !b.is_movable() || b.is_rigid() {
        return false;
    }
    let (Some(ra), Some(rb)) = (a.shape().radius(), b.shape().radius()) else {
        return false;
    };
    let (ha, hb) = (a.shape().half_height(), b.shape().half_height());
    if !vertically_overlapping(a.position.y, ha, b.position.y, hb) {
        return false;
    }
    let Some(motion_a) = a.motion() else {
        return false;
    };
    let reach = ra + rb;

    // Sweep from where A was at the start of the frame
    let swept = xz(motion_a.previous_position()) - xz(b.position);
    let d = swept.length();
    if d < reach && d > params.epsilon {
        let push = -swept * ((reach - d) / d);
        b.position = with_xz(b.position, xz(b.position) + push);
    }

    let axis = xz(a.position) - xz(b.position);
    let d = axis.length();
    if d > reach || d <= params.epsilon {
        return false;
    }
    let push = -axis * ((reach - d) / d);
    b.position = with_xz(b.position, xz(b.position) + push);

    let Some(motion_b) = b.motion_mut() else {
        return false;
    };
    // B's correction counts as closing speed toward A
    let mut v2 = xz(motion_b.velocity);
    if dt > 0.0 {
        v2 -= push / dt;
    }
    let result = exchange(
        axis / d,
        xz(motion_a.velocity),
        v2,
        motion_a.mass(),
        motion_b.mass(),
    );
    motion_b.velocity = with_xz(motion_b.velocity, result.v2_after - result.v1_after);

    log::trace!(
        "rigid contact {} -> {}: depth {:.3}",
        a.id(),
        b.id(),
        reach - d
    );
    true
}

/// Soft circle `a` against circle `b` (soft or fixed).
///
/// Both bodies are separated along the contact normal in inverse proportion
/// to their masses (a fixed `b` does not move). The velocity exchange is
/// skipped when it would drive the pair back into each other, i.e. when
/// they are already separating.
pub fn resolve_soft_circles(a: &mut Body, b: &mut Body, params: &ContactParams) -> bool {
    if a.is_rigid() || b.is_rigid() {
        return false;
    }
    let (Some(ra), Some(rb)) = (a.shape().radius(), b.shape().radius()) else {
        return false;
    };
    let Some(m1) = a.motion().map(|m| m.mass()) else {
        return false;
    };
    let (ha, hb) = (a.shape().half_height(), b.shape().half_height());
    if !vertically_overlapping(a.position.y, ha, b.position.y, hb) {
        return false;
    }

    let reach = ra + rb;
    let axis = xz(a.position) - xz(b.position);
    let d = axis.length();
    if d >= reach || d <= params.epsilon {
        return false;
    }
    let normal = axis / d;
    let depth = reach - d;

    let (m2, v2) = match b.motion() {
        Some(motion) => (motion.mass(), xz(motion.velocity)),
        None => (params.obstacle_mass, Vec2::ZERO),
    };

    if b.is_movable() {
        let share_a = m2 / (m1 + m2);
        a.position = with_xz(a.position, xz(a.position) + normal * depth * share_a);
        b.position = with_xz(b.position, xz(b.position) - normal * depth * (1.0 - share_a));
    } else {
        a.position = with_xz(a.position, xz(a.position) + normal * depth);
    }

    let result = exchange(normal, xz(a.velocity()), v2, m1, m2);
    if result.v1n_after < result.v2n_after {
        return false;
    }

    if let Some(motion) = a.motion_mut() {
        motion.velocity = with_xz(motion.velocity, result.v1_after);
    }
    if let Some(motion) = b.motion_mut() {
        motion.velocity = with_xz(motion.velocity, result.v2_after);
    }

    log::trace!("circle contact {} <-> {}: depth {:.3}", a.id(), b.id(), depth);
    true
}

/// Soft circle against a rectangle body and, recursively, its children.
///
/// Returns how many rectangles were touched.
pub fn resolve_circle_rectangle(circle: &mut Body, rect: &mut Body, params: &ContactParams) -> usize {
    if circle.is_rigid() || !circle.is_movable() {
        return 0;
    }
    let Some(radius) = circle.shape().radius() else {
        return 0;
    };
    circle_rectangle_at(circle, radius, rect, Vec3::ZERO, params)
}

fn circle_rectangle_at(
    circle: &mut Body,
    radius: f32,
    rect: &mut Body,
    origin: Vec3,
    params: &ContactParams,
) -> usize {
    let center = origin + rect.position;

    let mut hits = 0;
    for child in rect.children.iter_mut() {
        hits += circle_rectangle_at(circle, radius, child, center, params);
    }

    let shape = rect.shape();
    let BoundingShape::Rectangle { width, depth, .. } = shape else {
        return hits;
    };
    if !vertically_overlapping(circle.position.y, radius, center.y, shape.half_height()) {
        return hits;
    }

    let footprint = Footprint::new(center, width, depth);
    let (region, point) = footprint.contact_point(circle.position);
    let Some(point) = point else {
        return hits;
    };

    if circle_point_contact(circle, radius, point, rect, params) {
        log::trace!("rectangle contact {} -> {}: {:?}", circle.id(), rect.id(), region);
        hits += 1;
    }
    hits
}

/// Circle against a single contact point owned by `rect`
fn circle_point_contact(
    circle: &mut Body,
    radius: f32,
    point: Vec2,
    rect: &mut Body,
    params: &ContactParams,
) -> bool {
    let Some(m1) = circle.motion().map(|m| m.mass()) else {
        return false;
    };
    let axis = xz(circle.position) - point;
    let d = axis.length();
    if d >= radius || d <= params.epsilon {
        return false;
    }
    let normal = axis / d;
    circle.position = with_xz(circle.position, xz(circle.position) + normal * (radius - d));

    let (m2, v2) = match rect.motion() {
        Some(motion) => (motion.mass(), xz(motion.velocity)),
        None => (params.obstacle_mass, Vec2::ZERO),
    };

    let result = exchange(normal, xz(circle.velocity()), v2, m1, m2);
    if result.v1n_after < result.v2n_after {
        return false;
    }

    let circle_velocity = if rect.is_rigid() {
        result.v1_after - result.v2_after
    } else {
        result.v1_after
    };
    if let Some(motion) = circle.motion_mut() {
        motion.velocity = with_xz(motion.velocity, circle_velocity);
    }
    if !rect.is_rigid() {
        if let Some(motion) = rect.motion_mut() {
            motion.velocity = with_xz(motion.velocity, result.v2_after);
        }
    }
    true
}

/// Per-pair contact dispatcher
#[derive(Debug, Clone, Default)]
pub struct CollisionEngine {
    pub params: ContactParams,
}

impl CollisionEngine {
    pub fn new(params: ContactParams) -> Self {
        Self { params }
    }

    /// Run every applicable pass for movable `a` against `b`; reports what fired
    pub fn process(&self, a: &mut Body, b: &mut Body, dt: f32) -> Contacts {
        let selected = passes_for(a, b);
        let mut fired = Contacts::default();
        if selected.rigid_circle {
            fired.rigid_circle = resolve_rigid_circle(a, b, dt, &self.params);
        }
        if selected.soft_circle {
            fired.soft_circle = resolve_soft_circles(a, b, &self.params);
        }
        if selected.circle_rectangle {
            fired.rectangles = resolve_circle_rectangle(a, b, &self.params);
        }
        fired
    }
}

/// Distance along `ray` to the nearest part of `body` (children included)
pub fn ray_hit(body: &Body, ray: &Ray) -> Option<f32> {
    ray_hit_at(body, ray, Vec3::ZERO)
}

fn ray_hit_at(body: &Body, ray: &Ray, origin: Vec3) -> Option<f32> {
    let center = origin + body.position;
    // The visible mesh wins over the collision bound
    let own = match body.geometry() {
        Geometry::None => match body.shape() {
            BoundingShape::None => None,
            BoundingShape::Circle { radius } => ray.intersect_sphere(center, radius),
            BoundingShape::Rectangle { width, height, depth } => {
                ray.intersect_box(center, Vec3::new(width, height, depth) / 2.0)
            }
        },
        Geometry::Sphere { radius } => ray.intersect_sphere(center, radius),
        Geometry::Circle { radius } => ray
            .intersect_ground(center.y)
            .filter(|&t| (xz(ray.at(t)) - xz(center)).length() <= radius),
        Geometry::Plane { width, depth } => ray.intersect_ground(center.y).filter(|&t| {
            let offset = (xz(ray.at(t)) - xz(center)).abs();
            offset.x <= width / 2.0 && offset.y <= depth / 2.0
        }),
        solid => ray.intersect_box(center, solid.half_extents()),
    };
    body.children
        .iter()
        .filter(|child| child.visible)
        .filter_map(|child| ray_hit_at(child, ray, center))
        .chain(own)
        .min_by(f32::total_cmp)
}

/// Nearest visible body struck by `ray`; earlier bodies win ties
pub fn pick<'a>(bodies: impl IntoIterator<Item = &'a Body>, ray: &Ray) -> Option<ObjectId> {
    let mut best: Option<(f32, ObjectId)> = None;
    for body in bodies.into_iter().filter(|b| b.visible) {
        if let Some(t) = ray_hit(body, ray) {
            if best.is_none_or(|(best_t, _)| t < best_t) {
                best = Some((t, body.id()));
            }
        }
    }
    best.map(|(_, id)| id)
}
