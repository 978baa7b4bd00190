//! Scene object model
//!
//! Every object is a [`Body`]: a positioned, resettable node with an optional
//! bounding shape. Capabilities are layered on as data instead of subtypes:
//! - [`Motion`] makes a body movable (velocity, mass, freeze)
//! - [`RigidControl`] makes a movable body collision-authoritative and
//!   optionally input-driven
//!
//! Defaults (position, visibility, velocity) are captured when the body is
//! registered with the scene, so initial transforms must be set before that.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::input::{ControlMode, InputSnapshot, Keys};
use crate::consts::DEFAULT_CONTROL_SPEED;
use crate::error::{FrameError, Result};

/// Stable identifier assigned at scene registration
pub type ObjectId = u32;

/// Which collision routines may act on a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    None,
    Circle,
    Rectangle,
}

/// Bounding volume used for collision and picking
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BoundingShape {
    /// Participates in no collision test
    #[default]
    None,
    /// Vertical cylinder (circle on the XZ plane, `radius` tall either way)
    Circle { radius: f32 },
    /// Axis-aligned box centered on the body
    Rectangle { width: f32, height: f32, depth: f32 },
}

impl BoundingShape {
    pub fn circle(radius: f32) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(FrameError::InvalidShape(format!(
                "circle radius must be positive, got {radius}"
            )));
        }
        Ok(Self::Circle { radius })
    }

    pub fn rectangle(width: f32, height: f32, depth: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v >= 0.0;
        if !(valid(width) && valid(height) && valid(depth)) {
            return Err(FrameError::InvalidShape(format!(
                "rectangle extents must be non-negative, got {width}x{height}x{depth}"
            )));
        }
        Ok(Self::Rectangle { width, height, depth })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::None => ShapeKind::None,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
        }
    }

    #[inline]
    pub fn is_circle(&self) -> bool {
        matches!(self, Self::Circle { .. })
    }

    #[inline]
    pub fn is_rectangle(&self) -> bool {
        matches!(self, Self::Rectangle { .. })
    }

    pub fn radius(&self) -> Option<f32> {
        match *self {
            Self::Circle { radius } => Some(radius),
            _ => None,
        }
    }

    /// Vertical half-extent (radius for circles, height/2 for rectangles)
    pub fn half_height(&self) -> f32 {
        match *self {
            Self::None => 0.0,
            Self::Circle { radius } => radius,
            Self::Rectangle { height, .. } => height / 2.0,
        }
    }

    /// Half-extents on the ground plane (x, z)
    pub fn half_footprint(&self) -> Vec2 {
        match *self {
            Self::None => Vec2::ZERO,
            Self::Circle { radius } => Vec2::splat(radius),
            Self::Rectangle { width, depth, .. } => Vec2::new(width / 2.0, depth / 2.0),
        }
    }
}

/// Visible mesh of a body, independent of its collision bound
///
/// Picking tests this when set, so a body can be clickable without
/// colliding. Flat variants lie on the XZ plane through the body's center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Geometry {
    #[default]
    None,
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Cone { radius: f32, height: f32 },
    Torus { radius: f32, tube: f32 },
    /// Flat disc
    Circle { radius: f32 },
    /// Flat rectangle
    Plane { width: f32, depth: f32 },
}

impl Geometry {
    /// Half-extents of the axis-aligned box enclosing the mesh
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::None => Vec3::ZERO,
            Self::Box { width, height, depth } => Vec3::new(width, height, depth) / 2.0,
            Self::Sphere { radius } => Vec3::splat(radius),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                let r = radius_top.max(radius_bottom);
                Vec3::new(r, height / 2.0, r)
            }
            Self::Cone { radius, height } => Vec3::new(radius, height / 2.0, radius),
            Self::Torus { radius, tube } => Vec3::new(radius + tube, tube, radius + tube),
            Self::Circle { radius } => Vec3::new(radius, 0.0, radius),
            Self::Plane { width, depth } => Vec3::new(width / 2.0, 0.0, depth / 2.0),
        }
    }
}

fn check_extents(what: &str, extents: &[f32]) -> Result<()> {
    if extents.iter().all(|v| v.is_finite() && *v >= 0.0) {
        Ok(())
    } else {
        Err(FrameError::InvalidShape(format!(
            "{what} extents must be non-negative, got {extents:?}"
        )))
    }
}

/// Opaque drawing hints for the host renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// 0xRRGGBB
    pub color: u32,
    /// Texture to map onto the body, if any
    pub texture: Option<String>,
    /// Uniform scale applied to the rendered mesh
    pub scale: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            texture: None,
            scale: 1.0,
        }
    }
}

/// Velocity-driven kinematics
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub velocity: Vec3,
    /// Position before the current frame's integration step
    previous_position: Vec3,
    default_velocity: Vec3,
    mass: f32,
    /// Simulation time at which a freeze ends
    frozen_until: Option<f64>,
}

impl Motion {
    pub fn new(mass: f32) -> Result<Self> {
        validate_mass(mass)?;
        Ok(Self {
            velocity: Vec3::ZERO,
            previous_position: Vec3::ZERO,
            default_velocity: Vec3::ZERO,
            mass,
            frozen_until: None,
        })
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        validate_mass(mass)?;
        self.mass = mass;
        Ok(())
    }

    #[inline]
    pub fn previous_position(&self) -> Vec3 {
        self.previous_position
    }

    #[inline]
    pub fn default_velocity(&self) -> Vec3 {
        self.default_velocity
    }

    /// Suspend integration for `seconds` of simulation time.
    ///
    /// Overlapping freezes extend each other: the body stays frozen until
    /// the latest requested expiry.
    pub fn freeze(&mut self, seconds: f32, now: f64) {
        let until = now + seconds.max(0.0) as f64;
        self.frozen_until = Some(match self.frozen_until {
            Some(current) => current.max(until),
            None => until,
        });
    }

    pub fn is_frozen(&self, now: f64) -> bool {
        self.frozen_until.is_some_and(|until| now < until)
    }

    /// Drop an expired freeze; returns whether the body is still frozen
    fn thaw(&mut self, now: f64) -> bool {
        if self.is_frozen(now) {
            return true;
        }
        self.frozen_until = None;
        false
    }

    pub fn reset_velocity(&mut self) {
        self.velocity = self.default_velocity;
    }
}

fn validate_mass(mass: f32) -> Result<()> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(FrameError::InvalidMass(mass))
    }
}

/// World-space box a rigid body's center is kept inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovableArea {
    /// Largest z
    pub front: f32,
    /// Smallest z
    pub back: f32,
    /// Smallest x
    pub left: f32,
    /// Largest x
    pub right: f32,
}

impl MovableArea {
    /// Clamp a position into the area (x/z only)
    pub fn clamp(&self, mut position: Vec3) -> Vec3 {
        if position.x > self.right {
            position.x = self.right;
        }
        if position.x < self.left {
            position.x = self.left;
        }
        if position.z > self.front {
            position.z = self.front;
        }
        if position.z < self.back {
            position.z = self.back;
        }
        position
    }
}

/// Collision authority plus optional direct control
#[derive(Debug, Clone, PartialEq)]
pub struct RigidControl {
    pub mode: ControlMode,
    /// Keyboard step per tick
    pub speed: f32,
    area: Option<MovableArea>,
}

impl Default for RigidControl {
    fn default() -> Self {
        Self {
            mode: ControlMode::empty(),
            speed: DEFAULT_CONTROL_SPEED,
            area: None,
        }
    }
}

impl RigidControl {
    pub fn area(&self) -> Option<MovableArea> {
        self.area
    }
}

/// What a driven body needs to read from the frame
#[derive(Debug, Clone, Copy)]
pub struct ControlInput<'a> {
    pub input: &'a InputSnapshot,
    pub camera: &'a Camera,
    /// Plane the pointer is projected onto
    pub ground_height: f32,
}

/// A positioned scene node with optional capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    id: ObjectId,
    pub position: Vec3,
    default_position: Vec3,
    pub visible: bool,
    default_visible: bool,
    shape: BoundingShape,
    geometry: Geometry,
    motion: Option<Motion>,
    rigid: Option<RigidControl>,
    pub appearance: Appearance,
    /// Sub-bodies positioned relative to this one (compound shapes)
    pub children: Vec<Body>,
}

impl Default for Body {
    fn default() -> Self {
        Self::fixed()
    }
}

impl Body {
    /// A body that never moves on its own
    pub fn fixed() -> Self {
        Self {
            id: 0,
            position: Vec3::ZERO,
            default_position: Vec3::ZERO,
            visible: true,
            default_visible: true,
            shape: BoundingShape::None,
            geometry: Geometry::None,
            motion: None,
            rigid: None,
            appearance: Appearance::default(),
            children: Vec::new(),
        }
    }

    /// A velocity-driven body
    pub fn movable(mass: f32) -> Result<Self> {
        let mut body = Self::fixed();
        body.motion = Some(Motion::new(mass)?);
        Ok(body)
    }

    /// A movable body that displaces others but is never displaced itself
    pub fn rigid(mass: f32) -> Result<Self> {
        let mut body = Self::movable(mass)?;
        body.rigid = Some(RigidControl::default());
        Ok(body)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Initial velocity (ignored with a warning on bodies without motion)
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        match self.motion.as_mut() {
            Some(motion) => motion.velocity = velocity,
            None => log::warn!("with_velocity on a body without motion is ignored"),
        }
        self
    }

    pub fn with_shape(mut self, shape: BoundingShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_circle(self, radius: f32) -> Result<Self> {
        Ok(self.with_shape(BoundingShape::circle(radius)?))
    }

    pub fn with_rectangle(self, width: f32, height: f32, depth: f32) -> Result<Self> {
        Ok(self.with_shape(BoundingShape::rectangle(width, height, depth)?))
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Box geometry, bounded by a rectangle of the same size
    pub fn with_box(self, width: f32, height: f32, depth: f32) -> Result<Self> {
        Ok(self
            .with_rectangle(width, height, depth)?
            .with_geometry(Geometry::Box { width, height, depth }))
    }

    /// Sphere geometry, bounded by a circle of the same radius
    pub fn with_sphere(self, radius: f32) -> Result<Self> {
        Ok(self.with_circle(radius)?.with_geometry(Geometry::Sphere { radius }))
    }

    /// Cylinder geometry, bounded by a circle of the larger cap radius
    pub fn with_cylinder(self, radius_top: f32, radius_bottom: f32, height: f32) -> Result<Self> {
        check_extents("cylinder", &[radius_top, radius_bottom, height])?;
        Ok(self
            .with_circle(radius_top.max(radius_bottom))?
            .with_geometry(Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
            }))
    }

    /// Cone geometry; leaves the collision bound alone
    pub fn with_cone(self, radius: f32, height: f32) -> Result<Self> {
        check_extents("cone", &[radius, height])?;
        Ok(self.with_geometry(Geometry::Cone { radius, height }))
    }

    /// Torus geometry; leaves the collision bound alone
    pub fn with_torus(self, radius: f32, tube: f32) -> Result<Self> {
        check_extents("torus", &[radius, tube])?;
        Ok(self.with_geometry(Geometry::Torus { radius, tube }))
    }

    /// Flat disc geometry; leaves the collision bound alone
    pub fn with_disc(self, radius: f32) -> Result<Self> {
        check_extents("disc", &[radius])?;
        Ok(self.with_geometry(Geometry::Circle { radius }))
    }

    /// Flat rectangle geometry; leaves the collision bound alone
    pub fn with_plane(self, width: f32, depth: f32) -> Result<Self> {
        check_extents("plane", &[width, depth])?;
        Ok(self.with_geometry(Geometry::Plane { width, depth }))
    }

    pub fn with_child(mut self, child: Body) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.set_color(color);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    // --- Shape ---

    #[inline]
    pub fn shape(&self) -> BoundingShape {
        self.shape
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    #[inline]
    pub fn is_circle(&self) -> bool {
        self.shape.is_circle()
    }

    #[inline]
    pub fn is_rectangle(&self) -> bool {
        self.shape.is_rectangle()
    }

    /// Make this a circle bound (clears any rectangle extents)
    pub fn set_bounding_circle(&mut self, radius: f32) -> Result<()> {
        self.shape = BoundingShape::circle(radius)?;
        Ok(())
    }

    /// Make this a rectangle bound (clears any radius)
    pub fn set_bounding_rectangle(&mut self, width: f32, height: f32, depth: f32) -> Result<()> {
        self.shape = BoundingShape::rectangle(width, height, depth)?;
        Ok(())
    }

    // --- Capabilities ---

    #[inline]
    pub fn is_movable(&self) -> bool {
        self.motion.is_some()
    }

    #[inline]
    pub fn is_rigid(&self) -> bool {
        self.rigid.is_some()
    }

    pub fn motion(&self) -> Option<&Motion> {
        self.motion.as_ref()
    }

    pub fn motion_mut(&mut self) -> Option<&mut Motion> {
        self.motion.as_mut()
    }

    pub fn rigid_control(&self) -> Option<&RigidControl> {
        self.rigid.as_ref()
    }

    /// Velocity, zero for bodies without motion
    pub fn velocity(&self) -> Vec3 {
        self.motion.as_ref().map_or(Vec3::ZERO, |m| m.velocity)
    }

    pub fn is_frozen(&self, now: f64) -> bool {
        self.motion.as_ref().is_some_and(|m| m.is_frozen(now))
    }

    /// Freeze integration for `seconds` of simulation time (no-op without motion)
    pub fn freeze(&mut self, seconds: f32, now: f64) {
        if let Some(motion) = self.motion.as_mut() {
            motion.freeze(seconds, now);
        }
    }

    // --- Rigid control ---

    /// Follow the pointer projected onto the ground plane
    pub fn enable_pointer_control(&mut self) {
        if let Some(rigid) = self.rigid.as_mut() {
            rigid.mode |= ControlMode::POINTER;
        }
    }

    /// Step along x/z by `speed` per tick while direction keys are held
    pub fn enable_keyboard_control(&mut self, speed: f32) {
        if let Some(rigid) = self.rigid.as_mut() {
            rigid.mode |= ControlMode::KEYBOARD;
            rigid.speed = speed;
        }
    }

    /// Keep the body's bounds inside the given play area.
    ///
    /// The area is shrunk by the body's own half-extent (or radius), so the
    /// clamp applies to the center. Bodies without a shape are not clamped.
    pub fn set_movable_area(&mut self, front: f32, back: f32, left: f32, right: f32) {
        let half = self.shape.half_footprint();
        let area = match self.shape {
            BoundingShape::None => None,
            _ => Some(MovableArea {
                front: front - half.y,
                back: back + half.y,
                left: left + half.x,
                right: right - half.x,
            }),
        };
        if let Some(rigid) = self.rigid.as_mut() {
            rigid.area = area;
        }
    }

    // --- Appearance ---

    /// Set colour on this body and all of its children
    pub fn set_color(&mut self, color: u32) {
        self.appearance.color = color;
        for child in &mut self.children {
            child.set_color(color);
        }
    }

    // --- Defaults / reset ---

    #[inline]
    pub fn default_position(&self) -> Vec3 {
        self.default_position
    }

    #[inline]
    pub fn default_visible(&self) -> bool {
        self.default_visible
    }

    /// Capture the current state as the reset target (called at registration)
    pub(crate) fn snapshot_defaults(&mut self) {
        self.default_position = self.position;
        self.default_visible = self.visible;
        if let Some(motion) = self.motion.as_mut() {
            motion.previous_position = self.position;
            motion.default_velocity = motion.velocity;
        }
        for child in &mut self.children {
            child.snapshot_defaults();
        }
    }

    pub fn reset_position(&mut self) {
        self.position = self.default_position;
    }

    pub fn reset_velocity(&mut self) {
        if let Some(motion) = self.motion.as_mut() {
            motion.reset_velocity();
        }
    }

    /// Restore position, visibility and velocity to their registered defaults
    pub fn reset(&mut self) {
        self.reset_position();
        self.visible = self.default_visible;
        if let Some(motion) = self.motion.as_mut() {
            motion.reset_velocity();
            motion.previous_position = self.position;
            motion.frozen_until = None;
        }
        for child in &mut self.children {
            child.reset();
        }
    }

    // --- Kinematics ---

    /// Start this frame's motion step.
    ///
    /// Returns false (and does nothing) for bodies without motion or while
    /// frozen. Otherwise snapshots the previous position and moves the body:
    /// velocity integration for soft bodies, direct control for rigid ones.
    pub fn begin_step(&mut self, dt: f32, now: f64, control: &ControlInput<'_>) -> bool {
        let position = self.position;
        let drive = self.rigid.as_ref().map(|rigid| (rigid.mode, rigid.speed));
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        if motion.thaw(now) {
            return false;
        }
        motion.previous_position = position;
        let velocity = motion.velocity;

        match drive {
            Some((mode, speed)) => self.apply_control(mode, speed, control),
            None => self.position += velocity * dt,
        }
        true
    }

    /// Finish this frame's motion step (movable-area clamp for rigid bodies)
    pub fn end_step(&mut self) {
        if let Some(area) = self.rigid.as_ref().and_then(|r| r.area) {
            self.position = area.clamp(self.position);
        }
    }

    fn apply_control(&mut self, mode: ControlMode, speed: f32, control: &ControlInput<'_>) {
        if mode.contains(ControlMode::POINTER) {
            if let Some(hit) = control
                .input
                .pointer
                .and_then(|ndc| control.camera.pointer_on_ground(ndc, control.ground_height))
            {
                self.position.x = hit.x;
                self.position.z = hit.z;
            }
        }
        if mode.contains(ControlMode::KEYBOARD) {
            let keys = control.input.keys;
            if keys.contains(Keys::RIGHT) {
                self.position.x += speed;
            }
            if keys.contains(Keys::LEFT) {
                self.position.x -= speed;
            }
            if keys.contains(Keys::UP) {
                self.position.z -= speed;
            }
            if keys.contains(Keys::DOWN) {
                self.position.z += speed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control<'a>(input: &'a InputSnapshot, camera: &'a Camera) -> ControlInput<'a> {
        ControlInput {
            input,
            camera,
            ground_height: 0.0,
        }
    }

    #[test]
    fn test_mass_must_be_positive() {
        assert!(matches!(Body::movable(0.0), Err(FrameError::InvalidMass(_))));
        assert!(matches!(Body::rigid(-2.0), Err(FrameError::InvalidMass(_))));
        assert!(Body::movable(f32::NAN).is_err());

        let mut body = Body::movable(1.0).unwrap();
        assert!(body.motion_mut().unwrap().set_mass(0.0).is_err());
        assert_eq!(body.motion().unwrap().mass(), 1.0);
    }

    #[test]
    fn test_shapes_are_mutually_exclusive() {
        let mut body = Body::fixed().with_circle(3.0).unwrap();
        assert!(body.is_circle());
        body.set_bounding_rectangle(2.0, 4.0, 6.0).unwrap();
        assert!(body.is_rectangle());
        assert!(!body.is_circle());
        assert_eq!(body.shape().radius(), None);
        assert_eq!(body.shape().half_height(), 2.0);

        assert!(body.set_bounding_circle(-1.0).is_err());
        // Failed setter leaves the previous shape alone
        assert!(body.is_rectangle());
    }

    #[test]
    fn test_cylinder_uses_larger_radius() {
        let body = Body::fixed().with_cylinder(2.0, 5.0, 8.0).unwrap();
        assert_eq!(body.shape().radius(), Some(5.0));
        assert_eq!(body.geometry().half_extents(), Vec3::new(5.0, 4.0, 5.0));
    }

    #[test]
    fn test_flat_geometry_has_no_bound() {
        let body = Body::movable(1.0).unwrap().with_plane(20.0, 10.0).unwrap();
        assert_eq!(body.shape(), BoundingShape::None);
        assert_eq!(body.geometry(), Geometry::Plane { width: 20.0, depth: 10.0 });
        assert!(Body::fixed().with_torus(-1.0, 1.0).is_err());

        // A later collision bound keeps the mesh
        let body = Body::fixed().with_disc(3.0).unwrap().with_rectangle(1.0, 1.0, 1.0).unwrap();
        assert_eq!(body.geometry(), Geometry::Circle { radius: 3.0 });
        assert!(body.is_rectangle());
    }

    #[test]
    fn test_soft_integration_tracks_previous_position() {
        let mut body = Body::movable(1.0)
            .unwrap()
            .with_position(Vec3::new(1.0, 0.0, 0.0))
            .with_velocity(Vec3::new(10.0, 0.0, -5.0));
        body.snapshot_defaults();

        let input = InputSnapshot::default();
        let camera = Camera::default();
        assert!(body.begin_step(0.5, 0.0, &control(&input, &camera)));
        assert_eq!(body.motion().unwrap().previous_position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(body.position, Vec3::new(6.0, 0.0, -2.5));
    }

    #[test]
    fn test_frozen_body_does_not_integrate() {
        let mut body = Body::movable(1.0).unwrap().with_velocity(Vec3::X);
        body.snapshot_defaults();
        body.freeze(1.0, 0.0);

        let input = InputSnapshot::default();
        let camera = Camera::default();
        assert!(!body.begin_step(0.1, 0.5, &control(&input, &camera)));
        assert_eq!(body.position, Vec3::ZERO);

        // Expired at t = 1.0
        assert!(body.begin_step(0.1, 1.0, &control(&input, &camera)));
        assert!(!body.is_frozen(1.0));
    }

    #[test]
    fn test_overlapping_freezes_extend() {
        let mut motion = Motion::new(1.0).unwrap();
        motion.freeze(5.0, 0.0);
        motion.freeze(1.0, 0.5);
        assert!(motion.is_frozen(3.0));
        assert!(!motion.is_frozen(5.0));
    }

    #[test]
    fn test_keyboard_control_and_area_clamp() {
        let mut paddle = Body::rigid(1.0)
            .unwrap()
            .with_circle(2.0)
            .unwrap()
            .with_position(Vec3::new(9.0, 0.0, 0.0));
        paddle.enable_keyboard_control(3.0);
        paddle.set_movable_area(10.0, -10.0, -10.0, 10.0);
        paddle.snapshot_defaults();

        let input = InputSnapshot::with_keys(Keys::RIGHT | Keys::UP);
        let camera = Camera::default();
        assert!(paddle.begin_step(1.0 / 60.0, 0.0, &control(&input, &camera)));
        assert_eq!(paddle.position, Vec3::new(12.0, 0.0, -3.0));
        paddle.end_step();
        // Right edge shrunk by the radius
        assert_eq!(paddle.position, Vec3::new(8.0, 0.0, -3.0));
    }

    #[test]
    fn test_pointer_control_sets_ground_position() {
        let mut paddle = Body::rigid(1.0)
            .unwrap()
            .with_position(Vec3::new(0.0, 0.0, 30.0));
        paddle.enable_pointer_control();
        paddle.snapshot_defaults();

        let input = InputSnapshot::pointer_at(Vec2::ZERO);
        let camera = Camera::default();
        assert!(paddle.begin_step(1.0 / 60.0, 0.0, &control(&input, &camera)));
        assert!(paddle.position.x.abs() < 1.0e-2);
        assert!(paddle.position.z.abs() < 1.0e-2);
        // Rigid bodies are not velocity-integrated
        assert_eq!(paddle.motion().unwrap().previous_position(), Vec3::new(0.0, 0.0, 30.0));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut body = Body::movable(2.0)
            .unwrap()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_velocity(Vec3::new(4.0, 0.0, 0.0))
            .with_child(Body::fixed().with_position(Vec3::X));
        body.snapshot_defaults();

        body.position = Vec3::splat(50.0);
        body.visible = false;
        body.motion_mut().unwrap().velocity = Vec3::ZERO;
        body.children[0].position = Vec3::splat(-4.0);
        body.freeze(10.0, 0.0);

        body.reset();
        let once = body.clone();
        body.reset();
        assert_eq!(body, once);
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(body.visible);
        assert_eq!(body.velocity(), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(body.children[0].position, Vec3::X);
        assert!(!body.is_frozen(0.0));
    }

    #[test]
    fn test_set_color_propagates_to_children() {
        let body = Body::fixed()
            .with_child(Body::fixed())
            .with_child(Body::fixed().with_child(Body::fixed()))
            .with_color(0x00ff00);
        assert_eq!(body.children[1].children[0].appearance.color, 0x00ff00);
    }
}
