//! Perspective camera and ray casting
//!
//! Used for two things: projecting the pointer onto the ground plane for
//! pointer-driven rigid bodies, and picking the object under a click.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::settings::CameraSettings;

/// A half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the horizontal plane `y = height`, if the ray reaches it
    pub fn intersect_ground(&self, height: f32) -> Option<f32> {
        if self.direction.y.abs() < 1.0e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then_some(t)
    }

    /// Distance to the first hit on a sphere
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let near = -b - sqrt_disc;
        let far = -b + sqrt_disc;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin inside the sphere
            Some(0.0)
        } else {
            None
        }
    }

    /// Distance to the first hit on an axis-aligned box (slab test)
    pub fn intersect_box(&self, center: Vec3, half_extents: Vec3) -> Option<f32> {
        let min = center - half_extents;
        let max = center + half_extents;
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            if d.abs() < 1.0e-8 {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

/// Perspective camera looking at a fixed target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

impl Camera {
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            position: settings.position,
            target: settings.target,
            fov_degrees: settings.fov_degrees,
            aspect: settings.aspect,
            near: settings.near,
            far: settings.far,
        }
    }

    /// Update the aspect ratio after a viewport resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray from the camera through a point in normalized device coordinates
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(ndc.extend(-1.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }

    /// Where the pointer lands on the plane `y = height`
    pub fn pointer_on_ground(&self, ndc: Vec2, height: f32) -> Option<Vec3> {
        let ray = self.ray(ndc);
        ray.intersect_ground(height).map(|t| ray.at(t))
    }
}
