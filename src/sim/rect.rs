//! Rectangle footprint geometry
//!
//! A rectangle bound seen from above is an axis-aligned box on the XZ plane.
//! Space around it splits into a 3x3 grid (north = +z, east = +x):
//!
//! ```text
//!   NW | N | NE
//!  ----+---+----
//!   W  | . | E
//!  ----+---+----
//!   SW | S | SE
//! ```
//!
//! Corners contact at the rectangle's corner, edges at the circle center's
//! projection onto that edge, and the interior has no contact feature.

use glam::{Vec2, Vec3};

use crate::xz;

/// Where a point sits relative to a rectangle footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NorthWest,
    North,
    NorthEast,
    West,
    Interior,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Region {
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Region::NorthWest | Region::NorthEast | Region::SouthWest | Region::SouthEast
        )
    }
}

/// Axis-aligned footprint on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub left: f32,
    pub right: f32,
    /// Largest z
    pub top: f32,
    /// Smallest z
    pub bottom: f32,
}

impl Footprint {
    /// Footprint of a `width` x `depth` rectangle centered at `center`
    pub fn new(center: Vec3, width: f32, depth: f32) -> Self {
        Self {
            left: center.x - width / 2.0,
            right: center.x + width / 2.0,
            top: center.z + depth / 2.0,
            bottom: center.z - depth / 2.0,
        }
    }

    /// Classify a world position into one of the nine regions
    pub fn classify(&self, position: Vec3) -> Region {
        let p = xz(position);
        if p.y >= self.top {
            if p.x < self.left {
                Region::NorthWest
            } else if p.x < self.right {
                Region::North
            } else {
                Region::NorthEast
            }
        } else if p.y > self.bottom {
            if p.x < self.left {
                Region::West
            } else if p.x < self.right {
                Region::Interior
            } else {
                Region::East
            }
        } else if p.x < self.left {
            Region::SouthWest
        } else if p.x < self.right {
            Region::South
        } else {
            Region::SouthEast
        }
    }

    /// Nearest contact feature (x, z) for a position, `None` inside
    pub fn contact_point(&self, position: Vec3) -> (Region, Option<Vec2>) {
        let region = self.classify(position);
        let p = xz(position);
        let point = match region {
            Region::NorthWest => Some(Vec2::new(self.left, self.top)),
            Region::North => Some(Vec2::new(p.x, self.top)),
            Region::NorthEast => Some(Vec2::new(self.right, self.top)),
            Region::West => Some(Vec2::new(self.left, p.y)),
            Region::Interior => None,
            Region::East => Some(Vec2::new(self.right, p.y)),
            Region::SouthWest => Some(Vec2::new(self.left, self.bottom)),
            Region::South => Some(Vec2::new(p.x, self.bottom)),
            Region::SouthEast => Some(Vec2::new(self.right, self.bottom)),
        };
        (region, point)
    }
}
