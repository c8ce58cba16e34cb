//! Axis-aligned collision primitive
//!
//! Every entity in the side-scrolling games is a box. Overlap is strict on all
//! four half-planes, so boxes that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Center point (used by the flap game's pickup test)
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// True iff the areas of the two rectangles overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }
}

/// Strict AABB overlap test, symmetric in its arguments
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Anything with a bounding box
pub trait Bounded {
    fn bounds(&self) -> Rect;

    fn collides_with<T: Bounded + ?Sized>(&self, other: &T) -> bool {
        overlaps(&self.bounds(), &other.bounds())
    }
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}
