//! Axis-aligned bounding boxes
//!
//! Screen coordinates: x grows right, y grows down, origin at the top-left
//! corner of the viewport.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Rectangle hanging above `anchor` (anchor = bottom-center)
    pub fn above(anchor: Vec2, size: Vec2) -> Self {
        Self::new(
            Vec2::new(anchor.x - size.x * 0.5, anchor.y - size.y),
            Vec2::new(anchor.x + size.x * 0.5, anchor.y),
        )
    }

    /// Rectangle standing below `anchor` (anchor = top-center)
    pub fn below(anchor: Vec2, size: Vec2) -> Self {
        Self::new(
            Vec2::new(anchor.x - size.x * 0.5, anchor.y),
            Vec2::new(anchor.x + size.x * 0.5, anchor.y + size.y),
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap; rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let crossing = Rect::new(Vec2::new(9.0, 9.0), Vec2::new(20.0, 20.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&crossing));
        assert!(crossing.overlaps(&a));
    }

    #[test]
    fn anchored_constructors() {
        let up = Rect::above(Vec2::new(100.0, 200.0), Vec2::new(80.0, 600.0));
        assert_eq!(up.min, Vec2::new(60.0, -400.0));
        assert_eq!(up.max, Vec2::new(140.0, 200.0));

        let down = Rect::below(Vec2::new(100.0, 350.0), Vec2::new(80.0, 600.0));
        assert_eq!(down.min, Vec2::new(60.0, 350.0));
        assert_eq!(down.max, Vec2::new(140.0, 950.0));

        let c = Rect::from_center(Vec2::new(5.0, 5.0), Vec2::new(4.0, 2.0));
        assert_eq!(c.width(), 4.0);
        assert_eq!(c.height(), 2.0);
        assert_eq!(c.center(), Vec2::new(5.0, 5.0));
        assert!(c.contains_point(Vec2::new(3.0, 4.0)));
    }
}
