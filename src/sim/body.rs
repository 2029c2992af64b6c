//! Core data model shared by both effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangular bounds bodies and particles are constrained to.
///
/// Captured once from the host container; on resize the session is rebuilt
/// with fresh bounds rather than adjusted in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[inline]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether a circle lies fully inside the bounds
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x - radius >= 0.0
            && center.y - radius >= 0.0
            && center.x + radius <= self.width
            && center.y + radius <= self.height
    }
}

/// One moving disc (a rendered logo mark)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left anchor of the rendered element's box
    pub pos: Vec2,
    /// Units per frame; mutated by integration, impulses and repulsion
    pub vel: Vec2,
    /// Measured box, fixed at creation
    pub size: Vec2,
    /// Collision radius, a fraction of the width rather than the full box
    pub radius: f32,
}

impl Body {
    /// Create a body from its measured box. The radius covers the visible
    /// part of the mark, so it is a fraction of the width, floored to stay
    /// strictly positive for degenerate (zero-sized) elements.
    pub fn new(size: Vec2, radius_fraction: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
            radius: (size.x * radius_fraction).max(f32::EPSILON),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size * 0.5;
    }
}

/// RGBA color sampled from the source raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string for canvas fill styles
    pub fn css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

/// One sampled pixel of the dispersal field
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    /// Rest position; never changes after creation
    pub origin: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
}

impl Particle {
    pub fn at_rest(origin: Vec2, color: Rgba) -> Self {
        Self {
            pos: origin,
            origin,
            vel: Vec2::ZERO,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_radius_is_width_fraction() {
        let body = Body::new(Vec2::new(80.0, 60.0), 0.4);
        assert_eq!(body.radius, 32.0);
    }

    #[test]
    fn test_body_radius_positive_for_zero_size() {
        let body = Body::new(Vec2::ZERO, 0.4);
        assert!(body.radius > 0.0);
    }

    #[test]
    fn test_center_round_trip() {
        let mut body = Body::new(Vec2::new(40.0, 40.0), 0.4);
        body.set_center(Vec2::new(100.0, 50.0));
        assert_eq!(body.center(), Vec2::new(100.0, 50.0));
        assert_eq!(body.pos, Vec2::new(80.0, 30.0));
    }

    #[test]
    fn test_rgba_css() {
        assert_eq!(Rgba::new(255, 0, 10, 255).css(), "rgba(255, 0, 10, 1)");
        let half = Rgba::new(0, 0, 0, 51).css();
        assert_eq!(half, "rgba(0, 0, 0, 0.2)");
    }

    #[test]
    fn test_arena_contains_circle() {
        let arena = Arena::new(100.0, 100.0);
        assert!(arena.contains_circle(Vec2::new(50.0, 50.0), 10.0));
        assert!(!arena.contains_circle(Vec2::new(5.0, 50.0), 10.0));
    }
}
