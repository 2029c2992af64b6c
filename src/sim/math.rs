//! Shared vector/impulse math and boundary utilities
//!
//! Used identically by both engines. Everything here is circle-based; the
//! bounding-box variant of collision shape is just a radius of half the
//! width, so callers pick the shape by choosing the radius.

use glam::Vec2;

/// Unit vector from `b` toward `a`.
///
/// Returns `None` when the points coincide: normalizing a zero-length delta
/// would poison velocities with NaN, so degenerate contacts apply no force.
#[inline]
pub fn contact_normal(a: Vec2, b: Vec2) -> Option<Vec2> {
    let delta = a - b;
    let dist = delta.length();
    if dist > f32::EPSILON {
        Some(delta / dist)
    } else {
        None
    }
}

/// Relative velocity of `va` against `vb` projected on `normal`.
/// Negative means the two points are approaching.
#[inline]
pub fn normal_velocity(va: Vec2, vb: Vec2, normal: Vec2) -> f32 {
    (va - vb).dot(normal)
}

/// Impulse magnitude for two colliding unit-mass bodies.
///
/// The general elastic impulse is `2 * vn / (ma + mb)`; with equal unit
/// masses that collapses to the normal relative velocity itself, a full
/// exchange of the normal components.
#[inline]
pub fn equal_mass_impulse(vn: f32) -> f32 {
    vn
}

/// Wall components a circle crossed while being clamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub x: bool,
    pub y: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Clamp a circle into the rectangle `(0, 0)..extent`.
///
/// If the circle crosses a wall the center is repositioned so the circle is
/// tangent to that wall; the returned contact says which velocity components
/// the caller should negate for an elastic bounce.
pub fn clamp_circle(center: &mut Vec2, radius: f32, extent: Vec2) -> WallContact {
    let mut contact = WallContact::default();

    if center.x - radius < 0.0 {
        center.x = radius;
        contact.x = true;
    } else if center.x + radius > extent.x {
        center.x = extent.x - radius;
        contact.x = true;
    }

    if center.y - radius < 0.0 {
        center.y = radius;
        contact.y = true;
    } else if center.y + radius > extent.y {
        center.y = extent.y - radius;
        contact.y = true;
    }

    contact
}
