//! Draw-call seam between the simulations and a host surface
//!
//! The core never owns a canvas; it issues fill calls against whatever
//! [`Surface`] the host mounts (2D canvas on the site, a recorder in tests).

use glam::Vec2;

use crate::sim::{BounceSim, ParticleField, Rgba};

/// An addressable 2D drawing surface sized to the host container
pub trait Surface {
    /// Clear the whole surface
    fn clear(&mut self);
    /// Fill an axis-aligned rectangle anchored at its top-left corner
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba);
    /// Fill a circle around its center
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
}

/// Draw one frame of a bounce session: one disc per body
pub fn draw_bounce(sim: &BounceSim, color: Rgba, surface: &mut impl Surface) {
    surface.clear();
    for body in sim.bodies() {
        surface.fill_circle(body.center(), body.radius, color);
    }
}

/// Draw one frame of a dispersal field: one small square per particle,
/// carrying its sampled color
pub fn draw_field(field: &ParticleField, surface: &mut impl Surface) {
    surface.clear();
    let size = Vec2::splat(field.config().particle_size);
    for particle in field.particles() {
        surface.fill_rect(particle.pos, size, particle.color);
    }
}
