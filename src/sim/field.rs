//! Particle field disperser
//!
//! A large particle set sampled from a rasterized logo. While a drag
//! gesture is active, particles near the pointer get pulled toward it;
//! otherwise each particle springs back to its sampled origin and snaps
//! exactly home once close enough, so a settled field is fully at rest.

use glam::Vec2;

use super::body::Particle;
use super::raster::PixelBuffer;
use crate::config::FieldConfig;
use crate::consts::FRAME_DT;

pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    pointer: Vec2,
    dragging: bool,
}

impl ParticleField {
    /// Sample a field from a raster. One-time pass; on host resize the
    /// buffer is re-rasterized at the new scale and a new field built.
    pub fn from_buffer(buffer: &PixelBuffer, config: FieldConfig) -> Self {
        let particles = buffer.sample(config.stride);
        log::debug!(
            "sampled {} particles from {}x{} raster (stride {})",
            particles.len(),
            buffer.width(),
            buffer.height(),
            config.stride.max(1)
        );
        Self {
            config,
            particles,
            pointer: Vec2::ZERO,
            dragging: false,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether every particle is exactly at rest on its origin. Hosts can
    /// skip redraws for a settled field.
    pub fn is_settled(&self) -> bool {
        !self.dragging
            && self
                .particles
                .iter()
                .all(|p| p.pos == p.origin && p.vel == Vec2::ZERO)
    }

    pub fn drag_start(&mut self, pointer: Vec2) {
        self.dragging = true;
        self.pointer = pointer;
    }

    /// Pointer moved while the drag is held; ignored otherwise
    pub fn drag_move(&mut self, pointer: Vec2) {
        if self.dragging {
            self.pointer = pointer;
        }
    }

    pub fn drag_end(&mut self) {
        self.dragging = false;
    }

    /// Advance one discrete step; see the bounce engine for the `dt`
    /// scaling convention.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let scale = dt / FRAME_DT;
        let damping = if scale == 1.0 {
            self.config.spring_damping
        } else {
            self.config.spring_damping.powf(scale)
        };
        let radius_sq = self.config.interaction_radius * self.config.interaction_radius;

        for particle in &mut self.particles {
            if self.dragging {
                let delta = self.pointer - particle.pos;
                let dist_sq = delta.length_squared();
                if dist_sq < radius_sq {
                    // Unclamped on purpose: particles right under the
                    // pointer take a strong pull
                    let force = (radius_sq - dist_sq) / radius_sq;
                    particle.vel += delta * (force * self.config.drag_accel * scale);
                }
            } else {
                let delta = particle.origin - particle.pos;
                if delta.length() > self.config.settle_epsilon {
                    particle.vel += delta * (self.config.spring * scale);
                    particle.vel *= damping;
                } else {
                    // Snap home instead of oscillating forever under
                    // the epsilon
                    particle.pos = particle.origin;
                    particle.vel = Vec2::ZERO;
                }
            }

            particle.pos += particle.vel * scale;
        }
    }
}
