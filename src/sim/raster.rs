//! Rasterized image sampling for the particle field
//!
//! The host rasterizes its logo once (SVG to canvas on the site) and hands
//! the pixel buffer over; sampling is a one-time O(area) pass.

use glam::Vec2;

use super::body::{Particle, Rgba};

/// A width x height RGBA buffer, row-major, 4 bytes per pixel
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw pixel data. Returns `None` when the byte length does not
    /// match the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = ((y * self.width + x) * 4) as usize;
        Rgba::new(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// One particle per sampled pixel with non-zero alpha, resting at the
    /// pixel's coordinates. `stride` skips pixels in both axes for sparser,
    /// cheaper fields; an empty or fully transparent buffer yields an empty
    /// set, which is an inert simulation rather than an error.
    pub fn sample(&self, stride: u32) -> Vec<Particle> {
        let stride = stride.max(1);
        let mut particles = Vec::new();
        let mut y = 0;
        while y < self.height {
            let mut x = 0;
            while x < self.width {
                let color = self.pixel(x, y);
                if color.a > 0 {
                    particles.push(Particle::at_rest(Vec2::new(x as f32, y as f32), color));
                }
                x += stride;
            }
            y += stride;
        }
        particles
    }
}
