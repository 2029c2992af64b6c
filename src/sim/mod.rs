//! Deterministic simulation module
//!
//! Both engines are pure state-transition machines over in-memory body sets:
//! - Explicit `step(dt)` instead of a host frame callback
//! - Seeded RNG only
//! - Stable body ordering (bodies are never reordered)
//! - No rendering or platform dependencies

pub mod body;
pub mod bounce;
pub mod field;
pub mod math;
pub mod raster;

pub use body::{Arena, Body, Particle, Rgba};
pub use bounce::{BounceSim, Phase, SessionEvent};
pub use field::ParticleField;
pub use raster::PixelBuffer;
