//! logofx - interactive logo physics effects
//!
//! Core modules:
//! - `sim`: deterministic simulation (rigid-disc bounce, particle dispersal)
//! - `render`: draw-call seam between the simulations and a host surface
//! - `config`: data-driven tuning
//! - `platform`: browser canvas/pointer adapter (wasm32 only)
//!
//! The simulations are pure state-transition engines: the host calls
//! `step(dt)` once per rendered frame and forwards pointer events through
//! explicit input methods. Rendering and scheduling stay outside the crate.

pub mod config;
pub mod platform;
pub mod render;
pub mod sim;

pub use config::{BounceConfig, FieldConfig};
pub use sim::{Arena, BounceSim, ParticleField, Phase, PixelBuffer, SessionEvent};

/// Timing constants
pub mod consts {
    /// Nominal frame duration the per-frame velocity units assume (60 Hz).
    /// `step(FRAME_DT)` reproduces the original per-frame behavior exactly;
    /// other timesteps scale displacement and damping to match.
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum catch-up steps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}
