//! Tuning for both effects
//!
//! Values mirror the shipped site defaults. Both structs deserialize from
//! JSON with per-field fallback so a host can override a single knob.

use serde::{Deserialize, Serialize};

/// Tuning for the rigid-disc bounce simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    /// Pointer distance below which repulsion applies
    pub repel_threshold: f32,
    /// Cap on the repulsion impulse magnitude
    pub repel_max_force: f32,
    /// Multiplicative velocity damping per frame
    pub damping: f32,
    /// Collision radius as a fraction of the body's width
    pub radius_fraction: f32,
    /// Full range of the random per-axis scatter velocity
    pub scatter_speed: f32,
    /// Counted collisions needed to finish a run; 0 disables goal tracking
    /// and the session free-runs from construction
    pub goal: u32,
    /// Minimum time before the same pair can be counted again
    pub debounce_secs: f32,
    /// Delay between finishing and returning to idle
    pub reset_delay_secs: f32,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            repel_threshold: 200.0,
            repel_max_force: 10.0,
            damping: 0.98,
            radius_fraction: 0.4,
            scatter_speed: 10.0,
            goal: 100,
            debounce_secs: 0.1,
            reset_delay_secs: 5.0,
        }
    }
}

impl BounceConfig {
    /// A free-running config with no goal tracking
    pub fn free_running() -> Self {
        Self {
            goal: 0,
            ..Self::default()
        }
    }
}

/// Tuning for the particle field disperser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Pointer pull radius while dragging
    pub interaction_radius: f32,
    /// Acceleration scale of the drag pull
    pub drag_accel: f32,
    /// Spring constant pulling particles home
    pub spring: f32,
    /// Multiplicative velocity damping per frame while springing home
    pub spring_damping: f32,
    /// Distance from origin below which a particle snaps home
    pub settle_epsilon: f32,
    /// Sample every Nth pixel in both axes (density/performance trade-off)
    pub stride: u32,
    /// Rendered side length of one particle
    pub particle_size: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            interaction_radius: 75.0,
            drag_accel: 0.1,
            spring: 0.3,
            spring_damping: 0.3,
            settle_epsilon: 1.0,
            stride: 1,
            particle_size: 1.0,
        }
    }
}
