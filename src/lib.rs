//! Crush - a 2D rigid-body sandbox where colliding characters crush the smaller one
//!
//! Core modules:
//! - `physics`: Rigid-body world seam and the rapier2d backend
//! - `sim`: Character registry, deferred deletion, collision resolution
//! - `pacing`: Fixed-rate frame pacing with sleep correction
//! - `platform`: Input, rendering and camera seams for frontends
//! - `app`: The frame loop tying everything together

pub mod app;
pub mod error;
pub mod pacing;
pub mod physics;
pub mod platform;
pub mod settings;
pub mod sim;

pub use app::App;
pub use error::SimError;
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Target frame rate and fixed simulation rate (Hz)
    pub const TARGET_FPS: f64 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Solver iterations per step
    pub const VELOCITY_ITERATIONS: usize = 8;
    pub const POSITION_ITERATIONS: usize = 3;

    /// World gravity (m/s²)
    pub const GRAVITY: [f32; 2] = [0.0, -10.0];

    /// Character size to box half-extent divisor
    pub const SIZE_PER_HALF_EXTENT: f32 = 500.0;
    /// Character material
    pub const CHARACTER_DENSITY: f32 = 20.0;
    pub const CHARACTER_FRICTION: f32 = 0.1;

    /// Weight of the previous adjustment in the sleep low-pass filter
    pub const SLEEP_ADJUST_DECAY: f64 = 0.9;
}
