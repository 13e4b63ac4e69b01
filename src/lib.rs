//! Park It - a parking game driven by a scripted "car brain"
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, SAT collisions, sensors, car kinematics)
//! - `brain`: Data-in/data-out boundary to the player's car script
//! - `tuning`: Data-driven game constants
//! - `web`: Browser facade (wasm32 only)

pub mod brain;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use brain::{Brain, CarControls, Memory};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Render/physics ticks per second
    pub const FRAMES_PER_SECOND: f32 = 24.0;
    /// Brain (script) ticks per second
    pub const BRAIN_TICKS_PER_SECOND: f32 = 10.0;
    /// Maximum ticks run by a single scheduler advance to prevent spiral of death
    pub const MAX_TICKS_PER_ADVANCE: u32 = 8;
    /// Longest frame the scheduler will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 300.0;

    /// Car footprint
    pub const CAR_WIDTH: f32 = 200.0;
    pub const CAR_HEIGHT: f32 = 100.0;

    /// Steering envelope the brain's heading is clamped to (degrees)
    pub const MAX_ANGLE_THRESHOLD: f32 = 35.0;
    /// Rate limits (per render tick)
    pub const MAX_ANGLE_CHANGE_PER_TICK: f32 = 5.0;
    pub const MAX_SPEED_CHANGE_PER_TICK: f32 = 0.6;
    /// Commanded speed to displacement divisor (quadratic mapping)
    pub const SPEED_RATIO: f32 = 60.0;
    /// Turning rate divisor; turning is proportional to current speed
    pub const ANGLE_TO_SPEED_RATIO: f32 = 60.0;

    /// Rotation pivot as a fraction of the car footprint (front-axle biased)
    pub const PIVOT_X_RATIO: f32 = 0.25;
    pub const PIVOT_Y_RATIO: f32 = 0.5;

    /// Distance sensors
    pub const PIXELS_PER_METER: f32 = 10.0;
    pub const SENSOR_METERS_RANGE: f32 = 7.0;
    pub const SENSOR_RANGE: f32 = SENSOR_METERS_RANGE * PIXELS_PER_METER;
    pub const SENSOR_BREAKPOINTS: usize = 70;
    /// Upper bound accepted from tuning overrides
    pub const MAX_SENSOR_BREAKPOINTS: usize = 1000;
    pub const SENSORS_PER_CORNER: usize = 5;
    pub const SENSORS_QT: usize = 4 * SENSORS_PER_CORNER;
}

/// Convert degrees to radians
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

/// Clamp `value` to `[-limit, +limit]`
#[inline]
pub fn clamp_magnitude(value: f32, limit: f32) -> f32 {
    value.max(-limit).min(limit)
}
