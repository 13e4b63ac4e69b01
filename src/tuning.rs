//! Data-driven game constants
//!
//! Defaults are the shipped game balance (see `consts`). A JSON document can
//! override any subset of the fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when loading or validating tuning values.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("sensor_breakpoints must be non-zero")]
    ZeroBreakpoints,
    #[error("sensor_breakpoints must be at most {max}, got {value}")]
    TooManyBreakpoints { value: usize, max: usize },
}

/// Tunable game constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Render/physics ticks per second
    pub frames_per_second: f32,
    /// Brain ticks per second
    pub brain_ticks_per_second: f32,

    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub car_width: f32,
    pub car_height: f32,

    // === Steering and rate limits ===
    /// Brain headings are clamped to +/- this many degrees
    pub max_angle_threshold: f32,
    /// Maximum heading change per tick (degrees, before speed scaling)
    pub max_angle_change_per_tick: f32,
    /// Maximum speed change per tick
    pub max_speed_change_per_tick: f32,
    /// Displacement per tick is `speed * |speed| / speed_ratio`
    pub speed_ratio: f32,
    /// Heading change is scaled by `speed / angle_to_speed_ratio`
    pub angle_to_speed_ratio: f32,
    /// Rotation pivot as a fraction of car width/height
    pub pivot_x_ratio: f32,
    pub pivot_y_ratio: f32,

    // === Sensors ===
    /// Sensor reach in pixels
    pub sensor_range: f32,
    /// Samples per sensor
    pub sensor_breakpoints: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            frames_per_second: FRAMES_PER_SECOND,
            brain_ticks_per_second: BRAIN_TICKS_PER_SECOND,

            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,

            max_angle_threshold: MAX_ANGLE_THRESHOLD,
            max_angle_change_per_tick: MAX_ANGLE_CHANGE_PER_TICK,
            max_speed_change_per_tick: MAX_SPEED_CHANGE_PER_TICK,
            speed_ratio: SPEED_RATIO,
            angle_to_speed_ratio: ANGLE_TO_SPEED_RATIO,
            pivot_x_ratio: PIVOT_X_RATIO,
            pivot_y_ratio: PIVOT_Y_RATIO,

            sensor_range: SENSOR_RANGE,
            sensor_breakpoints: SENSOR_BREAKPOINTS,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse a tuning document, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Self::default()
            }
        }
    }

    /// Reject values the kinematics and sensors cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        let all = [
            ("frames_per_second", self.frames_per_second),
            ("brain_ticks_per_second", self.brain_ticks_per_second),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("max_angle_threshold", self.max_angle_threshold),
            ("max_angle_change_per_tick", self.max_angle_change_per_tick),
            ("max_speed_change_per_tick", self.max_speed_change_per_tick),
            ("speed_ratio", self.speed_ratio),
            ("angle_to_speed_ratio", self.angle_to_speed_ratio),
            ("pivot_x_ratio", self.pivot_x_ratio),
            ("pivot_y_ratio", self.pivot_y_ratio),
            ("sensor_range", self.sensor_range),
        ];
        for (field, value) in all {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field, value });
            }
        }

        let positive = [
            ("frames_per_second", self.frames_per_second),
            ("brain_ticks_per_second", self.brain_ticks_per_second),
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("speed_ratio", self.speed_ratio),
            ("angle_to_speed_ratio", self.angle_to_speed_ratio),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("max_angle_threshold", self.max_angle_threshold),
            ("max_angle_change_per_tick", self.max_angle_change_per_tick),
            ("max_speed_change_per_tick", self.max_speed_change_per_tick),
            ("sensor_range", self.sensor_range),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        if self.sensor_breakpoints == 0 {
            return Err(TuningError::ZeroBreakpoints);
        }
        if self.sensor_breakpoints > MAX_SENSOR_BREAKPOINTS {
            return Err(TuningError::TooManyBreakpoints {
                value: self.sensor_breakpoints,
                max: MAX_SENSOR_BREAKPOINTS,
            });
        }

        Ok(())
    }

    /// Seconds between render ticks
    pub fn render_period(&self) -> f64 {
        1.0 / f64::from(self.frames_per_second)
    }

    /// Seconds between brain ticks
    pub fn brain_period(&self) -> f64 {
        1.0 / f64::from(self.brain_ticks_per_second)
    }
}
