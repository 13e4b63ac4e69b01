//! Game bodies: static rectangles and the steerable car
//!
//! A `Body` is a polygon plus the footprint it was built from. The `Car`
//! composes a body with its drive state, targets from the brain and its
//! sensor ring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::polygon::{Aabb, Polygon};
use super::sensor::{SensorArray, SensorMount, default_sensor_mounts};
use crate::tuning::Tuning;
use crate::{clamp_magnitude, degrees_to_radians};

/// A rectangular game object (obstacle, wall, goal area, or the car's shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub polygon: Polygon,
    pub width: f32,
    pub height: f32,
    /// Display color, carried for the renderer only
    #[serde(default)]
    pub color: String,
}

impl Body {
    /// Axis-aligned rectangle with its top-left corner at `(x, y)`
    pub fn rect(id: u32, x: f32, y: f32, width: f32, height: f32, color: impl Into<String>) -> Self {
        Self {
            id,
            polygon: Polygon::rect(Vec2::new(x, y), width, height),
            width,
            height,
            color: color.into(),
        }
    }

    /// World-space bounding box
    pub fn aabb(&self) -> Aabb {
        self.polygon.aabb()
    }

    /// Whether this body's bounding box lies fully inside `outer`'s
    pub fn is_inside(&self, outer: &Body) -> bool {
        outer.aabb().contains(&self.aabb())
    }
}

/// What the brain last asked for
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    /// Target heading in degrees, already clamped to the steering envelope
    pub heading: f32,
    pub speed: f32,
    pub parking_brake: bool,
}

/// Rate limits and ratios that shape the car's motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveLimits {
    pub max_angle_threshold: f32,
    pub max_heading_change_per_tick: f32,
    pub max_speed_change_per_tick: f32,
    pub speed_ratio: f32,
    pub angle_to_speed_ratio: f32,
    /// Rotation pivot as a fraction of width/height
    pub pivot_ratio: Vec2,
}

impl From<&Tuning> for DriveLimits {
    fn from(tuning: &Tuning) -> Self {
        Self {
            max_angle_threshold: tuning.max_angle_threshold,
            max_heading_change_per_tick: tuning.max_angle_change_per_tick,
            max_speed_change_per_tick: tuning.max_speed_change_per_tick,
            speed_ratio: tuning.speed_ratio,
            angle_to_speed_ratio: tuning.angle_to_speed_ratio,
            pivot_ratio: Vec2::new(tuning.pivot_x_ratio, tuning.pivot_y_ratio),
        }
    }
}

/// Sensor geometry for a car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub range: f32,
    pub breakpoints: usize,
    pub mounts: Vec<SensorMount>,
}

impl From<&Tuning> for SensorConfig {
    fn from(tuning: &Tuning) -> Self {
        Self {
            range: tuning.sensor_range,
            breakpoints: tuning.sensor_breakpoints,
            mounts: default_sensor_mounts(),
        }
    }
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub body: Body,
    /// Current heading (degrees)
    pub heading: f32,
    /// Current speed (negative is reverse)
    pub speed: f32,
    targets: Targets,
    limits: DriveLimits,
    sensor_config: SensorConfig,
    sensors: SensorArray,
}

impl Car {
    /// Car at rest, facing `heading` degrees, with the default sensor ring
    pub fn new(body: Body, heading: f32, tuning: &Tuning) -> Self {
        Self::with_config(body, heading, DriveLimits::from(tuning), SensorConfig::from(tuning))
    }

    pub fn with_config(
        mut body: Body,
        heading: f32,
        limits: DriveLimits,
        sensor_config: SensorConfig,
    ) -> Self {
        if heading != 0.0 {
            let pivot = Vec2::new(body.width, body.height) * limits.pivot_ratio;
            body.polygon.rotate_about(pivot, degrees_to_radians(heading));
        }

        let mut car = Self {
            body,
            heading,
            speed: 0.0,
            targets: Targets {
                heading,
                ..Default::default()
            },
            limits,
            sensor_config,
            sensors: SensorArray::default(),
        };
        car.rebuild_sensors();
        car
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.body.polygon
    }

    #[inline]
    pub fn targets(&self) -> Targets {
        self.targets
    }

    #[inline]
    pub fn limits(&self) -> &DriveLimits {
        &self.limits
    }

    #[inline]
    pub fn sensors(&self) -> &SensorArray {
        &self.sensors
    }

    /// Store new targets, clamping the heading to the steering envelope
    pub fn set_targets(&mut self, targets: Targets) {
        let heading = if targets.heading.is_finite() {
            clamp_magnitude(targets.heading, self.limits.max_angle_threshold)
        } else {
            self.targets.heading
        };
        let speed = if targets.speed.is_finite() {
            targets.speed
        } else {
            self.targets.speed
        };
        self.targets = Targets {
            heading,
            speed,
            parking_brake: targets.parking_brake,
        };
    }

    /// Pivot the car rotates about, in polygon vertex space
    pub fn pivot(&self) -> Vec2 {
        Vec2::new(self.body.width, self.body.height) * self.limits.pivot_ratio
    }

    /// Displacement per tick at the current speed (quadratic in speed)
    pub fn effective_speed(&self) -> f32 {
        self.speed * self.speed.abs() / self.limits.speed_ratio
    }

    /// Advance one render tick toward the targets
    ///
    /// Speed and heading move by at most their per-tick limits; turning is
    /// scaled by speed so a stopped car cannot turn. The sensor ring is
    /// rebuilt from the resulting pose. Returns whether the car moved.
    pub fn update(&mut self) -> bool {
        self.step_speed();
        let displacement = self.effective_speed();
        let heading_delta = self.step_heading();

        if displacement == 0.0 {
            self.rebuild_sensors();
            return false;
        }

        let heading = degrees_to_radians(self.heading);
        self.body
            .polygon
            .translate(-displacement * Vec2::new(heading.cos(), heading.sin()));

        if heading_delta != 0.0 {
            let pivot = self.pivot();
            self.body
                .polygon
                .rotate_about(pivot, degrees_to_radians(heading_delta));
        }

        log::trace!(
            "car moved {:.3} px, heading {:.3} deg, speed {:.3}",
            displacement,
            self.heading,
            self.speed
        );

        self.rebuild_sensors();
        true
    }

    /// Regenerate every sensor from the current pose (readings reset to clear)
    pub fn rebuild_sensors(&mut self) {
        self.sensors = SensorArray::build(
            &self.body.polygon,
            self.heading,
            &self.sensor_config.mounts,
            self.sensor_config.range,
            self.sensor_config.breakpoints,
        );
    }

    /// Re-read every sensor against `obstacles`
    pub fn refresh_sensor_readings(&mut self, obstacles: &[&Polygon]) {
        self.sensors.update_readings(obstacles);
    }

    fn step_speed(&mut self) -> f32 {
        let target = if self.targets.parking_brake {
            0.0
        } else {
            self.targets.speed
        };
        let delta = clamp_magnitude(target - self.speed, self.limits.max_speed_change_per_tick);
        self.speed += delta;
        delta
    }

    fn step_heading(&mut self) -> f32 {
        let delta = clamp_magnitude(
            self.targets.heading - self.heading,
            self.limits.max_heading_change_per_tick,
        ) * (self.speed / self.limits.angle_to_speed_ratio);
        self.heading += delta;
        delta
    }
}
