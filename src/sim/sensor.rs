//! Distance sensors sampled along a ray
//!
//! A sensor is a row of sample points stepping away from a point on the
//! car's outline. Its reading is the index of the nearest sample that falls
//! inside an obstacle, or the breakpoint count when nothing is in range.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::polygon::Polygon;
use super::sat::point_in_polygon;
use crate::consts::SENSORS_PER_CORNER;
use crate::degrees_to_radians;

/// A single ray-sampled distance sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Sample points, nearest to the car first
    sample_points: Vec<Vec2>,
    /// Index of the first blocked sample, or `sample_points.len()` if clear
    reading: usize,
}

impl Sensor {
    /// Build the sample points for a sensor at `origin` pointing along `angle_degrees`
    ///
    /// Samples step backward along the angle (the same sign convention the
    /// car uses for forward motion), `range / breakpoints` apart.
    pub fn new(origin: Vec2, angle_degrees: f32, range: f32, breakpoints: usize) -> Self {
        let interval = if breakpoints > 0 {
            range / breakpoints as f32
        } else {
            0.0
        };
        let radians = degrees_to_radians(angle_degrees);
        let direction = Vec2::new(radians.cos(), radians.sin());

        let sample_points = (0..breakpoints)
            .map(|i| origin - direction * (i as f32 * interval))
            .collect();

        Self {
            sample_points,
            reading: breakpoints,
        }
    }

    #[inline]
    pub fn sample_points(&self) -> &[Vec2] {
        &self.sample_points
    }

    #[inline]
    pub fn reading(&self) -> usize {
        self.reading
    }

    /// Number of samples; also the "nothing detected" reading
    #[inline]
    pub fn breakpoints(&self) -> usize {
        self.sample_points.len()
    }

    /// Whether anything was detected within range
    #[inline]
    pub fn detects(&self) -> bool {
        self.reading < self.breakpoints()
    }

    /// Re-scan the samples against `obstacles`, nearest sample first
    ///
    /// The first sample inside any obstacle wins; farther hits never
    /// overwrite a nearer one.
    pub fn update_reading(&mut self, obstacles: &[&Polygon]) {
        self.reading = self
            .sample_points
            .iter()
            .position(|point| obstacles.iter().any(|obstacle| point_in_polygon(*point, obstacle)))
            .unwrap_or(self.sample_points.len());
    }
}

/// Where a sensor sits on the car: a corner index and an angle offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorMount {
    /// Index into the car polygon's vertices
    pub corner: usize,
    /// Angle in degrees, added to the car heading
    pub angle: f32,
}

/// Angle offsets of the five sensors on each corner (clockwise from top-left)
const CORNER_SENSOR_ANGLES: [[f32; SENSORS_PER_CORNER]; 4] = [
    [-45.0, 0.0, 45.0, 90.0, 135.0],
    [45.0, 90.0, 135.0, 180.0, 225.0],
    [135.0, 180.0, 225.0, 270.0, 315.0],
    [-135.0, -90.0, -45.0, 0.0, 45.0],
];

/// The 20-sensor ring: five sensors fanned out from each corner
pub fn default_sensor_mounts() -> Vec<SensorMount> {
    CORNER_SENSOR_ANGLES
        .iter()
        .enumerate()
        .flat_map(|(corner, angles)| {
            angles
                .iter()
                .map(move |&angle| SensorMount { corner, angle })
        })
        .collect()
}

/// The car's sensors, addressed by id `1..=len`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorArray {
    sensors: Vec<Sensor>,
}

impl SensorArray {
    /// Build every mounted sensor from the polygon's current world pose
    ///
    /// Mounts referring to a corner the polygon does not have are skipped.
    pub fn build(
        polygon: &Polygon,
        heading: f32,
        mounts: &[SensorMount],
        range: f32,
        breakpoints: usize,
    ) -> Self {
        let corners: Vec<Vec2> = polygon.world_points().collect();
        let sensors = mounts
            .iter()
            .filter_map(|mount| {
                let origin = corners.get(mount.corner)?;
                Some(Sensor::new(*origin, mount.angle + heading, range, breakpoints))
            })
            .collect();
        Self { sensors }
    }

    /// Sensor by id (ids start at 1)
    pub fn get(&self, id: usize) -> Option<&Sensor> {
        id.checked_sub(1).and_then(|index| self.sensors.get(index))
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// `(id, sensor)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Sensor)> {
        self.sensors.iter().enumerate().map(|(i, s)| (i + 1, s))
    }

    /// Refresh every reading against `obstacles`
    pub fn update_readings(&mut self, obstacles: &[&Polygon]) {
        for sensor in &mut self.sensors {
            sensor.update_reading(obstacles);
        }
    }

    /// Current readings in id order
    pub fn readings(&self) -> Vec<usize> {
        self.sensors.iter().map(Sensor::reading).collect()
    }
}
