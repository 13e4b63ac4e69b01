//! Boundary to the player's car script ("brain")
//!
//! Each brain tick the simulation hands the brain a `CarControls` snapshot:
//! the current sensor readings, the last commanded angle/speed/brake and a
//! persistent JSON memory. The brain edits the command fields in place.
//! Nothing else in the simulation is reachable from the brain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::body::{Car, Targets};

/// Scratch storage that survives between brain ticks
pub type Memory = serde_json::Map<String, serde_json::Value>;

/// What the brain sees and edits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarControls {
    /// Sensor readings by id (1..=N); `range` means nothing detected
    #[serde(default)]
    pub sensors: BTreeMap<usize, usize>,
    /// Samples per sensor
    #[serde(default)]
    pub range: usize,
    /// Target heading in degrees
    pub angle: f32,
    /// Target speed (negative is reverse)
    pub speed: f32,
    pub parking_brake: bool,
    #[serde(default)]
    pub memory: Memory,
}

impl CarControls {
    /// Snapshot of `car`'s readings and current targets
    pub fn snapshot(car: &Car, memory: Memory) -> Self {
        let targets = car.targets();
        Self {
            sensors: car
                .sensors()
                .iter()
                .map(|(id, sensor)| (id, sensor.reading()))
                .collect(),
            range: car
                .sensors()
                .get(1)
                .map_or(0, |sensor| sensor.breakpoints()),
            angle: targets.heading,
            speed: targets.speed,
            parking_brake: targets.parking_brake,
            memory,
        }
    }

    /// Reading of sensor `id`, if the car has it
    pub fn reading(&self, id: usize) -> Option<usize> {
        self.sensors.get(&id).copied()
    }

    /// The commanded targets (heading clamping happens in `Car::set_targets`)
    pub fn targets(&self) -> Targets {
        Targets {
            heading: self.angle,
            speed: self.speed,
            parking_brake: self.parking_brake,
        }
    }

    /// Take the command fields and memory from a brain's reply, ignoring
    /// anything it did to the readings
    pub fn apply_reply(&mut self, reply: CarControls) {
        self.angle = reply.angle;
        self.speed = reply.speed;
        self.parking_brake = reply.parking_brake;
        self.memory = reply.memory;
    }
}

/// A car script
pub trait Brain {
    fn drive(&mut self, car: &mut CarControls);
}

impl<F: FnMut(&mut CarControls)> Brain for F {
    fn drive(&mut self, car: &mut CarControls) {
        self(car)
    }
}

/// The starter script a new player gets: cruise, nudge toward the
/// lane using the front-left diagonal sensor, stop when boxed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarterBrain {
    pub cruise_speed: f32,
    pub steer_angle: f32,
}

impl Default for StarterBrain {
    fn default() -> Self {
        Self {
            cruise_speed: 20.0,
            steer_angle: 5.0,
        }
    }
}

impl Brain for StarterBrain {
    fn drive(&mut self, car: &mut CarControls) {
        let front_diagonal = car.reading(3).unwrap_or(car.range);
        let front = car.reading(4).unwrap_or(car.range);

        car.speed = self.cruise_speed;

        if front_diagonal == 10 && front == 10 {
            car.speed = 0.0;
        } else if front_diagonal >= 6 {
            car.angle = self.steer_angle;
        } else if front_diagonal <= 4 {
            car.angle = -self.steer_angle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Body;
    use crate::tuning::Tuning;
    use serde_json::json;

    fn car() -> Car {
        let tuning = Tuning::default();
        Car::new(Body::rect(1, 500.0, 100.0, 200.0, 100.0, ""), 0.0, &tuning)
    }

    #[test]
    fn test_snapshot() {
        let controls = CarControls::snapshot(&car(), Memory::new());
        assert_eq!(controls.sensors.len(), 20);
        assert_eq!(controls.range, 70);
        assert_eq!(controls.reading(1), Some(70));
        assert_eq!(controls.reading(21), None);
        assert_eq!(controls.angle, 0.0);
        assert!(!controls.parking_brake);
    }

    #[test]
    fn test_closure_brain() {
        let mut brain = |car: &mut CarControls| {
            car.speed = 12.0;
            car.memory.insert("ticks".to_string(), json!(1));
        };
        let mut controls = CarControls::snapshot(&car(), Memory::new());
        brain.drive(&mut controls);
        assert_eq!(controls.targets().speed, 12.0);
        assert_eq!(controls.memory["ticks"], json!(1));
    }

    #[test]
    fn test_json_shape() {
        let controls = CarControls::snapshot(&car(), Memory::new());
        let value = serde_json::to_value(&controls).unwrap();
        assert_eq!(value["parkingBrake"], json!(false));
        assert_eq!(value["sensors"]["1"], json!(70));

        let reply: CarControls = serde_json::from_value(json!({
            "sensors": {},
            "range": 0,
            "angle": 10.0,
            "speed": -5.0,
            "parkingBrake": true,
        }))
        .unwrap();
        let mut applied = controls.clone();
        applied.apply_reply(reply);
        assert_eq!(applied.sensors, controls.sensors);
        assert_eq!(applied.angle, 10.0);
        assert!(applied.parking_brake);
    }

    #[test]
    fn test_starter_brain() {
        let mut controls = CarControls::snapshot(&car(), Memory::new());
        StarterBrain::default().drive(&mut controls);
        assert_eq!(controls.speed, 20.0);
        assert_eq!(controls.angle, 5.0);

        controls.sensors.insert(3, 10);
        controls.sensors.insert(4, 10);
        StarterBrain::default().drive(&mut controls);
        assert_eq!(controls.speed, 0.0);

        controls.sensors.insert(3, 2);
        controls.sensors.insert(4, 70);
        StarterBrain::default().drive(&mut controls);
        assert_eq!(controls.angle, -5.0);
    }
}
