//! Level definitions
//!
//! A level is the player's car, the static obstacles it can hit, the
//! ground, the goal area and the walls around the playfield. Levels are
//! either built in (`Level::by_id`) or loaded from a JSON `LevelSpec`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::{Body, Car};
use super::polygon::Polygon;
use crate::tuning::Tuning;

pub const ASPHALT_COLOR: &str = "#282B2A";
pub const GOAL_AREA_COLOR: &str = "#FFD700";
pub const PLAYER_COLOR: &str = "#DB2929";
pub const SENSOR_COLOR: &str = "#EEEEEE";
pub const PARKED_CAR_COLORS: [&str; 8] = [
    "#F7DBD7", "#CBBFB0", "#FAEACB", "#BDC2C2", "#739194", "#88BCE8", "#9CC0E7", "#FCFCFC",
];

/// Gap between the parked cars on level 1
const PARKING_GAP: f32 = 64.0;
/// Thickness of the playfield walls
const WALL_THICKNESS: f32 = 1.0;

/// Errors raised when building a level from a `LevelSpec`
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{what} must have a positive, finite size, got {width}x{height}")]
    BadSize {
        what: String,
        width: f32,
        height: f32,
    },
    #[error("{what} has a non-finite position")]
    BadPosition { what: String },
}

/// A rectangle in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub color: String,
}

impl RectSpec {
    fn check(&self, what: &str) -> Result<(), LevelError> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(LevelError::BadPosition { what: what.to_string() });
        }
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(LevelError::BadSize {
                what: what.to_string(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Where the player starts; the footprint comes from `Tuning`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub heading: f32,
}

/// Serializable level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    #[serde(default)]
    pub name: String,
    pub player: PlayerSpec,
    #[serde(default)]
    pub obstacles: Vec<RectSpec>,
    pub goal_area: RectSpec,
    /// Defaults to the whole canvas
    #[serde(default)]
    pub ground: Option<RectSpec>,
    /// Defaults to four walls just outside the canvas
    #[serde(default)]
    pub limits: Option<Vec<RectSpec>>,
}

/// A playable level
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub player: Car,
    pub obstacles: Vec<Body>,
    pub ground: Body,
    pub goal_area: Body,
    pub limits: Vec<Body>,
}

impl Level {
    /// Built-in level by id (ids start at 1)
    pub fn by_id(id: u32, tuning: &Tuning) -> Option<Level> {
        match id {
            1 => Some(Self::parking_lot(tuning)),
            _ => None,
        }
    }

    /// Level 1: parallel park between the first two cars of a row
    pub fn parking_lot(tuning: &Tuning) -> Level {
        let (w, h) = (tuning.car_width, tuning.car_height);

        let player = PlayerSpec {
            x: tuning.canvas_width - (w + 10.0),
            y: h + 60.0,
            heading: 0.0,
        };
        let stride = w + PARKING_GAP;
        let obstacles = [10.0, stride * 2.0, stride * 3.0, stride * 4.0]
            .into_iter()
            .zip(PARKED_CAR_COLORS)
            .map(|(x, color)| RectSpec {
                x,
                y: 10.0,
                width: w,
                height: h,
                color: color.to_string(),
            })
            .collect();
        let goal_area = RectSpec {
            x: w + 25.0,
            y: 5.0,
            width: w + 90.0,
            height: h + 10.0,
            color: GOAL_AREA_COLOR.to_string(),
        };

        let spec = LevelSpec {
            name: "Parking lot".to_string(),
            player,
            obstacles,
            goal_area,
            ground: None,
            limits: None,
        };

        Self::build(&spec, tuning)
    }

    /// Parse a JSON `LevelSpec` and build it
    pub fn from_json(json: &str, tuning: &Tuning) -> Result<Level, LevelError> {
        let spec: LevelSpec = serde_json::from_str(json)?;
        Self::from_spec(&spec, tuning)
    }

    /// Validate a `LevelSpec` and build it
    pub fn from_spec(spec: &LevelSpec, tuning: &Tuning) -> Result<Level, LevelError> {
        if !(spec.player.x.is_finite() && spec.player.y.is_finite() && spec.player.heading.is_finite()) {
            return Err(LevelError::BadPosition { what: "player".to_string() });
        }
        for (i, obstacle) in spec.obstacles.iter().enumerate() {
            obstacle.check(&format!("obstacle {}", i))?;
        }
        spec.goal_area.check("goal area")?;
        if let Some(ground) = &spec.ground {
            ground.check("ground")?;
        }
        for (i, wall) in spec.limits.iter().flatten().enumerate() {
            wall.check(&format!("limit {}", i))?;
        }

        Ok(Self::build(spec, tuning))
    }

    fn build(spec: &LevelSpec, tuning: &Tuning) -> Level {
        let mut next_id = 0u32;
        let mut body = |rect: &RectSpec| {
            next_id += 1;
            Body::rect(next_id, rect.x, rect.y, rect.width, rect.height, rect.color.clone())
        };

        let player_body = body(&RectSpec {
            x: spec.player.x,
            y: spec.player.y,
            width: tuning.car_width,
            height: tuning.car_height,
            color: PLAYER_COLOR.to_string(),
        });
        let ground = body(spec.ground.as_ref().unwrap_or(&RectSpec {
            x: 0.0,
            y: 0.0,
            width: tuning.canvas_width,
            height: tuning.canvas_height,
            color: ASPHALT_COLOR.to_string(),
        }));
        let goal_area = body(&spec.goal_area);
        let obstacles: Vec<Body> = spec.obstacles.iter().map(&mut body).collect();
        let limits: Vec<Body> = match &spec.limits {
            Some(walls) => walls.iter().map(&mut body).collect(),
            None => boundary_walls(tuning).iter().map(&mut body).collect(),
        };

        log::debug!(
            "Built level {:?}: {} obstacles, {} limits",
            spec.name,
            spec.obstacles.len(),
            spec.limits.as_ref().map_or(4, Vec::len)
        );

        Level {
            name: spec.name.clone(),
            player: Car::new(player_body, spec.player.heading, tuning),
            obstacles,
            ground,
            goal_area,
            limits,
        }
    }

    /// Parking brake engaged with the car's bounding box inside the goal area
    pub fn check_goal(&self) -> bool {
        self.player.targets().parking_brake && self.player.body.is_inside(&self.goal_area)
    }

    /// Re-read the player's sensors against everything they can detect:
    /// obstacles then limits
    pub fn refresh_player_sensors(&mut self) {
        let sensed: Vec<&Polygon> = self
            .obstacles
            .iter()
            .chain(&self.limits)
            .map(|body| &body.polygon)
            .collect();
        self.player.refresh_sensor_readings(&sensed);
    }

    /// Bodies taking part in the collision pass: obstacles, player, limits
    pub fn collision_bodies(&self) -> Vec<&Body> {
        self.obstacles
            .iter()
            .chain(std::iter::once(&self.player.body))
            .chain(&self.limits)
            .collect()
    }
}

/// Four thin walls one wall thickness outside the canvas: top and bottom
/// overhang the corners, left and right span the canvas height
fn boundary_walls(tuning: &Tuning) -> [RectSpec; 4] {
    let (w, h, t) = (tuning.canvas_width, tuning.canvas_height, WALL_THICKNESS);
    let wall = |x, y, width, height| RectSpec {
        x,
        y,
        width,
        height,
        color: String::new(),
    };
    [
        wall(-t, -2.0 * t, w + 2.0 * t, t),
        wall(-t, h + t, w + 2.0 * t, t),
        wall(-2.0 * t, 0.0, t, h),
        wall(w + t, 0.0, t, h),
    ]
}
