//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Ticks are driven by the scheduler, never by wall-clock reads
//! - Stable iteration order (bodies in level order, sensors by id)
//! - No rendering or platform dependencies

pub mod body;
pub mod circle;
pub mod level;
pub mod polygon;
pub mod sat;
pub mod scene;
pub mod scheduler;
pub mod sensor;
pub mod tick;
pub mod vector;

pub use body::{Body, Car, DriveLimits, SensorConfig, Targets};
pub use circle::Circle;
pub use level::{Level, LevelError, LevelSpec};
pub use polygon::{Aabb, Polygon};
pub use sat::{
    SeparationResponse, is_separating_axis, point_in_circle, point_in_polygon,
    test_circle_circle, test_circle_polygon, test_polygon_circle, test_polygon_polygon,
};
pub use scene::{CollisionPair, Scene, all_collisions, first_collision};
pub use scheduler::{Scheduler, Session, TickKind};
pub use sensor::{Sensor, SensorArray, SensorMount, default_sensor_mounts};
pub use tick::{GameEvent, GamePhase, GameState, brain_tick, render_tick};
pub use vector::{Vector, VectorExt};
