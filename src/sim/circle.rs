//! Circle shape for SAT tests

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circle (immutable once built)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}
