//! Per-tick collision pass over a set of bodies

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::polygon::Polygon;
use super::sat::test_polygon_polygon;

/// Two bodies found intersecting, by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionPair {
    pub a: u32,
    pub b: u32,
}

/// Non-owning view over the bodies taking part in one collision pass
#[derive(Debug, Clone, Default)]
pub struct Scene<'a> {
    bodies: Vec<&'a Body>,
}

impl<'a> Scene<'a> {
    pub fn new(bodies: Vec<&'a Body>) -> Self {
        Self { bodies }
    }

    pub fn bodies(&self) -> &[&'a Body] {
        &self.bodies
    }

    pub fn polygons(&self) -> Vec<&'a Polygon> {
        self.bodies.iter().map(|body| &body.polygon).collect()
    }

    pub fn first_collision(&self) -> Option<CollisionPair> {
        first_collision(&self.bodies)
    }

    pub fn all_collisions(&self) -> Vec<CollisionPair> {
        all_collisions(&self.bodies)
    }
}

/// Every intersecting pair, visiting `i` from last to first and `j` from
/// `i - 1` down to 0
fn colliding_pairs<'a>(bodies: &'a [&'a Body]) -> impl Iterator<Item = CollisionPair> + 'a {
    (0..bodies.len()).rev().flat_map(move |i| {
        (0..i).rev().filter_map(move |j| {
            let (a, b) = (bodies[i], bodies[j]);
            test_polygon_polygon(&a.polygon, &b.polygon, None)
                .then_some(CollisionPair { a: a.id, b: b.id })
        })
    })
}

/// The first intersecting pair in scan order, if any
pub fn first_collision(bodies: &[&Body]) -> Option<CollisionPair> {
    colliding_pairs(bodies).next()
}

/// Every intersecting pair in scan order
pub fn all_collisions(bodies: &[&Body]) -> Vec<CollisionPair> {
    colliding_pairs(bodies).collect()
}
