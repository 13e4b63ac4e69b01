//! Convex polygon with cached edges and normals
//!
//! Vertices are stored relative to `origin` and must form a convex,
//! clockwise loop (canvas coordinates, y down). Convexity and winding are a
//! caller contract and are not checked.
//!
//! The edge/normal cache can never go stale: points are private and every
//! path that replaces them recomputes the cache in the same call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vector::VectorExt;

/// Serialized form of a polygon (the cache is derived on load)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PolygonShape {
    origin: Vec2,
    points: Vec<Vec2>,
}

/// A convex, clockwise polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolygonShape", into = "PolygonShape")]
pub struct Polygon {
    /// World position; world vertex = `origin + points[i]`
    pub origin: Vec2,
    points: Vec<Vec2>,
    edges: Vec<Vec2>,
    normals: Vec<Vec2>,
}

impl From<PolygonShape> for Polygon {
    fn from(shape: PolygonShape) -> Self {
        Polygon::new(shape.origin, shape.points)
    }
}

impl From<Polygon> for PolygonShape {
    fn from(polygon: Polygon) -> Self {
        PolygonShape {
            origin: polygon.origin,
            points: polygon.points,
        }
    }
}

impl Polygon {
    pub fn new(origin: Vec2, points: Vec<Vec2>) -> Self {
        let mut polygon = Self {
            origin,
            points,
            edges: Vec::new(),
            normals: Vec::new(),
        };
        polygon.recompute_edges_and_normals();
        polygon
    }

    /// Axis-aligned rectangle with its top-left corner at `origin`
    pub fn rect(origin: Vec2, width: f32, height: f32) -> Self {
        Self::new(
            origin,
            vec![
                Vec2::ZERO,
                Vec2::new(width, 0.0),
                Vec2::new(width, height),
                Vec2::new(0.0, height),
            ],
        )
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn edges(&self) -> &[Vec2] {
        &self.edges
    }

    #[inline]
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Replace the vertices and rebuild the edge/normal cache
    pub fn set_points(&mut self, points: Vec<Vec2>) {
        self.points = points;
        self.recompute_edges_and_normals();
    }

    /// Rotate every vertex about `pivot` (in vertex space) by `radians`
    pub fn rotate_about(&mut self, pivot: Vec2, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        let rotated = self
            .points
            .iter()
            .map(|p| {
                let d = *p - pivot;
                Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + pivot
            })
            .collect();
        self.set_points(rotated);
    }

    /// Move the polygon without touching its vertices
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    /// Vertices in world space
    pub fn world_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(move |p| self.origin + *p)
    }

    /// World-space bounding box
    pub fn aabb(&self) -> Aabb {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for p in self.world_points() {
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }

    fn recompute_edges_and_normals(&mut self) {
        let len = self.points.len();
        self.edges.clear();
        self.normals.clear();
        for i in 0..len {
            let p1 = self.points[i];
            let p2 = self.points[(i + 1) % len];
            let edge = p2 - p1;
            self.edges.push(edge);
            self.normals.push(edge.perpendicular().normalized());
        }
    }
}

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Whether `inner` lies fully inside this box (shared edges count as inside)
    pub fn contains(&self, inner: &Aabb) -> bool {
        inner.min.x >= self.min.x
            && inner.max.x <= self.max.x
            && inner.min.y >= self.min.y
            && inner.max.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cache_fresh(polygon: &Polygon) {
        let fresh = Polygon::new(polygon.origin, polygon.points().to_vec());
        for i in 0..polygon.points().len() {
            assert!((polygon.edges()[i] - fresh.edges()[i]).length() < 1e-6);
            assert!((polygon.normals()[i] - fresh.normals()[i]).length() < 1e-6);
        }
    }

    #[test]
    fn test_rect_edges_and_normals() {
        let poly = Polygon::rect(Vec2::new(5.0, 5.0), 10.0, 20.0);
        assert_eq!(poly.edges()[0], Vec2::new(10.0, 0.0));
        assert_eq!(poly.edges()[1], Vec2::new(0.0, 20.0));
        assert_eq!(poly.edges()[3], Vec2::new(0.0, -20.0));
        // Outward normals on a y-down canvas
        assert_eq!(poly.normals()[0], Vec2::new(0.0, -1.0));
        assert_eq!(poly.normals()[1], Vec2::new(1.0, 0.0));
        assert_eq!(poly.normals()[2], Vec2::new(0.0, 1.0));
        assert_eq!(poly.normals()[3], Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_rotation_refreshes_cache() {
        let mut poly = Polygon::rect(Vec2::ZERO, 200.0, 100.0);
        poly.rotate_about(Vec2::new(50.0, 50.0), 0.3);
        assert_cache_fresh(&poly);
        poly.rotate_about(Vec2::new(50.0, 50.0), -1.1);
        assert_cache_fresh(&poly);
        for n in poly.normals() {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_set_points_refreshes_cache() {
        let mut poly = Polygon::rect(Vec2::ZERO, 10.0, 10.0);
        poly.set_points(vec![Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 3.0)]);
        assert_eq!(poly.edges().len(), 3);
        assert_eq!(poly.edges()[1], Vec2::new(-4.0, 3.0));
        assert_cache_fresh(&poly);
    }

    #[test]
    fn test_rotate_about_pivot_keeps_pivot_fixed() {
        let mut poly = Polygon::new(Vec2::ZERO, vec![Vec2::new(50.0, 50.0), Vec2::new(60.0, 50.0)]);
        poly.rotate_about(Vec2::new(50.0, 50.0), std::f32::consts::FRAC_PI_2);
        assert!((poly.points()[0] - Vec2::new(50.0, 50.0)).length() < 1e-4);
        assert!((poly.points()[1] - Vec2::new(50.0, 60.0)).length() < 1e-4);
    }

    #[test]
    fn test_translate_leaves_points() {
        let mut poly = Polygon::rect(Vec2::ZERO, 10.0, 10.0);
        poly.translate(Vec2::new(3.0, -2.0));
        assert_eq!(poly.origin, Vec2::new(3.0, -2.0));
        assert_eq!(poly.points()[2], Vec2::new(10.0, 10.0));
        let world: Vec<_> = poly.world_points().collect();
        assert_eq!(world[2], Vec2::new(13.0, 8.0));
    }

    #[test]
    fn test_aabb_contains() {
        let outer = Polygon::rect(Vec2::new(225.0, 5.0), 290.0, 110.0).aabb();
        let inner = Polygon::rect(Vec2::new(240.0, 10.0), 200.0, 100.0).aabb();
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        let poking_out = Polygon::rect(Vec2::new(400.0, 10.0), 200.0, 100.0).aabb();
        assert!(!outer.contains(&poking_out));
    }

    #[test]
    fn test_serde_rebuilds_cache() {
        let poly = Polygon::rect(Vec2::new(1.0, 2.0), 4.0, 3.0);
        let json = serde_json::to_string(&poly).unwrap();
        assert!(!json.contains("normals"));
        let loaded: Polygon = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, poly);
    }
}
