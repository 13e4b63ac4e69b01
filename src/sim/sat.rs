//! Separating Axis Theorem intersection tests
//!
//! Polygon/polygon, polygon/circle and circle/circle tests, plus the
//! point-in-polygon half-plane test used by the distance sensors.
//!
//! Polygons must be convex and wound clockwise. Touching polygons (a gap of
//! exactly zero on some axis) are reported as NOT colliding, so contact at a
//! shared boundary cannot flicker between colliding and clear.

use glam::Vec2;

use super::circle::Circle;
use super::polygon::Polygon;
use super::vector::VectorExt;

/// Overlap information filled in by a test that reports an intersection
///
/// Only meaningful after a test returned `true`. The public `test_*`
/// functions reset it before running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationResponse {
    /// Unit direction of the overlap (push `a` by `-overlap_vector()` to separate)
    pub overlap_normal: Vec2,
    /// Overlap depth along `overlap_normal`
    pub overlap: f32,
    /// Whether `a` is fully inside `b`
    pub a_in_b: bool,
    /// Whether `b` is fully inside `a`
    pub b_in_a: bool,
}

impl Default for SeparationResponse {
    fn default() -> Self {
        Self {
            overlap_normal: Vec2::ZERO,
            overlap: f32::MAX,
            a_in_b: true,
            b_in_a: true,
        }
    }
}

impl SeparationResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the pre-test state so the value can be reused
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Minimum translation vector (`overlap_normal * overlap`)
    #[inline]
    pub fn overlap_vector(&self) -> Vec2 {
        self.overlap_normal * self.overlap
    }
}

/// Voronoi region of a point relative to a line segment starting at the origin
///
/// ```text
///            |       (Middle)      |
///    (Left) [0]-------------------[1] (Right)
///            |       (Middle)      |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VoronoiRegion {
    Left,
    Middle,
    Right,
}

fn voronoi_region(line: Vec2, point: Vec2) -> VoronoiRegion {
    let dp = point.dot(line);
    if dp < 0.0 {
        VoronoiRegion::Left
    } else if dp > line.length_squared() {
        VoronoiRegion::Right
    } else {
        VoronoiRegion::Middle
    }
}

/// Project `points` onto a unit `axis`, returning the `(min, max)` range
fn flatten_points_on(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    points.iter().fold((f32::MAX, -f32::MAX), |(min, max), p| {
        let dot = p.dot(axis);
        (min.min(dot), max.max(dot))
    })
}

/// Check whether a unit `axis` separates two point sets
///
/// Returns `true` if the projected ranges have a gap (or only touch). When
/// they overlap and a response is given, the smallest overlap seen so far is
/// kept, so the same response must be reused for every axis of one pair. The
/// containment flags are only ever cleared here; ANDing across axes is
/// implicit.
pub fn is_separating_axis(
    a_origin: Vec2,
    b_origin: Vec2,
    a_points: &[Vec2],
    b_points: &[Vec2],
    axis: Vec2,
    response: Option<&mut SeparationResponse>,
) -> bool {
    let projected_offset = (b_origin - a_origin).dot(axis);

    let (a_min, a_max) = flatten_points_on(a_points, axis);
    let (b_min, b_max) = flatten_points_on(b_points, axis);
    let b_min = b_min + projected_offset;
    let b_max = b_max + projected_offset;

    if a_min >= b_max || b_min >= a_max {
        return true;
    }

    if let Some(response) = response {
        let overlap = if a_min < b_min {
            response.a_in_b = false;
            if a_max < b_max {
                response.b_in_a = false;
                a_max - b_min
            } else {
                // B is fully inside A along this axis, pick the shortest way out
                shortest_exit(a_min, a_max, b_min, b_max)
            }
        } else {
            response.b_in_a = false;
            if a_max > b_max {
                response.a_in_b = false;
                a_min - b_max
            } else {
                shortest_exit(a_min, a_max, b_min, b_max)
            }
        };

        let abs_overlap = overlap.abs();
        if abs_overlap < response.overlap {
            response.overlap = abs_overlap;
            response.overlap_normal = if overlap < 0.0 { -axis } else { axis };
        }
    }

    false
}

#[inline]
fn shortest_exit(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    let option1 = a_max - b_min;
    let option2 = b_max - a_min;
    if option1 < option2 { option1 } else { -option2 }
}

/// Check whether two convex, clockwise polygons intersect
///
/// Every normal of `a`, then every normal of `b`, is tried as a separating
/// axis; the first one that separates ends the test.
pub fn test_polygon_polygon(
    a: &Polygon,
    b: &Polygon,
    mut response: Option<&mut SeparationResponse>,
) -> bool {
    if let Some(response) = response.as_deref_mut() {
        response.clear();
    }

    for &axis in a.normals().iter().chain(b.normals()) {
        if is_separating_axis(
            a.origin,
            b.origin,
            a.points(),
            b.points(),
            axis,
            response.as_deref_mut(),
        ) {
            return false;
        }
    }

    true
}

/// Check whether a polygon and a circle intersect
///
/// The circle center is classified against each edge's Voronoi regions:
/// near a vertex it is a point-distance test, beside an edge it is a
/// perpendicular-distance test.
pub fn test_polygon_circle(
    polygon: &Polygon,
    circle: &Circle,
    mut response: Option<&mut SeparationResponse>,
) -> bool {
    if let Some(response) = response.as_deref_mut() {
        response.clear();
    }

    let circle_pos = circle.center - polygon.origin;
    let radius = circle.radius;
    let radius2 = radius * radius;
    let points = polygon.points();
    let edges = polygon.edges();
    let len = points.len();

    for i in 0..len {
        let next = (i + 1) % len;
        let prev = (i + len - 1) % len;
        let mut overlap = 0.0;
        let mut overlap_normal = None;

        let edge = edges[i];
        // Circle center relative to the start of the edge
        let point = circle_pos - points[i];

        if let Some(response) = response.as_deref_mut() {
            if point.length_squared() > radius2 {
                response.a_in_b = false;
            }
        }

        match voronoi_region(edge, point) {
            VoronoiRegion::Left => {
                // Must also be in the right region of the previous edge to be at vertex i
                let from_prev = circle_pos - points[prev];
                if voronoi_region(edges[prev], from_prev) == VoronoiRegion::Right {
                    let dist = point.length();
                    if dist > radius {
                        return false;
                    }
                    if let Some(response) = response.as_deref_mut() {
                        response.b_in_a = false;
                        overlap_normal = Some(point.normalized());
                        overlap = radius - dist;
                    }
                }
            }
            VoronoiRegion::Right => {
                // Must also be in the left region of the next edge to be at vertex i+1
                let from_next = circle_pos - points[next];
                if voronoi_region(edges[next], from_next) == VoronoiRegion::Left {
                    let dist = from_next.length();
                    if dist > radius {
                        return false;
                    }
                    if let Some(response) = response.as_deref_mut() {
                        response.b_in_a = false;
                        overlap_normal = Some(from_next.normalized());
                        overlap = radius - dist;
                    }
                }
            }
            VoronoiRegion::Middle => {
                let normal = polygon.normals()[i];
                let dist = point.dot(normal);
                if dist > 0.0 && dist.abs() > radius {
                    return false;
                }
                if let Some(response) = response.as_deref_mut() {
                    overlap_normal = Some(normal);
                    overlap = radius - dist;
                    // Center outside the edge, or part of the circle pokes out
                    if dist >= 0.0 || overlap < 2.0 * radius {
                        response.b_in_a = false;
                    }
                }
            }
        }

        if let (Some(normal), Some(response)) = (overlap_normal, response.as_deref_mut()) {
            if overlap.abs() < response.overlap.abs() {
                response.overlap = overlap;
                response.overlap_normal = normal;
            }
        }
    }

    true
}

/// Check whether a circle and a polygon intersect
///
/// Same result as [`test_polygon_circle`]; the response is framed with the
/// circle as `a`.
pub fn test_circle_polygon(
    circle: &Circle,
    polygon: &Polygon,
    mut response: Option<&mut SeparationResponse>,
) -> bool {
    let hit = test_polygon_circle(polygon, circle, response.as_deref_mut());

    if hit {
        if let Some(response) = response {
            response.overlap_normal = -response.overlap_normal;
            std::mem::swap(&mut response.a_in_b, &mut response.b_in_a);
        }
    }

    hit
}

/// Check whether two circles intersect (touching counts as intersecting)
pub fn test_circle_circle(
    a: &Circle,
    b: &Circle,
    response: Option<&mut SeparationResponse>,
) -> bool {
    let difference = b.center - a.center;
    let total_radius = a.radius + b.radius;
    let distance_sq = difference.length_squared();

    if distance_sq > total_radius * total_radius {
        return false;
    }

    if let Some(response) = response {
        let dist = distance_sq.sqrt();
        response.clear();
        response.overlap = total_radius - dist;
        response.overlap_normal = difference.normalized();
        response.a_in_b = a.radius <= b.radius && dist <= b.radius - a.radius;
        response.b_in_a = b.radius <= a.radius && dist <= a.radius - b.radius;
    }

    true
}

/// Check whether a world-space point lies strictly inside a polygon
///
/// A point on the boundary is outside, matching the touching policy of
/// [`test_polygon_polygon`].
pub fn point_in_polygon(point: Vec2, polygon: &Polygon) -> bool {
    if polygon.points().len() < 3 {
        return false;
    }

    let local = point - polygon.origin;
    polygon
        .points()
        .iter()
        .zip(polygon.normals())
        .all(|(p, n)| (local - *p).dot(*n) < 0.0)
}

/// Check whether a world-space point lies inside (or on) a circle
pub fn point_in_circle(point: Vec2, circle: &Circle) -> bool {
    (point - circle.center).length_squared() <= circle.radius * circle.radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(x: f32, y: f32, size: f32) -> Polygon {
        Polygon::rect(Vec2::new(x, y), size, size)
    }

    /// Regular n-gon, clockwise on a y-down canvas
    fn regular(center: Vec2, radius: f32, sides: usize, rotation: f32) -> Polygon {
        let points = (0..sides)
            .map(|k| {
                let theta = rotation + k as f32 * std::f32::consts::TAU / sides as f32;
                Vec2::new(theta.cos(), theta.sin()) * radius
            })
            .collect();
        Polygon::new(center, points)
    }

    #[test]
    fn test_point_in_polygon_unit_square() {
        let sq = square(0.0, 0.0, 10.0);
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Vec2::new(10.0, 10.0), &sq));
        assert!(!point_in_polygon(Vec2::new(11.0, 11.0), &sq));
        assert!(!point_in_polygon(Vec2::new(5.0, 0.0), &sq));
    }

    #[test]
    fn test_point_boundary_matches_touching_policy() {
        let sq = square(0.0, 0.0, 10.0);
        let at_corner = square(10.0, 10.0, 1.0);
        assert!(!point_in_polygon(Vec2::new(10.0, 10.0), &sq));
        assert!(!test_polygon_polygon(&sq, &at_corner, None));
    }

    #[test]
    fn test_point_in_translated_polygon() {
        let sq = square(100.0, 50.0, 10.0);
        assert!(point_in_polygon(Vec2::new(105.0, 55.0), &sq));
        assert!(!point_in_polygon(Vec2::new(5.0, 5.0), &sq));
    }

    #[test]
    fn test_point_in_degenerate_polygon() {
        let line = Polygon::new(Vec2::ZERO, vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]);
        assert!(!point_in_polygon(Vec2::new(5.0, 0.0), &line));
    }

    #[test]
    fn test_polygons_overlapping() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(8.0, 0.0, 10.0);
        let mut response = SeparationResponse::new();
        assert!(test_polygon_polygon(&a, &b, Some(&mut response)));
        assert!((response.overlap - 2.0).abs() < 1e-5);
        assert_eq!(response.overlap_normal, Vec2::new(1.0, 0.0));
        assert!((response.overlap_vector() - Vec2::new(2.0, 0.0)).length() < 1e-5);
        assert!(!response.a_in_b);
        assert!(!response.b_in_a);
    }

    #[test]
    fn test_polygons_touching_do_not_collide() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        assert!(!test_polygon_polygon(&a, &b, None));
        assert!(!test_polygon_polygon(&b, &a, None));
        let below = square(0.0, 10.0, 10.0);
        assert!(!test_polygon_polygon(&a, &below, None));
    }

    #[test]
    fn test_polygons_separated() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(30.0, 30.0, 10.0);
        assert!(!test_polygon_polygon(&a, &b, None));
    }

    #[test]
    fn test_polygon_containment_flags() {
        let big = square(0.0, 0.0, 100.0);
        let small = square(40.0, 40.0, 10.0);
        let mut response = SeparationResponse::new();
        assert!(test_polygon_polygon(&big, &small, Some(&mut response)));
        assert!(response.b_in_a);
        assert!(!response.a_in_b);

        assert!(test_polygon_polygon(&small, &big, Some(&mut response)));
        assert!(response.a_in_b);
        assert!(!response.b_in_a);
    }

    #[test]
    fn test_response_is_reset_between_tests() {
        let a = square(0.0, 0.0, 10.0);
        let deep = square(2.0, 0.0, 10.0);
        let shallow = square(9.0, 0.0, 10.0);
        let mut response = SeparationResponse::new();
        assert!(test_polygon_polygon(&a, &shallow, Some(&mut response)));
        assert!((response.overlap - 1.0).abs() < 1e-5);
        assert!(test_polygon_polygon(&a, &deep, Some(&mut response)));
        assert!((response.overlap - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotated_polygon_corner_clearance() {
        // Diamond whose tip stops just short of the square's edge
        let sq = square(0.0, 0.0, 10.0);
        let diamond = regular(Vec2::new(15.5, 5.0), 5.0, 4, 0.0);
        assert!(!test_polygon_polygon(&sq, &diamond, None));
        let diamond = regular(Vec2::new(14.0, 5.0), 5.0, 4, 0.0);
        assert!(test_polygon_polygon(&sq, &diamond, None));
    }

    #[test]
    fn test_circles_overlap() {
        let a = Circle::new(Vec2::ZERO, 10.0);
        let b = Circle::new(Vec2::new(15.0, 0.0), 10.0);
        let mut response = SeparationResponse::new();
        assert!(test_circle_circle(&a, &b, Some(&mut response)));
        assert!((response.overlap - 5.0).abs() < 1e-5);
        assert_eq!(response.overlap_normal, Vec2::new(1.0, 0.0));
        assert!(!response.a_in_b && !response.b_in_a);

        let far = Circle::new(Vec2::new(25.0, 0.0), 4.0);
        assert!(!test_circle_circle(&a, &far, None));

        let inner = Circle::new(Vec2::new(2.0, 0.0), 3.0);
        assert!(test_circle_circle(&inner, &a, Some(&mut response)));
        assert!(response.a_in_b);
        assert!(!response.b_in_a);
    }

    #[test]
    fn test_circle_circle_coincident_centers() {
        let a = Circle::new(Vec2::ZERO, 5.0);
        let mut response = SeparationResponse::new();
        assert!(test_circle_circle(&a, &a, Some(&mut response)));
        assert!(response.overlap_normal.is_finite());
        assert!(response.a_in_b && response.b_in_a);
    }

    #[test]
    fn test_polygon_circle_edge() {
        let sq = square(0.0, 0.0, 10.0);
        let circle = Circle::new(Vec2::new(13.0, 5.0), 4.0);
        let mut response = SeparationResponse::new();
        assert!(test_polygon_circle(&sq, &circle, Some(&mut response)));
        assert!((response.overlap - 1.0).abs() < 1e-5);
        assert_eq!(response.overlap_normal, Vec2::new(1.0, 0.0));

        let clear = Circle::new(Vec2::new(15.0, 5.0), 4.0);
        assert!(!test_polygon_circle(&sq, &clear, None));
    }

    #[test]
    fn test_polygon_circle_vertex_region() {
        let sq = square(0.0, 0.0, 10.0);
        // Diagonal from the corner (10,10): distance ~4.24
        let near = Circle::new(Vec2::new(13.0, 13.0), 5.0);
        let mut response = SeparationResponse::new();
        assert!(test_polygon_circle(&sq, &near, Some(&mut response)));
        let expected = Vec2::new(1.0, 1.0).normalize();
        assert!((response.overlap_normal - expected).length() < 1e-5);
        assert!((response.overlap - (5.0 - 18.0_f32.sqrt())).abs() < 1e-4);

        let far = Circle::new(Vec2::new(13.0, 13.0), 4.0);
        assert!(!test_polygon_circle(&sq, &far, None));
    }

    #[test]
    fn test_polygon_circle_contained() {
        let sq = square(0.0, 0.0, 100.0);
        let circle = Circle::new(Vec2::new(50.0, 50.0), 5.0);
        let mut response = SeparationResponse::new();
        assert!(test_polygon_circle(&sq, &circle, Some(&mut response)));
        assert!(response.b_in_a);
        assert!(!response.a_in_b);
    }

    #[test]
    fn test_circle_polygon_swaps_framing() {
        let sq = square(0.0, 0.0, 100.0);
        let circle = Circle::new(Vec2::new(50.0, 50.0), 5.0);
        let mut response = SeparationResponse::new();
        assert!(test_circle_polygon(&circle, &sq, Some(&mut response)));
        assert!(response.a_in_b);
        assert!(!response.b_in_a);

        let edge_circle = Circle::new(Vec2::new(103.0, 50.0), 4.0);
        assert!(test_circle_polygon(&edge_circle, &sq, Some(&mut response)));
        assert_eq!(response.overlap_normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_point_in_circle() {
        let circle = Circle::new(Vec2::new(5.0, 5.0), 2.0);
        assert!(point_in_circle(Vec2::new(6.0, 5.0), &circle));
        assert!(!point_in_circle(Vec2::new(8.0, 5.0), &circle));
    }

    fn polygon_params() -> impl Strategy<Value = (f32, f32, f32, usize, f32)> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            1.0f32..80.0,
            3usize..9,
            0.0f32..std::f32::consts::TAU,
        )
    }

    proptest! {
        #[test]
        fn prop_polygon_test_is_symmetric(
            (ax, ay, ar, an, arot) in polygon_params(),
            (bx, by, br, bn, brot) in polygon_params(),
        ) {
            let a = regular(Vec2::new(ax, ay), ar, an, arot);
            let b = regular(Vec2::new(bx, by), br, bn, brot);
            prop_assert_eq!(test_polygon_polygon(&a, &b, None), test_polygon_polygon(&b, &a, None));
        }

        #[test]
        fn prop_apart_polygons_stay_apart_under_translation(
            (ax, ay, ar, an, arot) in polygon_params(),
            (br, bn, brot) in (1.0f32..80.0, 3usize..9, 0.0f32..std::f32::consts::TAU),
            direction in 0.0f32..std::f32::consts::TAU,
            gap in 0.5f32..200.0,
            shift in (-1000.0f32..1000.0, -1000.0f32..1000.0),
        ) {
            let a_center = Vec2::new(ax, ay);
            let b_center = a_center + Vec2::new(direction.cos(), direction.sin()) * (ar + br + gap);
            let mut a = regular(a_center, ar, an, arot);
            let mut b = regular(b_center, br, bn, brot);
            prop_assert!(!test_polygon_polygon(&a, &b, None));

            let shift = Vec2::new(shift.0, shift.1);
            a.translate(shift);
            b.translate(shift);
            prop_assert!(!test_polygon_polygon(&a, &b, None));
        }

        #[test]
        fn prop_contained_polygon_collides(
            (ax, ay, ar, an, arot) in (-500.0f32..500.0, -500.0f32..500.0, 20.0f32..80.0, 3usize..9, 0.0f32..std::f32::consts::TAU),
            scale in 0.05f32..0.4,
            (bn, brot) in (3usize..9, 0.0f32..std::f32::consts::TAU),
            direction in 0.0f32..std::f32::consts::TAU,
            reach in 0.0f32..1.0,
        ) {
            // Inradius of a regular n-gon is r*cos(pi/n) >= r/2 for n >= 3
            let inner_room = ar * 0.5;
            let br = inner_room * scale;
            let offset = Vec2::new(direction.cos(), direction.sin()) * (inner_room - br) * reach * 0.9;
            let a = regular(Vec2::new(ax, ay), ar, an, arot);
            let b = regular(Vec2::new(ax, ay) + offset, br, bn, brot);
            prop_assert!(test_polygon_polygon(&a, &b, None));
            prop_assert!(test_polygon_polygon(&b, &a, None));
        }
    }
}
