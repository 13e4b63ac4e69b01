//! 2D vector helpers used by the SAT engine
//!
//! Points and directions are plain `glam::Vec2`. This module adds the few
//! operations the collision code needs with the conventions it relies on
//! (notably the clockwise perpendicular used to derive outward edge normals
//! on canvas coordinates, where y grows downward).

use glam::Vec2;

/// A 2D point or direction
pub type Vector = Vec2;

/// Collision-specific vector operations
///
/// Non-finite inputs produce non-finite outputs; only normalization guards
/// against division by zero.
pub trait VectorExt: Copy {
    /// Rotate 90 degrees: `(x, y) -> (y, -x)`
    fn perpendicular(self) -> Self;

    /// Negate both components
    fn reversed(self) -> Self;

    /// Scale each axis independently
    fn scaled(self, sx: f32, sy: f32) -> Self;

    /// Unit-length copy, or the zero vector if the length is zero (or too
    /// small to invert)
    fn normalized(self) -> Self;

    /// Project onto `other` (any length)
    fn project(self, other: Self) -> Self;

    /// Project onto `axis`, which must already be unit length
    fn project_onto_unit(self, axis: Self) -> Self;

    /// Reflect across the line through the origin along `axis`
    fn reflect_across(self, axis: Self) -> Self;

    /// Reflect across a unit-length `axis`
    fn reflect_across_unit(self, axis: Self) -> Self;
}

impl VectorExt for Vec2 {
    #[inline]
    fn perpendicular(self) -> Self {
        Vec2::new(self.y, -self.x)
    }

    #[inline]
    fn reversed(self) -> Self {
        -self
    }

    #[inline]
    fn scaled(self, sx: f32, sy: f32) -> Self {
        Vec2::new(self.x * sx, self.y * sy)
    }

    #[inline]
    fn normalized(self) -> Self {
        // normalize_or_zero maps non-finite input to zero too
        if self.is_finite() {
            self.normalize_or_zero()
        } else {
            self / self.length()
        }
    }

    #[inline]
    fn project(self, other: Self) -> Self {
        let amount = self.dot(other) / other.length_squared();
        other * amount
    }

    #[inline]
    fn project_onto_unit(self, axis: Self) -> Self {
        axis * self.dot(axis)
    }

    fn reflect_across(self, axis: Self) -> Self {
        self.project(axis) * 2.0 - self
    }

    fn reflect_across_unit(self, axis: Self) -> Self {
        self.project_onto_unit(axis) * 2.0 - self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perpendicular_is_clockwise() {
        let v = Vec2::new(1.0, 0.0).perpendicular();
        assert_eq!(v, Vec2::new(0.0, -1.0));
        let v = Vec2::new(3.0, 4.0).perpendicular();
        assert_eq!(v, Vec2::new(4.0, -3.0));
    }

    #[test]
    fn test_normalize_zero_is_guarded() {
        let v = Vec2::ZERO.normalized();
        assert_eq!(v, Vec2::ZERO);
        assert!(v.is_finite());
    }

    #[test]
    fn test_normalize() {
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_scaled() {
        assert_eq!(Vec2::new(2.0, 3.0).scaled(2.0, -1.0), Vec2::new(4.0, -3.0));
        assert_eq!(Vec2::new(1.0, -1.0).reversed(), Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_project() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.project(Vec2::new(10.0, 0.0)), Vec2::new(3.0, 0.0));
        assert_eq!(v.project_onto_unit(Vec2::new(0.0, 1.0)), Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_reflect_across_axis() {
        let v = Vec2::new(1.0, 1.0);
        let r = v.reflect_across(Vec2::new(5.0, 0.0));
        assert!((r - Vec2::new(1.0, -1.0)).length() < 1e-6);
        let r = v.reflect_across_unit(Vec2::new(0.0, 1.0));
        assert!((r - Vec2::new(-1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_non_finite_propagates() {
        let v = Vec2::new(f32::NAN, 1.0).perpendicular();
        assert!(!v.is_finite());
        assert!(!Vec2::new(f32::NAN, 1.0).normalized().is_finite());
        assert!(!Vec2::new(f32::INFINITY, 0.0).normalized().is_finite());
    }
}
