//! Axis-aligned bounds and tolerance-based comparison helpers.

use glam::Vec3;

/// Axis-aligned bounding box.
///
/// Coverage bounds for providers and modifiers. Unbounded (infinite)
/// coverage is expressed as `Option<Aabb>` with `None` at the registration
/// layer, not as a sentinel value here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a bounding box from min/max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Containment test under 2D projection: the vertical axis is ignored
    /// because queries are posed at (x, y) with an unknown height.
    pub fn contains_2d(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn x_extent(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn y_extent(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Per-component closeness test for two vectors.
pub fn vec3_is_close(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    (a - b).abs().max_element() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_2d_ignores_height() {
        let bounds = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));

        assert!(bounds.contains_2d(Vec3::new(5.0, 5.0, 100.0)));
        assert!(bounds.contains_2d(Vec3::new(5.0, 5.0, -100.0)));
        assert!(bounds.contains_2d(Vec3::new(5.0, 5.0, f32::MAX)));
    }

    #[test]
    fn test_contains_2d_edges_inclusive() {
        let bounds = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));

        assert!(bounds.contains_2d(Vec3::new(0.0, 0.0, 0.0)));
        assert!(bounds.contains_2d(Vec3::new(10.0, 10.0, 0.0)));
        assert!(!bounds.contains_2d(Vec3::new(10.1, 5.0, 0.0)));
        assert!(!bounds.contains_2d(Vec3::new(5.0, -0.1, 0.0)));
    }

    #[test]
    fn test_vec3_is_close() {
        let a = Vec3::new(1.0, 2.0, 3.0);

        assert!(vec3_is_close(a, Vec3::new(1.0005, 2.0, 3.0), 1.0e-3));
        assert!(!vec3_is_close(a, Vec3::new(1.002, 2.0, 3.0), 1.0e-3));
        // All components must be within tolerance, not just the distance.
        assert!(!vec3_is_close(a, Vec3::new(1.0, 2.0, 3.5), 1.0e-3));
    }
}
