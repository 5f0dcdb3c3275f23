//! Axis-aligned bounding boxes.

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// A box containing nothing; extending it by a point yields that point.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Box from explicit corners.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::EMPTY;
        for p in points {
            bounds.extend(p);
        }
        bounds
    }

    /// True when no point has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Grow to include `point`.
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow to include `other`.
    pub fn union(&mut self, other: &Self) {
        if !other.is_empty() {
            self.extend(other.min);
            self.extend(other.max);
        }
    }

    /// Per-axis extent; zero for an empty box.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Midpoint; the origin for an empty box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Largest of the three extents.
    #[must_use]
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    /// Bounds of this box's eight corners after `transform`.
    #[must_use]
    pub fn transformed(&self, transform: Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::from_points((0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            transform.transform_point3(corner)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_no_extent() {
        assert!(Aabb::EMPTY.is_empty());
        assert_eq!(Aabb::EMPTY.size(), Vec3::ZERO);
        assert_eq!(Aabb::EMPTY.max_dimension(), 0.0);
    }

    #[test]
    fn from_points_spans_inputs() {
        let b = Aabb::from_points([
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.0),
        ]);
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 0.5));
        assert_eq!(b.max_dimension(), 5.0);
        assert_eq!(b.center(), Vec3::new(0.0, 0.5, 0.25));
    }

    #[test]
    fn single_point_is_not_empty_but_degenerate() {
        let b = Aabb::from_points([Vec3::ONE]);
        assert!(!b.is_empty());
        assert_eq!(b.max_dimension(), 0.0);
    }

    #[test]
    fn transformed_box_follows_translation_and_scale() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::IDENTITY,
            Vec3::new(10.0, 0.0, 0.0),
        );
        let moved = b.transformed(t);
        assert!(moved.min.abs_diff_eq(Vec3::new(8.0, -2.0, -2.0), 1e-5));
        assert!(moved.max.abs_diff_eq(Vec3::new(12.0, 2.0, 2.0), 1e-5));
    }

    #[test]
    fn union_ignores_empty_boxes() {
        let mut b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        b.union(&Aabb::EMPTY);
        assert_eq!(b, Aabb::new(Vec3::ZERO, Vec3::ONE));
    }
}
