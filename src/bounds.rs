//! Axis-aligned bounding boxes for the broad phase
//!
//! Boxes support incremental extension from `EMPTY` and a five-way overlap
//! classification. The broad phase only needs the cheap reject
//! (`overlaps`); the full classification exists for spatial indexes that
//! care how a shape sits inside a cell.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How two boxes overlap on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// No overlap on at least one axis
    Disjoint,
    /// Identical bounds
    Equal,
    /// Self lies entirely inside other
    Within,
    /// Other lies entirely inside self
    Contains,
    /// Overlapping without containment
    Partial,
}

/// Axis-aligned box in world coordinates.
///
/// A box is valid when `min <= max` on both axes; `EMPTY` is the inverted
/// sentinel that any `extend` call repairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox {
    /// Inverted box that extends to any point on first `extend`.
    pub const EMPTY: Self = Self {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Minimal box containing every point of the iterator.
    /// Returns `EMPTY` when the iterator is empty.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut bb = Self::EMPTY;
        for p in points {
            bb.extend(p);
        }
        bb
    }

    /// Grows the box to include `p`.
    pub fn extend(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grows the box to cover `other` as well. Extending by `EMPTY` is a
    /// no-op.
    pub fn extend_box(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Box grown by a uniform margin `m` in all directions.
    #[must_use]
    pub fn inflate(&self, m: f32) -> Self {
        let delta = Vec2::splat(m);
        Self { min: self.min - delta, max: self.max + delta }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// `true` if `p` lies inside the box (inclusive on faces).
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// `true` if the boxes overlap (inclusive on faces), the cheap reject
    /// used before exact geometry tests.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y)
    }

    /// Five-way classification of how `self` overlaps `other`.
    #[must_use]
    pub fn classify(&self, other: &Self) -> Overlap {
        let Some(x) = axis_class(self.min.x, self.max.x, other.min.x, other.max.x) else {
            return Overlap::Disjoint;
        };
        let Some(y) = axis_class(self.min.y, self.max.y, other.min.y, other.max.y) else {
            return Overlap::Disjoint;
        };
        if x.equal && y.equal {
            Overlap::Equal
        } else if x.within && y.within {
            Overlap::Within
        } else if x.contains && y.contains {
            Overlap::Contains
        } else {
            Overlap::Partial
        }
    }
}

struct AxisClass {
    equal: bool,
    within: bool,
    contains: bool,
}

/// Interval classification on one axis; `None` when disjoint.
fn axis_class(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> Option<AxisClass> {
    if a_max < b_min || b_max < a_min {
        return None;
    }
    Some(AxisClass {
        equal: a_min == b_min && a_max == b_max,
        within: a_min >= b_min && a_max <= b_max,
        contains: b_min >= a_min && b_max <= a_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bb(x0: f32, y0: f32, x1: f32, y1: f32) -> BBox {
        BBox::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn test_empty_extend() {
        let mut b = BBox::EMPTY;
        assert!(b.is_empty());
        b.extend(Vec2::new(3.0, -2.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, Vec2::new(3.0, -2.0));
        assert_eq!(b.max, Vec2::new(3.0, -2.0));
        b.extend(Vec2::new(-1.0, 5.0));
        assert_eq!(b.min, Vec2::new(-1.0, -2.0));
        assert_eq!(b.max, Vec2::new(3.0, 5.0));
    }

    #[test]
    fn test_extend_box_merges() {
        let mut b = BBox::EMPTY;
        b.extend_box(&bb(2.0, 3.0, 4.0, 6.0));
        assert_eq!(b, bb(2.0, 3.0, 4.0, 6.0));
        // Disjoint boxes merge to their common hull.
        b.extend_box(&bb(-5.0, 10.0, 0.0, 12.0));
        assert_eq!(b, bb(-5.0, 3.0, 4.0, 12.0));
        // An empty argument changes nothing.
        b.extend_box(&BBox::EMPTY);
        assert_eq!(b, bb(-5.0, 3.0, 4.0, 12.0));
    }

    #[test]
    fn test_from_points_matches_extend() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(10.0, -4.0), Vec2::new(2.0, 8.0)];
        let b = BBox::from_points(pts);
        assert_eq!(b.min, Vec2::new(0.0, -4.0));
        assert_eq!(b.max, Vec2::new(10.0, 8.0));
    }

    #[test]
    fn test_contains_inclusive_faces() {
        let b = bb(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains(Vec2::new(0.0, 5.0)));
        assert!(b.contains(Vec2::new(10.0, 10.0)));
        assert!(!b.contains(Vec2::new(10.001, 5.0)));
    }

    #[test]
    fn test_classify_all_five() {
        let base = bb(0.0, 0.0, 10.0, 10.0);
        assert_eq!(base.classify(&bb(20.0, 0.0, 30.0, 10.0)), Overlap::Disjoint);
        assert_eq!(base.classify(&bb(0.0, 0.0, 10.0, 10.0)), Overlap::Equal);
        assert_eq!(base.classify(&bb(-5.0, -5.0, 15.0, 15.0)), Overlap::Within);
        assert_eq!(base.classify(&bb(2.0, 2.0, 8.0, 8.0)), Overlap::Contains);
        assert_eq!(base.classify(&bb(5.0, 5.0, 15.0, 15.0)), Overlap::Partial);
    }

    #[test]
    fn test_classify_equal_one_axis_contained_other() {
        // Equal on x, strictly inside on y: containment, not equality.
        let a = bb(0.0, 2.0, 10.0, 8.0);
        let b = bb(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.classify(&b), Overlap::Within);
        assert_eq!(b.classify(&a), Overlap::Contains);
    }

    #[test]
    fn test_overlaps_touching_faces() {
        let a = bb(0.0, 0.0, 10.0, 10.0);
        let b = bb(10.0, 0.0, 20.0, 10.0);
        assert!(a.overlaps(&b));
        assert_eq!(a.classify(&b), Overlap::Partial);
        let c = bb(10.1, 0.0, 20.0, 10.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_inflate() {
        let b = bb(0.0, 0.0, 10.0, 10.0).inflate(2.5);
        assert_eq!(b.min, Vec2::new(-2.5, -2.5));
        assert_eq!(b.max, Vec2::new(12.5, 12.5));
    }
}
