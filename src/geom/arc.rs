//! Circular-arc collision primitive
//!
//! An arc is defined by its center, a rim point in the middle of the curve,
//! and a half-angle: the curve spans `±half_angle` around the center-to-rim
//! direction. Distance queries pick the best of the two span endpoints and,
//! when the queried point's direction falls within the span, the radial
//! projection onto the curve.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::bounds::BBox;
use crate::{consts, polar_to_cartesian};

use super::contact::{Contact, RayHit};
use super::shape::GeomError;

/// A circular arc spanning `±half_angle` around the bisector direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    center: Vec2,
    rim: Vec2,
    half_angle: f32,
}

impl Arc {
    /// Rejects arcs whose radius is below `MIN_FEATURE_LEN` or whose
    /// half-angle falls outside `(0, π]`.
    pub fn new(center: Vec2, rim: Vec2, half_angle: f32) -> Result<Self, GeomError> {
        if center.distance_squared(rim) < consts::MIN_FEATURE_LEN * consts::MIN_FEATURE_LEN {
            return Err(GeomError::DegenerateArc);
        }
        if !(half_angle > 0.0 && half_angle <= std::f32::consts::PI) {
            return Err(GeomError::InvalidHalfAngle(half_angle));
        }
        Ok(Self { center, rim, half_angle })
    }

    /// Arc from polar placement: rim at `bisector_angle` and distance
    /// `radius` from `center`.
    pub fn from_polar(
        center: Vec2,
        radius: f32,
        bisector_angle: f32,
        half_angle: f32,
    ) -> Result<Self, GeomError> {
        Self::new(center, center + polar_to_cartesian(radius, bisector_angle), half_angle)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn rim(&self) -> Vec2 {
        self.rim
    }

    #[inline]
    pub fn half_angle(&self) -> f32 {
        self.half_angle
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.center.distance(self.rim)
    }

    /// Unit direction from the center through the middle of the span.
    #[inline]
    pub fn bisector(&self) -> Vec2 {
        (self.rim - self.center).normalize_or_zero()
    }

    /// The two span endpoints: the rim rotated by `±half_angle`.
    pub fn endpoints(&self) -> (Vec2, Vec2) {
        let spoke = self.rim - self.center;
        (
            self.center + Vec2::from_angle(-self.half_angle).rotate(spoke),
            self.center + Vec2::from_angle(self.half_angle).rotate(spoke),
        )
    }

    /// Whether a direction from the center falls within the angular span.
    /// Inclusive at the boundary: a direction exactly at `±half_angle`
    /// counts as inside.
    #[inline]
    pub fn contains_direction(&self, dir: Vec2) -> bool {
        let d = dir.normalize_or_zero();
        d.dot(self.bisector()) >= self.half_angle.cos() - consts::ANGLE_COS_SLACK
    }

    /// Distance from `p` to the arc and the nearest point on the curve.
    pub fn distance_to(&self, p: Vec2) -> (f32, Vec2) {
        let (e0, e1) = self.endpoints();
        let mut best = (p.distance(e0), e0);
        let d1 = p.distance(e1);
        if d1 < best.0 {
            best = (d1, e1);
        }
        let off = p - self.center;
        if off.length_squared() > 1e-12 && self.contains_direction(off) {
            let radial = (off.length() - self.radius()).abs();
            if radial < best.0 {
                best = (radial, self.center + off.normalize_or_zero() * self.radius());
            }
        }
        best
    }

    /// Bounds over the rim, both endpoints, the center, and whichever
    /// axis-aligned extremes of the full circle fall within the span.
    pub fn bbox(&self) -> BBox {
        let (e0, e1) = self.endpoints();
        let mut bb = BBox::from_points([self.center, self.rim]);
        bb.extend_box(&BBox::from_points([e0, e1]));
        let r = self.radius();
        for axis in [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y] {
            if self.contains_direction(axis) {
                bb.extend(self.center + axis * r);
            }
        }
        bb
    }

    /// Swept-circle proximity test. See `Contact::from_proximity` for the
    /// hit policy.
    pub fn sweep_circle(&self, radius: f32, from: Vec2, to: Vec2) -> Option<Contact> {
        let area = BBox::from_points([from, to]).inflate(radius + consts::CONTACT_SKIN);
        if !area.overlaps(&self.bbox()) {
            return None;
        }
        let (dist, nearest) = self.distance_to(from);
        Contact::from_proximity(nearest, dist, radius, from, to)
    }

    /// Exact ray/arc intersection: smallest root of `|o + t*d| = radius`
    /// in `[0, 1]` whose point lies within the span. Normal is the outward
    /// radial at the hit.
    pub fn cast_ray(&self, from: Vec2, to: Vec2) -> Option<RayHit> {
        let o = from - self.center;
        let d = to - from;
        let a = d.length_squared();
        if a < 1e-12 {
            return None;
        }
        let r = self.radius();
        let b = 2.0 * o.dot(d);
        let c = o.length_squared() - r * r;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        for t in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
            if !(0.0..=1.0).contains(&t) {
                continue;
            }
            let point = from + d * t;
            let off = point - self.center;
            if self.contains_direction(off) {
                return Some(RayHit { point, normal: off.normalize_or_zero(), t });
            }
        }
        None
    }
}
