//! Line-segment collision primitive
//!
//! Distance queries clamp the projection onto the segment; the swept-circle
//! test is a start-of-step proximity check rather than a true continuous
//! sweep, so the exact crossing test lives separately in `cast_ray`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::bounds::BBox;
use crate::consts;

use super::contact::{Contact, RayHit};
use super::shape::GeomError;

/// Line segment between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    a: Vec2,
    b: Vec2,
}

impl Segment {
    /// Rejects segments shorter than `MIN_FEATURE_LEN`.
    pub fn new(a: Vec2, b: Vec2) -> Result<Self, GeomError> {
        if a.distance_squared(b) < consts::MIN_FEATURE_LEN * consts::MIN_FEATURE_LEN {
            return Err(GeomError::DegenerateSegment);
        }
        Ok(Self { a, b })
    }

    #[inline]
    pub fn a(&self) -> Vec2 {
        self.a
    }

    #[inline]
    pub fn b(&self) -> Vec2 {
        self.b
    }

    pub fn bbox(&self) -> BBox {
        BBox::from_points([self.a, self.b])
    }

    /// Distance from `p` to the segment and the nearest point on it.
    pub fn distance_to(&self, p: Vec2) -> (f32, Vec2) {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq < 1e-12 {
            // Unreachable through `new`, but keeps the math NaN-free.
            return (p.distance(self.a), self.a);
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        let nearest = self.a.lerp(self.b, t);
        (p.distance(nearest), nearest)
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

    /// Exact segment/segment crossing. Strict on both sides: grazing an
    /// endpoint or running collinear counts as a miss.
    pub fn cast_ray(&self, from: Vec2, to: Vec2) -> Option<RayHit> {
        let d1 = orient(self.a, self.b, from);
        let d2 = orient(self.a, self.b, to);
        if d1 * d2 >= 0.0 {
            return None;
        }
        if orient(from, to, self.a) * orient(from, to, self.b) >= 0.0 {
            return None;
        }
        // Signed distances straddle zero, so the denominator cannot vanish.
        let t = d1 / (d1 - d2);
        let point = from.lerp(to, t);
        let ab = self.b - self.a;
        let perp = Vec2::new(-ab.y, ab.x).normalize_or_zero();
        let normal = if perp.dot(from - point) < 0.0 { -perp } else { perp };
        Some(RayHit { point, normal, t })
    }
}

/// Twice the signed area of triangle `p q r`; positive when `r` lies to the
/// left of `p -> q`.
#[inline]
fn orient(p: Vec2, q: Vec2, r: Vec2) -> f32 {
    (q - p).perp_dot(r - p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::contact::SurfaceKind;
    use proptest::prelude::*;

    fn floor() -> Segment {
        Segment::new(Vec2::new(0.0, 500.0), Vec2::new(800.0, 500.0)).unwrap()
    }

    #[test]
    fn test_new_rejects_degenerate() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(Segment::new(p, p), Err(GeomError::DegenerateSegment));
        assert!(Segment::new(p, p + Vec2::new(1e-5, 0.0)).is_err());
        assert!(Segment::new(p, p + Vec2::new(1.0, 0.0)).is_ok());
    }

    #[test]
    fn test_distance_interior_projection() {
        let (dist, nearest) = floor().distance_to(Vec2::new(400.0, 480.0));
        assert!((dist - 20.0).abs() < 1e-4);
        assert!((nearest - Vec2::new(400.0, 500.0)).length() < 1e-4);
    }

    #[test]
    fn test_distance_clamps_to_endpoints() {
        let seg = floor();
        let (dist, nearest) = seg.distance_to(Vec2::new(-30.0, 460.0));
        assert!((nearest - Vec2::new(0.0, 500.0)).length() < 1e-4);
        assert!((dist - Vec2::new(-30.0, 460.0).distance(Vec2::new(0.0, 500.0))).abs() < 1e-4);
        let (_, nearest) = seg.distance_to(Vec2::new(900.0, 500.0));
        assert!((nearest - Vec2::new(800.0, 500.0)).length() < 1e-4);
    }

    #[test]
    fn test_sweep_resting_contact() {
        // Hovering one radius above the floor and drifting down: contact
        // with ~zero depth every step.
        let seg = floor();
        let from = Vec2::new(400.0, 480.0);
        let to = Vec2::new(400.0, 480.1);
        let hit = seg.sweep_circle(20.0, from, to).unwrap();
        assert!(hit.depth < 1e-4);
        assert!((hit.normal - Vec2::new(0.0, -1.0)).length() < 1e-5);
        assert_eq!(hit.kind, SurfaceKind::Ground);
    }

    #[test]
    fn test_sweep_moving_away_misses() {
        let seg = floor();
        let from = Vec2::new(400.0, 480.0);
        let to = Vec2::new(400.0, 479.0);
        assert!(seg.sweep_circle(20.0, from, to).is_none());
    }

    #[test]
    fn test_sweep_out_of_range_misses() {
        // Fast fall that starts out of range passes straight through.
        let seg = floor();
        let from = Vec2::new(400.0, 300.0);
        let to = Vec2::new(400.0, 700.0);
        assert!(seg.sweep_circle(20.0, from, to).is_none());
    }

    #[test]
    fn test_cast_ray_crossing() {
        let seg = floor();
        let hit = seg
            .cast_ray(Vec2::new(400.0, 490.0), Vec2::new(400.0, 510.0))
            .unwrap();
        assert!((hit.point - Vec2::new(400.0, 500.0)).length() < 1e-3);
        assert!((hit.t - 0.5).abs() < 1e-4);
        // Normal faces the ray origin (above the floor).
        assert!((hit.normal - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_cast_ray_strict_misses() {
        let seg = floor();
        // Parallel above the floor.
        assert!(seg.cast_ray(Vec2::new(0.0, 490.0), Vec2::new(800.0, 490.0)).is_none());
        // Ends exactly on the line: strict sidedness rejects it.
        assert!(seg.cast_ray(Vec2::new(400.0, 490.0), Vec2::new(400.0, 500.0)).is_none());
        // Crosses the supporting line beyond endpoint b.
        assert!(seg.cast_ray(Vec2::new(900.0, 490.0), Vec2::new(900.0, 510.0)).is_none());
    }

    #[test]
    fn test_cast_ray_agrees_with_tiny_sweep() {
        let seg = floor();
        let r = 1e-3;
        // Near-surface crossing: both report a hit.
        let from = Vec2::new(400.0, 499.996);
        let to = Vec2::new(400.0, 500.003);
        assert!(seg.cast_ray(from, to).is_some());
        assert!(seg.sweep_circle(r, from, to).is_some());
        // Backing off: both miss.
        let away = Vec2::new(400.0, 499.99);
        assert!(seg.cast_ray(from, away).is_none());
        assert!(seg.sweep_circle(r, from, away).is_none());
        // Far from the surface: both miss.
        let far_a = Vec2::new(400.0, 450.0);
        let far_b = Vec2::new(400.0, 470.0);
        assert!(seg.cast_ray(far_a, far_b).is_none());
        assert!(seg.sweep_circle(r, far_a, far_b).is_none());
    }

    proptest! {
        /// Analytic distance matches a dense sampling of the segment.
        #[test]
        fn prop_distance_matches_sampling(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            px in -600.0f32..600.0, py in -600.0f32..600.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assume!(a.distance(b) > 0.01);
            let seg = Segment::new(a, b).unwrap();
            let p = Vec2::new(px, py);
            let (dist, nearest) = seg.distance_to(p);

            const SAMPLES: usize = 256;
            let mut brute = f32::INFINITY;
            for i in 0..=SAMPLES {
                let t = i as f32 / SAMPLES as f32;
                brute = brute.min(p.distance(a.lerp(b, t)));
            }
            // Never worse than any sample, and no further below the brute
            // minimum than the sampling resolution allows.
            prop_assert!(dist <= brute + 1e-3);
            prop_assert!(brute - dist <= a.distance(b) / SAMPLES as f32 + 1e-3);
            // The reported nearest point realizes the reported distance.
            prop_assert!((p.distance(nearest) - dist).abs() < 1e-3);
        }
    }
}
