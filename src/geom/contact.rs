//! Contact records produced by swept-circle and ray queries

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;

use super::world::ShapeId;

/// Surface classification carried by shapes and inherited by contacts.
///
/// The mover maps each kind to a response through its policy table:
/// ground surfaces feed the relaxation solver, walls hard-stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    #[default]
    Ground,
    Wall,
}

/// One swept-circle contact against a static surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Surface point pushed out along the normal by `radius + skin/2`
    pub point: Vec2,
    /// Unit normal from the surface toward the mover center (zero only
    /// when the center sits exactly on the surface)
    pub normal: Vec2,
    /// Penetration at the sweep start, `max(0, radius - distance)`
    pub depth: f32,
    /// Reaction magnitude accumulated by the relaxation solver
    pub reaction: f32,
    /// Classification inherited from the source shape
    pub kind: SurfaceKind,
    /// Source shape handle, stamped by world-level queries
    pub shape: Option<ShapeId>,
}

impl Contact {
    /// Proximity contact for a swept circle whose start center sits `dist`
    /// away from `nearest` on some surface.
    ///
    /// A contact is reported when the start is within `radius + skin` of
    /// the surface AND the destination is strictly closer to the nearest
    /// point than the start. Sweeps that begin out of range pass through
    /// (fast movers can tunnel); sweeps moving away never collide.
    pub(crate) fn from_proximity(
        nearest: Vec2,
        dist: f32,
        radius: f32,
        from: Vec2,
        to: Vec2,
    ) -> Option<Self> {
        if dist > radius + consts::CONTACT_SKIN {
            return None;
        }
        if to.distance_squared(nearest) >= from.distance_squared(nearest) {
            return None;
        }
        let normal = (from - nearest).normalize_or_zero();
        Some(Self {
            point: nearest + normal * (radius + consts::CONTACT_SKIN * 0.5),
            normal,
            depth: (radius - dist).max(0.0),
            reaction: 0.0,
            kind: SurfaceKind::Ground,
            shape: None,
        })
    }
}

/// Exact ray intersection, for debug and visualization queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RayHit {
    /// Intersection point on the surface
    pub point: Vec2,
    /// Unit surface normal facing the ray origin's side
    pub normal: Vec2,
    /// Parameter along `from -> to`, in `[0, 1]`
    pub t: f32,
}
