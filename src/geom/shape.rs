//! Closed shape union with cached bounds and the relocation flag
//!
//! `Shape` owns everything derived from its geometry: the surface tag the
//! mover's policy table keys on, the cached bounding box recomputed on every
//! parameter change, and an edge-triggered `moved` flag the world consumes
//! destructively during relocation.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bounds::BBox;

use super::arc::Arc;
use super::contact::{Contact, RayHit, SurfaceKind};
use super::segment::Segment;

/// Validation failures for collision geometry.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeomError {
    /// Segment endpoints closer than the minimum feature length
    #[error("degenerate segment: endpoints coincide")]
    DegenerateSegment,
    /// Arc rim on top of its center
    #[error("degenerate arc: zero radius")]
    DegenerateArc,
    /// Arc half-angle outside (0, π]
    #[error("arc half-angle {0} outside (0, pi]")]
    InvalidHalfAngle(f32),
}

/// The two collision primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Segment(Segment),
    Arc(Arc),
}

impl ShapeKind {
    fn bbox(&self) -> BBox {
        match self {
            Self::Segment(s) => s.bbox(),
            Self::Arc(a) => a.bbox(),
        }
    }
}

/// A world shape: primitive plus surface tag and derived state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    kind: ShapeKind,
    surface: SurfaceKind,
    bbox: BBox,
    moved: bool,
}

impl Shape {
    pub fn segment(a: Vec2, b: Vec2, surface: SurfaceKind) -> Result<Self, GeomError> {
        Ok(Self::from_kind(ShapeKind::Segment(Segment::new(a, b)?), surface))
    }

    pub fn arc(
        center: Vec2,
        rim: Vec2,
        half_angle: f32,
        surface: SurfaceKind,
    ) -> Result<Self, GeomError> {
        Ok(Self::from_kind(ShapeKind::Arc(Arc::new(center, rim, half_angle)?), surface))
    }

    fn from_kind(kind: ShapeKind, surface: SurfaceKind) -> Self {
        Self { kind, surface, bbox: kind.bbox(), moved: true }
    }

    /// Replaces the geometry: revalidates, recomputes the cached bounds,
    /// and flags the shape for relocation.
    pub fn set_segment(&mut self, a: Vec2, b: Vec2) -> Result<(), GeomError> {
        self.replace(ShapeKind::Segment(Segment::new(a, b)?));
        Ok(())
    }

    /// Replaces the geometry with an arc. Same derived-state rules as
    /// `set_segment`.
    pub fn set_arc(&mut self, center: Vec2, rim: Vec2, half_angle: f32) -> Result<(), GeomError> {
        self.replace(ShapeKind::Arc(Arc::new(center, rim, half_angle)?));
        Ok(())
    }

    fn replace(&mut self, kind: ShapeKind) {
        self.kind = kind;
        self.bbox = self.kind.bbox();
        self.moved = true;
    }

    pub fn set_surface(&mut self, surface: SurfaceKind) {
        self.surface = surface;
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    #[inline]
    pub fn surface(&self) -> SurfaceKind {
        self.surface
    }

    /// Cached bounds; recomputed only when the geometry changes.
    #[inline]
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Destructive read of the relocation flag. Returns `true` at most once
    /// per geometry change.
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    /// Distance from `p` to the surface and the nearest point on it.
    pub fn distance_to(&self, p: Vec2) -> (f32, Vec2) {
        match &self.kind {
            ShapeKind::Segment(s) => s.distance_to(p),
            ShapeKind::Arc(a) => a.distance_to(p),
        }
    }

    /// Swept-circle proximity test, with the contact stamped by this
    /// shape's surface tag.
    pub fn sweep_circle(&self, radius: f32, from: Vec2, to: Vec2) -> Option<Contact> {
        let mut contact = match &self.kind {
            ShapeKind::Segment(s) => s.sweep_circle(radius, from, to),
            ShapeKind::Arc(a) => a.sweep_circle(radius, from, to),
        }?;
        contact.kind = self.surface;
        Some(contact)
    }

    /// Exact ray intersection for debug queries.
    pub fn cast_ray(&self, from: Vec2, to: Vec2) -> Option<RayHit> {
        match &self.kind {
            ShapeKind::Segment(s) => s.cast_ray(from, to),
            ShapeKind::Arc(a) => a.cast_ray(from, to),
        }
    }
}
