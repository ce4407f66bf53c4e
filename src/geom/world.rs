//! The collision world: shape arena, pending queue, and sweep queries
//!
//! Shapes are owned by the world and addressed by stable handles. New
//! shapes wait in a pending queue until the next `update()` so queries in
//! flight never see a half-registered set. Maintenance (`update`, `settle`,
//! `clear`) takes `&mut self` while queries take `&self`, which is what
//! makes query-during-update unrepresentable.

use std::cell::Cell;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::bounds::BBox;
use crate::consts;

use super::contact::{Contact, RayHit};
use super::shape::Shape;

/// Stable handle into the world's shape arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(u32);

impl ShapeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Broad-phase seam: where shapes are homed for gather and relocation.
///
/// The provided `FlatIndex` is a single cell. Finer subdivisions (quad
/// tree, BVH) plug in here without touching the world's query or update
/// paths.
pub trait SpatialIndex {
    /// Homes a newly activated shape.
    fn insert(&mut self, id: ShapeId, bounds: &BBox);
    /// Re-homes a shape whose geometry changed. Returns `true` only when
    /// the shape actually moved to a different cell.
    fn relocate(&mut self, id: ShapeId, bounds: &BBox) -> bool;
    /// Pushes every shape that may overlap `area` into `out`.
    fn gather(&self, area: &BBox, out: &mut Vec<ShapeId>);
    fn clear(&mut self);
}

/// Single-cell index: every shape is a candidate for every query, and the
/// cell is its own top level so relocation never moves anything.
#[derive(Debug, Default)]
pub struct FlatIndex {
    ids: Vec<ShapeId>,
}

impl SpatialIndex for FlatIndex {
    fn insert(&mut self, id: ShapeId, _bounds: &BBox) {
        self.ids.push(id);
    }

    fn relocate(&mut self, _id: ShapeId, _bounds: &BBox) -> bool {
        false
    }

    fn gather(&self, _area: &BBox, out: &mut Vec<ShapeId>) {
        out.extend_from_slice(&self.ids);
    }

    fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Static collision geometry for one scene.
pub struct CollisionWorld<I: SpatialIndex = FlatIndex> {
    shapes: Vec<Shape>,
    pending: Vec<Shape>,
    index: I,
    last_hit: Cell<Option<ShapeId>>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::with_index(FlatIndex::default())
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: SpatialIndex> CollisionWorld<I> {
    pub fn with_index(index: I) -> Self {
        Self { shapes: Vec::new(), pending: Vec::new(), index, last_hit: Cell::new(None) }
    }

    /// Queues a shape for activation by the next `update()` and hands back
    /// its permanent handle. In-flight queries are unaffected.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId((self.shapes.len() + self.pending.len()) as u32);
        self.pending.push(shape);
        id
    }

    /// Looks a shape up whether it is active or still pending.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        let i = id.index();
        self.shapes.get(i).or_else(|| self.pending.get(i - self.shapes.len()))
    }

    /// Mutable access, for geometry edits that flag relocation.
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        let i = id.index();
        if i < self.shapes.len() {
            self.shapes.get_mut(i)
        } else {
            let base = self.shapes.len();
            self.pending.get_mut(i - base)
        }
    }

    /// Number of active shapes (pending ones not yet counted).
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Active shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().enumerate().map(|(i, s)| (ShapeId(i as u32), s))
    }

    /// One maintenance pass: merges the pending queue into the active set,
    /// then consumes each shape's moved flag, relocating flagged shapes.
    /// Returns whether any relocation happened; callers repeat until
    /// `false` (see `settle`).
    pub fn update(&mut self) -> bool {
        for shape in self.pending.drain(..) {
            let id = ShapeId(self.shapes.len() as u32);
            self.index.insert(id, &shape.bbox());
            self.shapes.push(shape);
        }
        let mut relocated = false;
        for (i, shape) in self.shapes.iter_mut().enumerate() {
            if shape.take_moved() {
                relocated |= self.index.relocate(ShapeId(i as u32), &shape.bbox());
            }
        }
        relocated
    }

    /// Runs `update()` to a fixed point, capped at `WORLD_SETTLE_CAP`
    /// passes. Returns whether the fixed point was reached.
    pub fn settle(&mut self) -> bool {
        for _ in 0..consts::WORLD_SETTLE_CAP {
            if !self.update() {
                return true;
            }
        }
        log::warn!(
            "collision world still relocating after {} passes",
            consts::WORLD_SETTLE_CAP
        );
        false
    }

    /// Sweeps a circle from `from` to `to` against every active shape,
    /// replacing `out` with the contacts found. Returns whether anything
    /// hit. The last hitting shape is remembered for debug inspection.
    pub fn query_sweep_circle(
        &self,
        radius: f32,
        from: Vec2,
        to: Vec2,
        out: &mut Vec<Contact>,
    ) -> bool {
        out.clear();
        self.last_hit.set(None);
        let area = BBox::from_points([from, to]).inflate(radius + consts::CONTACT_SKIN);
        let mut candidates = Vec::new();
        self.index.gather(&area, &mut candidates);
        for id in candidates {
            let Some(shape) = self.shapes.get(id.index()) else {
                continue;
            };
            if let Some(mut contact) = shape.sweep_circle(radius, from, to) {
                contact.shape = Some(id);
                out.push(contact);
                self.last_hit.set(Some(id));
            }
        }
        !out.is_empty()
    }

    /// Debug query: nearest exact ray hit across the active set.
    pub fn cast_ray(&self, from: Vec2, to: Vec2) -> Option<(ShapeId, RayHit)> {
        let mut best: Option<(ShapeId, RayHit)> = None;
        for (id, shape) in self.iter() {
            if let Some(hit) = shape.cast_ray(from, to) {
                if best.as_ref().is_none_or(|(_, b)| hit.t < b.t) {
                    best = Some((id, hit));
                }
            }
        }
        if let Some((id, _)) = best {
            self.last_hit.set(Some(id));
        }
        best
    }

    /// Shape behind the most recent query hit, if any. Debug only.
    pub fn last_hit(&self) -> Option<ShapeId> {
        self.last_hit.get()
    }

    /// Drops active and pending shapes together (scene teardown). Handles
    /// restart from zero.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.pending.clear();
        self.index.clear();
        self.last_hit.set(None);
    }
}
