//! Collision geometry module
//!
//! Static world geometry and the queries against it. This module must stay
//! pure and deterministic:
//! - No time source: sweeps are explicit `from -> to` queries
//! - Stable iteration order (by shape handle)
//! - No rendering or platform dependencies
//!
//! The swept-circle test is a start-of-step proximity check; the exact
//! parametric intersection lives separately behind `cast_ray` for debug
//! queries.

pub mod arc;
pub mod contact;
pub mod segment;
pub mod shape;
pub mod world;

pub use arc::Arc;
pub use contact::{Contact, RayHit, SurfaceKind};
pub use segment::Segment;
pub use shape::{GeomError, Shape, ShapeKind};
pub use world::{CollisionWorld, FlatIndex, ShapeId, SpatialIndex};
