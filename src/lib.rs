//! Trundle - swept-circle collision and contact resolution for curved 2D worlds
//!
//! Core modules:
//! - `geom`: Collision geometry (segments, arcs, the collision world)
//! - `mover`: Circular mover with multi-contact force relaxation
//! - `bounds`: Axis-aligned boxes for the broad phase
//! - `tuning`: Data-driven solver knobs
//! - `scene`: Named scene states with explicit transitions
//! - `playfield`: Demo level and scripted driver
//!
//! Coordinates are screen-style: +y points down, so gravity is `(0, +g)`
//! and a mover resting on a floor at `y = 500` with radius 20 sits at
//! `y = 480`.

pub mod bounds;
pub mod geom;
pub mod mover;
pub mod playfield;
pub mod scene;
pub mod tuning;

pub use bounds::{BBox, Overlap};
pub use geom::{Arc, CollisionWorld, Contact, GeomError, RayHit, Segment, Shape, ShapeId, SurfaceKind};
pub use mover::{Mover, MoverError, StepOutcome};
pub use playfield::{Playfield, PlayfieldError};
pub use scene::{Director, Scene, SceneControl, SceneError};
pub use tuning::MoverTuning;

use glam::Vec2;

/// Kernel configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Proximity slack for swept-circle contact: a surface within
    /// `radius + CONTACT_SKIN` of the sweep start counts as touching.
    /// Also the penetration depth tolerated before position correction.
    pub const CONTACT_SKIN: f32 = 0.005;
    /// Shortest segment length / smallest arc radius accepted at
    /// construction. Anything smaller is degenerate.
    pub const MIN_FEATURE_LEN: f32 = 1e-3;
    /// Cosine slack making arc span boundaries inclusive: a direction
    /// exactly at `half_angle` from the bisector classifies as inside.
    pub const ANGLE_COS_SLACK: f32 = 1e-6;

    /// Default relaxation passes per contact-solve (see `MoverTuning`)
    pub const RELAX_PASSES: u32 = 32;
    /// Default working-force convergence tolerance for the relaxation loop
    pub const RELAX_TOLERANCE: f32 = 1e-4;
    /// Maximum `update()` passes when settling the collision world
    pub const WORLD_SETTLE_CAP: u32 = 64;

    /// Default contact friction coefficient
    pub const FRICTION: f32 = 0.1;

    /// Demo mover radius
    pub const MOVER_RADIUS: f32 = 20.0;
    /// Demo gravity magnitude (+y is down), pixels/s²
    pub const GRAVITY: f32 = 980.0;
    /// Demo horizontal run force
    pub const RUN_FORCE: f32 = 200.0;
    /// Demo jump impulse (applied -y while supported)
    pub const JUMP_IMPULSE: f32 = 300.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
