//! Circular mover with multi-contact force relaxation
//!
//! One `step` advances the mover a fixed timestep: query the world with the
//! tentative sweep, classify the contacts through the surface policy table,
//! relax the frame's force across the contact normals, correct penetration,
//! project the velocity, integrate. Relaxation is iterative with a hard
//! pass cap; hitting the cap degrades the result, never the process.
//!
//! Determinism notes: contacts arrive in stable shape-handle order, the
//! relaxation loop walks them in that order, and nothing here reads a clock
//! or RNG, so identical inputs give identical trajectories.

use glam::Vec2;
use serde::Serialize;
use thiserror::Error;

use crate::consts;
use crate::geom::{CollisionWorld, Contact, SpatialIndex, SurfaceKind};
use crate::tuning::{MoverTuning, TuningError};

/// Mover construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MoverError {
    /// Radius must be positive
    #[error("mover radius {0} must be positive")]
    InvalidRadius(f32),
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// What one step resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StepOutcome {
    /// No contact: plain ballistic integration
    #[default]
    Airborne,
    /// Ground-type contacts only: relaxed and resting or sliding
    Supported,
    /// At least one wall-type contact: hard stop
    Blocked,
}

/// How the solver responds to a contact's surface tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactResponse {
    /// Feed the contact to the relaxation solver
    Relax,
    /// Zero the velocity and skip relaxation for the step
    Stop,
}

/// Policy table mapping surface tags to responses.
fn response(kind: SurfaceKind) -> ContactResponse {
    match kind {
        SurfaceKind::Ground => ContactResponse::Relax,
        SurfaceKind::Wall => ContactResponse::Stop,
    }
}

/// A swept circle pushed around by forces and resolved against the world.
#[derive(Debug, Clone, Serialize)]
pub struct Mover {
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    gravity: Vec2,
    tuning: MoverTuning,
    /// Exactly the contacts of the most recent query, never accumulated
    contacts: Vec<Contact>,
    outcome: StepOutcome,
}

impl Mover {
    /// Rejects non-positive radii and invalid tuning.
    pub fn new(
        pos: Vec2,
        radius: f32,
        gravity: Vec2,
        tuning: MoverTuning,
    ) -> Result<Self, MoverError> {
        if radius <= 0.0 || radius.is_nan() {
            return Err(MoverError::InvalidRadius(radius));
        }
        tuning.validate()?;
        Ok(Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            gravity,
            tuning,
            contacts: Vec::new(),
            outcome: StepOutcome::Airborne,
        })
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Contacts from the most recent step (debug and host inspection).
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Outcome of the most recent step.
    #[inline]
    pub fn outcome(&self) -> StepOutcome {
        self.outcome
    }

    /// Whether the last step ended resting on ground-type contacts. Hosts
    /// gate jump-style controls on this.
    #[inline]
    pub fn supported(&self) -> bool {
        self.outcome == StepOutcome::Supported
    }

    /// Teleports the mover, keeping its velocity.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn set_vel(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    /// Direct velocity change, e.g. a jump kick while supported.
    pub fn apply_impulse(&mut self, delta_v: Vec2) {
        self.vel += delta_v;
    }

    /// Advances one timestep under gravity plus an opaque control force.
    pub fn step<I: SpatialIndex>(
        &mut self,
        world: &CollisionWorld<I>,
        dt: f32,
        control: Vec2,
    ) -> StepOutcome {
        let force = self.gravity + control;
        let to = self.pos + (self.vel + force * dt) * dt;
        world.query_sweep_circle(self.radius, self.pos, to, &mut self.contacts);

        self.outcome = if self.contacts.is_empty() {
            StepOutcome::Airborne
        } else if self.contacts.iter().any(|c| response(c.kind) == ContactResponse::Stop) {
            StepOutcome::Blocked
        } else {
            StepOutcome::Supported
        };

        match self.outcome {
            StepOutcome::Airborne => {
                self.vel += force * dt;
                self.pos += self.vel * dt;
            }
            StepOutcome::Blocked => {
                // Hard stop. No reactions were accumulated, so the
                // correction falls back to full depth per contact.
                self.vel = Vec2::ZERO;
                self.correct_penetration(0.0);
            }
            StepOutcome::Supported => {
                let (working, total) = self.relax(force);
                self.correct_penetration(total);
                self.project_velocity();
                self.vel += working * dt;
                self.pos += self.vel * dt;
            }
        }
        self.outcome
    }

    /// Relaxes the frame force across the contacts: each contact absorbs
    /// the component pushing into it, accumulating its reaction, plus a
    /// friction term opposing the tangential velocity. Repeats until the
    /// working force stops changing or the pass cap is reached. Returns
    /// the leftover working force and the total reaction.
    fn relax(&mut self, force: Vec2) -> (Vec2, f32) {
        let mut working = force;
        let mut total = 0.0;
        let mut converged = false;
        for _ in 0..self.tuning.relax_passes {
            let before = working;
            for contact in &mut self.contacts {
                let push = -contact.normal.dot(working);
                if push > 0.0 {
                    contact.reaction += push;
                    total += push;
                    working += contact.normal * push;
                    let tangential = self.vel - contact.normal * self.vel.dot(contact.normal);
                    working -= tangential.normalize_or_zero() * (push * self.tuning.friction);
                }
            }
            if (working - before).length() <= self.tuning.relax_tolerance {
                converged = true;
                break;
            }
        }
        if !converged {
            // Soft limit: carry on with the partially relaxed force.
            log::debug!("contact relaxation hit the {}-pass cap", self.tuning.relax_passes);
        }
        (working, total)
    }

    /// Pushes the mover out of surfaces it has sunk past the skin, each
    /// contact contributing its share of the total reaction. With no
    /// reaction accumulated every contact pushes by its full depth.
    fn correct_penetration(&mut self, total: f32) {
        for contact in &self.contacts {
            let depth = contact.depth - consts::CONTACT_SKIN;
            if depth <= 0.0 {
                continue;
            }
            let push = if total > 0.0 { depth * contact.reaction / total } else { depth };
            self.pos += contact.normal * push;
        }
    }

    /// Removes the velocity component driving into each contact.
    fn project_velocity(&mut self) {
        for contact in &self.contacts {
            self.vel -= contact.normal * contact.normal.dot(self.vel);
        }
    }
}
