//! Data-driven solver knobs
//!
//! Everything the contact solver treats as balance data rather than code:
//! friction and the relaxation loop's cap and tolerance. Serializable so
//! hosts can ship tuning alongside level data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Rejected knob values.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TuningError {
    /// Friction coefficients below zero
    #[error("negative friction coefficient {0}")]
    NegativeFriction(f32),
    /// A relaxation loop that never runs cannot resolve anything
    #[error("relax_passes must be at least 1")]
    ZeroRelaxPasses,
}

/// Contact-solver tuning for one mover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoverTuning {
    /// Contact friction coefficient (0 = frictionless)
    pub friction: f32,
    /// Upper bound on relaxation passes per step
    pub relax_passes: u32,
    /// Working-force change below which relaxation stops early
    pub relax_tolerance: f32,
}

impl Default for MoverTuning {
    fn default() -> Self {
        Self {
            friction: consts::FRICTION,
            relax_passes: consts::RELAX_PASSES,
            relax_tolerance: consts::RELAX_TOLERANCE,
        }
    }
}

impl MoverTuning {
    /// Checks the knob ranges; called by `Mover::new`.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.friction < 0.0 || self.friction.is_nan() {
            return Err(TuningError::NegativeFriction(self.friction));
        }
        if self.relax_passes == 0 {
            return Err(TuningError::ZeroRelaxPasses);
        }
        Ok(())
    }

    /// Frictionless variant, useful for pure-bounce setups and tests.
    pub fn frictionless() -> Self {
        Self { friction: 0.0, ..Self::default() }
    }
}
