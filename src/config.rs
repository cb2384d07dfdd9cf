//! Run parameters shared by the library and the binaries.

use crate::error::SimError;
use crate::kd_tree::THETA;

pub const DEFAULT_DT: f64 = 1e-3;
pub const DEFAULT_SEED: u64 = 0x5eed;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Barnes-Hut opening angle.
    pub theta: f64,
    pub dt: f64,
    pub steps: usize,
    /// Seed for the pivot selection during tree builds.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            theta: THETA,
            dt: DEFAULT_DT,
            steps: 1,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.theta.is_finite() || self.theta < 0.0 {
            return Err(SimError::InvalidTheta(self.theta));
        }
        // dt == 0 is allowed and just yields a static run.
        if !self.dt.is_finite() {
            return Err(SimError::InvalidTimeStep(self.dt));
        }
        Ok(())
    }
}
