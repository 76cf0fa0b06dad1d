//! # Joint controllers module
//!
//! This module provides the PID controller used by the control simulator. One
//! controller acts on all joints at once with independent (diagonal) gains.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::robot_model::JointVector;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A joint space PID controller
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PidController {
    /// Proportional gains
    k_p: JointVector,

    /// Integral gains
    k_i: JointVector,

    /// Dervative gains
    k_d: JointVector,

    /// The integral accumulation
    integral: JointVector,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: JointVector, k_i: JointVector, k_d: JointVector) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            integral: JointVector::zeros(),
        }
    }

    /// Create a new controller from the simulator parameters.
    pub fn from_params(params: &super::Params) -> Self {
        Self::new(
            JointVector::from(params.k_p),
            JointVector::from(params.k_i),
            JointVector::from(params.k_d),
        )
    }

    /// Clear the integral accumulation.
    pub fn reset(&mut self) {
        self.integral = JointVector::zeros();
    }

    /// The current integral accumulation.
    pub fn integral(&self) -> &JointVector {
        &self.integral
    }

    /// Get the value of the controller for the given error.
    ///
    /// Unlike a purely time-aware controller the error rate is supplied by
    /// the caller (the velocity error is known exactly), as is the time step
    /// over which the integral accumulates. The integral is never limited.
    pub fn get(&mut self, error: &JointVector, error_rate: &JointVector, dt_s: f64) -> JointVector {
        // Accumulate the integral term
        self.integral += error * dt_s;

        // Calculate the output
        self.k_p.component_mul(error)
            + self.k_i.component_mul(&self.integral)
            + self.k_d.component_mul(error_rate)
    }
}
