//! Quintic joint space moves

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::TrajGenError;
use crate::robot_model::JointVector;
use util::maths::poly_val;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Coefficients of the normalised blend `s(tau) = 6 tau^5 - 15 tau^4 + 10 tau^3`, highest power
/// first. The blend goes from 0 to 1 with zero first and second derivatives at both ends.
const BLEND_COEFFS: [f64; 6] = [6.0, -15.0, 10.0, 0.0, 0.0, 0.0];

/// Coefficients of `ds/dtau`.
const BLEND_RATE_COEFFS: [f64; 5] = [30.0, -60.0, 30.0, 0.0, 0.0];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A sampled joint space trajectory.
///
/// Position and velocity sequences always have the same length, one entry per
/// sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JointTrajectory {
    /// Joint positions.
    ///
    /// Units: radians, radians, meters
    pub pos: Vec<JointVector>,

    /// Joint velocities.
    ///
    /// Units: radians/second, radians/second, meters/second
    pub vel: Vec<JointVector>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointTrajectory {
    /// Generate a quintic move from `start` to `end` sampled at the given times.
    ///
    /// The times must be strictly increasing and contain at least two samples. They are
    /// normalised over `[times[0], times[last]]`, so the move always starts at the first sample
    /// and finishes at the last.
    pub fn quintic(
        start: &JointVector,
        end: &JointVector,
        times: &[f64],
    ) -> Result<Self, TrajGenError> {
        if times.len() < 2 {
            return Err(TrajGenError::TooFewSamples(times.len()));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(TrajGenError::NotIncreasing(i + 1));
        }

        let t0 = times[0];
        let duration_s = times[times.len() - 1] - t0;
        let delta = end - start;

        let mut traj = Self {
            pos: Vec::with_capacity(times.len()),
            vel: Vec::with_capacity(times.len()),
        };

        for t in times {
            let tau = (t - t0) / duration_s;

            traj.pos.push(start + delta * poly_val(&tau, &BLEND_COEFFS));
            traj.vel
                .push(delta * (poly_val(&tau, &BLEND_RATE_COEFFS) / duration_s));
        }

        Ok(traj)
    }

    /// Number of samples in the trajectory.
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    /// Returns true if the trajectory has no samples.
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Append another trajectory to the end of this one.
    pub fn append(&mut self, mut other: Self) {
        self.pos.append(&mut other.pos);
        self.vel.append(&mut other.vel);
    }

    /// Iterate over (position, velocity) sample pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&JointVector, &JointVector)> {
        self.pos.iter().zip(self.vel.iter())
    }
}
