//! # Inverse kinematics
//!
//! Closed form inverse kinematics for the SCARA arm. The two revolute joints
//! place the tool in the horizontal plane and the prismatic joint sets its
//! height. Of the two planar solutions only the "elbow down" one (negative
//! elbow angle) is ever produced.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector3;

use crate::robot_model::{self, JointVector};
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Inverse kinematics solver for the 2R + 1P arm.
#[derive(Debug, Clone)]
pub struct InvKinSolver {
    /// Shoulder link length
    l1_m: f64,

    /// Elbow link length
    l2_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while solving the inverse kinematics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvKinError {
    #[error(
        "Target ({x:.3}, {y:.3}, {z:.3}) m is unreachable: planar distance {reach_m:.3} m \
        is outside [{min_m:.3}, {max_m:.3}] m"
    )]
    Unreachable {
        x: f64,
        y: f64,
        z: f64,
        reach_m: f64,
        min_m: f64,
        max_m: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InvKinSolver {
    /// Create a new solver for the arm described by the given parameters.
    pub fn new(params: &robot_model::Params) -> Self {
        Self {
            l1_m: params.l1(),
            l2_m: params.l2(),
        }
    }

    /// Minimum and maximum planar distance the arm can reach.
    pub fn reach_limits_m(&self) -> (f64, f64) {
        ((self.l1_m - self.l2_m).abs(), self.l1_m + self.l2_m)
    }

    /// Solve for the joint configuration placing the tool at `target_m`.
    ///
    /// The target is given in the base frame. Targets whose distance from the
    /// base axis lies outside the workspace annulus (bounds included in the
    /// workspace) are rejected with `InvKinError::Unreachable`.
    pub fn solve(&self, target_m: &Vector3<f64>) -> Result<JointVector, InvKinError> {
        let (x, y, z) = (target_m[0], target_m[1], target_m[2]);
        let (l1, l2) = (self.l1_m, self.l2_m);

        // Reachability in the plane of the revolute joints
        let reach_m = (x.powi(2) + y.powi(2)).sqrt();
        let (min_m, max_m) = self.reach_limits_m();

        if !(min_m <= reach_m && reach_m <= max_m) {
            return Err(InvKinError::Unreachable {
                x,
                y,
                z,
                reach_m,
                min_m,
                max_m,
            });
        }

        // Prismatic extension is directly the (inverted) height
        let q3 = -z;

        // Law of cosines for the elbow. Near the edge of the annulus rounding can push the cosine
        // just past unity, so clamp it.
        let cos_q2 = (x.powi(2) + y.powi(2) - l1.powi(2) - l2.powi(2)) / (2.0 * l1 * l2);
        let cos_q2 = maths::clamp(&cos_q2, &-1.0, &1.0);
        let q2 = -cos_q2.acos();

        // Shoulder angle is the target bearing less the elbow's contribution
        let k1 = l1 + l2 * q2.cos();
        let k2 = l2 * q2.sin();
        let q1 = y.atan2(x) - k2.atan2(k1);

        trace!(
            "IK ({:.3}, {:.3}, {:.3}) -> ({:.4}, {:.4}, {:.4})",
            x,
            y,
            z,
            q1,
            q2,
            q3
        );

        Ok(JointVector::new(q1, q2, q3))
    }
}
