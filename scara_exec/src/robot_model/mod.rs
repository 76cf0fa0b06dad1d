//! # Robot model module
//!
//! The robot model provides the kinematic and dynamic quantities the rest of
//! the simulator needs: forward kinematics, the geometric Jacobian, and the
//! terms of the manipulator equation
//!
//! ```text
//! M(q) qdd + C(q, qd) qd + g(q) = tau
//! ```
//!
//! Everything downstream depends only on the `RobotModel` trait, so simpler
//! stand-in models can be substituted in tests.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod scara;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Isometry3, Matrix3, Matrix6x3, Vector3};

// Internal
pub use params::Params;
pub use scara::ScaraModel;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of joints (degrees of freedom) of the manipulator.
pub const NUM_JOINTS: usize = 3;

// ---------------------------------------------------------------------------
// TYPES
// ---------------------------------------------------------------------------

/// A joint space vector, ordered (q1, q2, q3).
///
/// Units: radians, radians, meters (or the matching rates/forces).
pub type JointVector = Vector3<f64>;

/// A 6xN geometric Jacobian. Rows 0-2 map to linear velocity, rows 3-5 to
/// angular velocity, both in the base frame.
pub type Jacobian = Matrix6x3<f64>;

/// An NxN joint space matrix.
pub type JointMatrix = Matrix3<f64>;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Kinematic and dynamic model of the manipulator.
pub trait RobotModel {
    /// Number of joints of the model.
    fn num_joints(&self) -> usize {
        NUM_JOINTS
    }

    /// Pose of the tool in the base frame.
    fn forward_kinematics(&self, q: &JointVector) -> Isometry3<f64>;

    /// The 6xN geometric Jacobian in the base frame.
    fn jacobian(&self, q: &JointVector) -> Jacobian;

    /// The joint space mass (inertia) matrix.
    fn mass_matrix(&self, q: &JointVector) -> JointMatrix;

    /// The Coriolis and centripetal matrix, such that the Coriolis/centripetal
    /// generalised force is `C(q, qd) * qd`.
    fn coriolis_matrix(&self, q: &JointVector, qd: &JointVector) -> JointMatrix;

    /// The generalised gravity load.
    fn gravity_load(&self, q: &JointVector) -> JointVector;
}
