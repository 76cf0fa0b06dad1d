//! # SCARA simulation library.
//!
//! This library allows the executable, benchmarks and other crates in the workspace to access the
//! items defined inside the simulator crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Robot model - kinematics and dynamics of the 2R + 1P arm
pub mod robot_model;

/// Inverse kinematics - closed form, elbow down joint solutions for Cartesian targets
pub mod inv_kin;

/// Trajectory generation - quintic joint moves chained into a complete task
pub mod traj_gen;

/// Singularity analysis - Jacobian rank checks of joint configurations
pub mod singularity;

/// Control simulator - PID tracking of a trajectory through the arm's dynamics
pub mod ctrl_sim;
