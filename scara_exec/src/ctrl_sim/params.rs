//! Control simulator parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

use crate::robot_model::NUM_JOINTS;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the control simulator
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Params {
    /// Fixed integration time step
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Proportional gain of each joint
    pub k_p: [f64; NUM_JOINTS],

    /// Integral gain of each joint
    pub k_i: [f64; NUM_JOINTS],

    /// Derivative gain of each joint
    pub k_d: [f64; NUM_JOINTS],
}
