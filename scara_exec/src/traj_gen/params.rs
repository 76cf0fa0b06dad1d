//! Task parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters describing a pick and place style task
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Joint configuration the task starts from.
    ///
    /// Units: radians, radians, meters
    pub home_pos: [f64; 3],

    /// Name by which legs refer to the home configuration
    pub home_name: String,

    /// Cartesian waypoints, solved in declaration order
    pub waypoints: Vec<WaypointParams>,

    /// Named timing profiles used by the legs
    pub profiles: BTreeMap<String, ProfileParams>,

    /// Ordered legs of the task
    pub legs: Vec<LegParams>,
}

/// A named Cartesian waypoint
#[derive(Deserialize, Debug, Clone)]
pub struct WaypointParams {
    pub name: String,

    /// Position of the tool in the base frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// If present an extra waypoint `<name>_above` is defined this far above
    /// the position.
    ///
    /// Units: meters
    #[serde(default)]
    pub lift_m: Option<f64>,
}

/// Timing of a single leg
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ProfileParams {
    /// Units: seconds
    pub duration_s: f64,

    /// Number of samples in the leg, including both ends
    pub num_samples: usize,
}

/// A single leg of the task, moving from wherever the previous leg ended
#[derive(Deserialize, Debug, Clone)]
pub struct LegParams {
    /// Name of the waypoint the leg ends at
    pub to: String,

    /// Name of the timing profile of the leg
    pub profile: String,
}
