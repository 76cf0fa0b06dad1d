//! # Trajectory generation module
//!
//! Joint space trajectories are built from quintic polynomial moves between
//! two configurations, which start and end at rest. A task is an ordered list
//! of such moves (legs) between named waypoints, concatenated into a single
//! desired trajectory for the controller to track.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod quintic;
mod task;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use quintic::*;
pub use task::*;

use crate::inv_kin::InvKinError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while generating trajectories.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrajGenError {
    #[error("The time vector must contain at least 2 samples, found {0}")]
    TooFewSamples(usize),

    #[error("The time vector must be strictly increasing, sample {0} is not")]
    NotIncreasing(usize),
}

/// Possible errors that can occur while building a task.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskError {
    #[error("Waypoint {name} is out of the robot's reach: {source}")]
    UnreachableWaypoint { name: String, source: InvKinError },

    #[error("The task refers to waypoint {0}, which is not defined")]
    UnknownWaypoint(String),

    #[error("Waypoint {0} is defined more than once")]
    DuplicateWaypoint(String),

    #[error("Leg {leg} uses timing profile {profile}, which is not defined")]
    UnknownProfile { leg: usize, profile: String },

    #[error("Could not generate leg {leg}: {source}")]
    LegError { leg: usize, source: TrajGenError },
}
