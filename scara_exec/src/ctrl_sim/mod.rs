//! # Control simulator module
//!
//! The control simulator drives a robot model along a desired joint
//! trajectory using a PID controller, integrating the manipulator dynamics
//!
//! ```text
//! M(q) qdd = tau - C(q, qd) qd - g(q)
//! ```
//!
//! with a fixed step forward (semi-implicit) Euler scheme. At every step the
//! achieved configuration is checked for singularity; singular steps are
//! warned about and counted, but never stop the run.
//!
//! Each step is one call to the module's `proc` function, and `run` calls it
//! for every sample of a trajectory. Everything that happened is kept in a
//! `HistoryLog`, and archived to CSV when the module has been initialised
//! with a session.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod history;
pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use history::*;
pub use params::Params;
pub use state::*;

use crate::singularity::SingularityError;
use util::{archive::ArchiveError, params::LoadError};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while initialising the simulator.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Could not create the history archive: {0}")]
    ArchiveError(ArchiveError),
}

/// Errors which can occur during simulation.
#[derive(Debug, thiserror::Error)]
pub enum CtrlSimError {
    #[error("Singularity analysis failed: {0}")]
    Singularity(SingularityError),

    /// The mass matrix could not be factorised, so the joint accelerations
    /// can't be found.
    #[error("The mass matrix is not positive definite at t = {time_s:.3} s")]
    SingularMassMatrix { time_s: f64 },

    #[error("Could not archive the simulation history: {0}")]
    ArchiveError(ArchiveError),
}

impl From<SingularityError> for CtrlSimError {
    fn from(e: SingularityError) -> Self {
        CtrlSimError::Singularity(e)
    }
}

impl From<ArchiveError> for CtrlSimError {
    fn from(e: ArchiveError) -> Self {
        CtrlSimError::ArchiveError(e)
    }
}
