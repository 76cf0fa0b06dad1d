//! Parameters structure for the robot model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::NUM_JOINTS;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the robot model.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- GEOMETRY ----
    /// Lengths of the two revolute links.
    ///
    /// Units: meters.
    pub link_lengths_m: [f64; 2],

    // ---- INERTIAL ----
    /// Mass of each link.
    ///
    /// Units: kilograms.
    pub link_masses_kg: [f64; NUM_JOINTS],

    /// Distance of each link's centre of mass from its proximal joint,
    /// measured along the link.
    ///
    /// Units: meters.
    pub link_com_offsets_m: [f64; NUM_JOINTS],

    /// Inertia of each link about the vertical axis through its centre of
    /// mass.
    ///
    /// Units: kilogram meters squared.
    pub link_inertias_kgm2: [f64; NUM_JOINTS],

    // ---- CAPABILITIES ----
    /// Minimum and maximum extension of the prismatic joint. Not enforced by
    /// the simulation.
    ///
    /// Units: meters.
    pub prismatic_travel_m: [f64; 2],

    // ---- ENVIRONMENT ----
    /// Gravitational acceleration, acting along the base frame's -Z axis.
    ///
    /// Units: meters/second^2.
    pub gravity_ms2: f64,
}

impl Params {
    /// Length of the first (shoulder) link.
    pub fn l1(&self) -> f64 {
        self.link_lengths_m[0]
    }

    /// Length of the second (elbow) link.
    pub fn l2(&self) -> f64 {
        self.link_lengths_m[1]
    }

    /// Returns true if the prismatic extension lies within the travel limits.
    pub fn in_prismatic_travel(&self, q3_m: f64) -> bool {
        q3_m >= self.prismatic_travel_m[0] && q3_m <= self.prismatic_travel_m[1]
    }
}
