//! Task building
//!
//! A task resolves every named Cartesian waypoint into a joint configuration
//! up front, checks that each leg refers to known waypoints and profiles, and
//! only then generates the concatenated joint trajectory.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use nalgebra::Vector3;

// Internal
use super::{JointTrajectory, Params, ProfileParams, TaskError};
use crate::inv_kin::InvKinSolver;
use crate::robot_model::{JointVector, RobotModel, ScaraModel};
use util::maths::linspace;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Suffix given to the lifted copy of a waypoint
pub const LIFT_SUFFIX: &str = "_above";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A fully resolved task, ready to generate its trajectory.
#[derive(Debug, Clone)]
pub struct Task {
    home: JointVector,

    /// Named joint configurations, in the order they were solved
    waypoints: Vec<(String, JointVector)>,

    /// Target configuration and timing of each leg
    legs: Vec<(JointVector, ProfileParams)>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Task {
    /// Resolve the task described by `params` for the given model.
    ///
    /// Every waypoint is solved (lift point first, then the base point, in
    /// declaration order) before anything else is done, so an unreachable
    /// waypoint aborts the task before any trajectory exists.
    pub fn new(params: &Params, model: &ScaraModel) -> Result<Self, TaskError> {
        let solver = InvKinSolver::new(model.params());
        let home = JointVector::from(params.home_pos);

        let mut waypoints: Vec<(String, JointVector)> = vec![(params.home_name.clone(), home)];

        for wp in params.waypoints.iter() {
            let base = Vector3::from(wp.position_m);

            let mut targets = Vec::with_capacity(2);
            if let Some(lift_m) = wp.lift_m {
                targets.push((
                    format!("{}{}", wp.name, LIFT_SUFFIX),
                    base + Vector3::new(0.0, 0.0, lift_m),
                ));
            }
            targets.push((wp.name.clone(), base));

            for (name, target_m) in targets {
                if waypoints.iter().any(|(n, _)| *n == name) {
                    return Err(TaskError::DuplicateWaypoint(name));
                }

                let q = match solver.solve(&target_m) {
                    Ok(q) => q,
                    Err(source) => return Err(TaskError::UnreachableWaypoint { name, source }),
                };

                let pose = model.forward_kinematics(&q);
                debug!(
                    "Waypoint {}: q = ({:.4} rad, {:.4} rad, {:.4} m), FK = ({:.4}, {:.4}, {:.4}) m",
                    name,
                    q[0],
                    q[1],
                    q[2],
                    pose.translation.x,
                    pose.translation.y,
                    pose.translation.z
                );
                if !model.params().in_prismatic_travel(q[2]) {
                    warn!(
                        "Waypoint {} needs a prismatic extension of {:.3} m, outside the \
                        travel of [{:.3}, {:.3}] m",
                        name,
                        q[2],
                        model.params().prismatic_travel_m[0],
                        model.params().prismatic_travel_m[1]
                    );
                }

                waypoints.push((name, q));
            }
        }

        let mut legs = Vec::with_capacity(params.legs.len());
        for (i, leg) in params.legs.iter().enumerate() {
            let target = waypoints
                .iter()
                .find(|(n, _)| *n == leg.to)
                .map(|(_, q)| *q)
                .ok_or_else(|| TaskError::UnknownWaypoint(leg.to.clone()))?;
            let profile =
                params
                    .profiles
                    .get(&leg.profile)
                    .ok_or_else(|| TaskError::UnknownProfile {
                        leg: i,
                        profile: leg.profile.clone(),
                    })?;

            legs.push((target, *profile));
        }

        Ok(Self {
            home,
            waypoints,
            legs,
        })
    }

    /// The joint configuration of the named waypoint, if it exists.
    pub fn waypoint(&self, name: &str) -> Option<&JointVector> {
        self.waypoints
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, q)| q)
    }

    /// The configuration the task starts from.
    pub fn home(&self) -> &JointVector {
        &self.home
    }

    /// Number of legs in the task.
    pub fn num_legs(&self) -> usize {
        self.legs.len()
    }

    /// Generate the desired trajectory of the whole task.
    ///
    /// Each leg is a quintic move starting at rest from the end of the
    /// previous leg (the home configuration for the first one), so the
    /// concatenation is continuous in position and velocity.
    pub fn trajectory(&self) -> Result<JointTrajectory, TaskError> {
        let mut traj = JointTrajectory::default();
        let mut start = self.home;

        for (i, (end, profile)) in self.legs.iter().enumerate() {
            let times = linspace(0.0, profile.duration_s, profile.num_samples);
            let leg = JointTrajectory::quintic(&start, end, &times)
                .map_err(|source| TaskError::LegError { leg: i, source })?;

            traj.append(leg);
            start = *end;
        }

        info!(
            "Task trajectory generated: {} legs, {} samples",
            self.legs.len(),
            traj.len()
        );

        Ok(traj)
    }
}
