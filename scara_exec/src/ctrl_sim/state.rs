//! Control simulator state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::{CtrlSimError, HistoryLog, InitError, Params, PidController, SimSummary};
use crate::robot_model::{JointVector, RobotModel};
use crate::singularity::{self, SingularityReport};
use crate::traj_gen::JointTrajectory;
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Control simulator module state
pub struct ControlSimulator<M: RobotModel> {
    params: Params,

    /// The robot being controlled
    model: M,

    controller: PidController,

    /// Achieved joint positions
    q: JointVector,

    /// Achieved joint velocities
    qd: JointVector,

    /// Index of the next step to simulate
    step: usize,

    history: HistoryLog,
    arch_history: Archiver,
}

/// Input data to a single simulation step.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Desired joint positions
    pub q_des: JointVector,

    /// Desired joint velocities
    pub qd_des: JointVector,
}

/// Output of a single simulation step.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OutputData {
    /// Achieved joint positions at the end of the step
    pub q: JointVector,

    /// Achieved joint velocities at the end of the step
    pub qd: JointVector,

    /// Control effort applied during the step
    pub tau: JointVector,
}

/// Status report for a single simulation step.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// Units: seconds
    pub time_s: f64,

    /// Tracking error at the start of the step
    pub error: JointVector,

    /// Singularity of the configuration at the start of the step
    pub singularity: SingularityReport,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<M: RobotModel> ControlSimulator<M> {
    /// Create a new simulator for the given model.
    ///
    /// The simulator must be initialised with `State::init` before use, which
    /// loads the parameters and opens the history archive.
    pub fn new(model: M) -> Self {
        Self::with_params(model, Params::default())
    }

    /// Create a new simulator with the given parameters and no archive.
    pub fn with_params(model: M, params: Params) -> Self {
        let controller = PidController::from_params(&params);

        Self {
            params,
            model,
            controller,
            q: JointVector::zeros(),
            qd: JointVector::zeros(),
            step: 0,
            history: HistoryLog::default(),
            arch_history: Archiver::default(),
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Everything recorded since the last reset.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Summary of everything recorded since the last reset.
    pub fn summary(&self) -> Option<SimSummary> {
        self.history.summary()
    }

    /// Clear the history and controller state, so that the next step starts a
    /// new run.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.q = JointVector::zeros();
        self.qd = JointVector::zeros();
        self.step = 0;
        self.history = HistoryLog::default();
    }

    /// Simulate tracking the whole of `traj`, one step per sample.
    ///
    /// The run starts at rest on the first desired sample and always covers
    /// every sample. If the simulator was initialised with a session each
    /// step is also archived.
    pub fn run(&mut self, traj: &JointTrajectory) -> Result<(), CtrlSimError> {
        self.reset();

        info!(
            "Simulating {} steps of {:.3} s ({:.2} s total)",
            traj.len(),
            self.params.dt_s,
            traj.len() as f64 * self.params.dt_s
        );

        for (q_des, qd_des) in traj.iter() {
            self.proc(&InputData {
                q_des: *q_des,
                qd_des: *qd_des,
            })?;

            if self.arch_history.is_initialised() {
                self.write()?;
            }
        }

        if let Some(summary) = self.summary() {
            info!(
                "Simulation complete: {} of {} steps singular ({:.2} %)",
                summary.num_singular, summary.num_steps, summary.singular_percent
            );
        }

        Ok(())
    }

    /// Solve the dynamics for the joint accelerations produced by `tau`.
    fn accelerations(&self, tau: &JointVector, time_s: f64) -> Result<JointVector, CtrlSimError> {
        let net = tau
            - self.model.coriolis_matrix(&self.q, &self.qd) * self.qd
            - self.model.gravity_load(&self.q);

        match self.model.mass_matrix(&self.q).cholesky() {
            Some(chol) => Ok(chol.solve(&net)),
            None => Err(CtrlSimError::SingularMassMatrix { time_s }),
        }
    }
}

impl<M: RobotModel> State for ControlSimulator<M> {
    type InitData = &'static str;
    type InitError = InitError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = CtrlSimError;

    /// Initialise the simulator.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        self.params = params::load(init_data).map_err(InitError::ParamLoadError)?;
        self.controller = PidController::from_params(&self.params);

        self.arch_history = Archiver::from_path(session, "ctrl_sim/history.csv")
            .map_err(InitError::ArchiveError)?;

        debug!("Control simulator parameters: {:?}", self.params);

        self.reset();

        Ok(())
    }

    /// Simulate a single step.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let dt_s = self.params.dt_s;
        let time_s = self.step as f64 * dt_s;

        // The first step starts at rest on the desired configuration
        if self.step == 0 {
            self.q = input_data.q_des;
            self.qd = JointVector::zeros();
            self.controller.reset();
        }

        let singularity = singularity::analyse(self.q.as_slice(), &self.model)?;
        if singularity.singular {
            warn!(
                "Singular configuration at t = {:.2} s: q = ({:.2} deg, {:.2} deg, {:.3} m), \
                det = {:.3e}, rank = {}",
                time_s,
                self.q[0].to_degrees(),
                self.q[1].to_degrees(),
                self.q[2],
                singularity.det_linear,
                singularity.rank
            );
        }

        let error = input_data.q_des - self.q;
        let error_rate = input_data.qd_des - self.qd;
        let tau = self.controller.get(&error, &error_rate, dt_s);

        let qdd = self.accelerations(&tau, time_s)?;

        // Semi-implicit Euler, the position uses the updated velocity
        self.qd += qdd * dt_s;
        self.q += self.qd * dt_s;
        self.step += 1;

        self.history.time_s.push(time_s);
        self.history.q_des.push(input_data.q_des);
        self.history.qd_des.push(input_data.qd_des);
        self.history.q.push(self.q);
        self.history.tau.push(tau);
        self.history.error.push(error);
        self.history.singularity.push(singularity);

        Ok((
            OutputData {
                q: self.q,
                qd: self.qd,
                tau,
            },
            StatusReport {
                time_s,
                error,
                singularity,
            },
        ))
    }
}

impl<M: RobotModel> Archived for ControlSimulator<M> {
    /// Write the most recent step to the history archive.
    fn write(&mut self) -> Result<(), ArchiveError> {
        let last = self
            .history
            .len()
            .checked_sub(1)
            .and_then(|i| self.history.record(i));

        match last {
            Some(rec) => self.arch_history.serialise(rec),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::robot_model::{Jacobian, JointMatrix, ScaraModel};
    use crate::traj_gen::{self, Task};
    use nalgebra::Isometry3;
    use std::f64::consts::PI;

    fn scara() -> ScaraModel {
        ScaraModel::new(util::params::from_str(include_str!("../../../params/robot.toml")).unwrap())
    }

    fn sim_params() -> Params {
        util::params::from_str(include_str!("../../../params/ctrl_sim.toml")).unwrap()
    }

    fn task_traj(model: &ScaraModel) -> JointTrajectory {
        let params: traj_gen::Params =
            util::params::from_str(include_str!("../../../params/task.toml")).unwrap();
        Task::new(&params, model).unwrap().trajectory().unwrap()
    }

    /// Unit point masses on every joint, with a configurable Jacobian and mass
    /// matrix.
    struct StandIn {
        jacobian: Jacobian,
        mass: JointMatrix,
    }

    impl StandIn {
        fn unit() -> Self {
            #[rustfmt::skip]
            let jacobian = Jacobian::new(
                1.0, 0.0, 0.0,
                0.0, 1.0, 0.0,
                0.0, 0.0, 1.0,
                0.0, 0.0, 0.0,
                0.0, 0.0, 0.0,
                0.0, 0.0, 0.0,
            );

            Self {
                jacobian,
                mass: JointMatrix::identity(),
            }
        }
    }

    impl RobotModel for StandIn {
        fn forward_kinematics(&self, _q: &JointVector) -> Isometry3<f64> {
            Isometry3::identity()
        }

        fn jacobian(&self, _q: &JointVector) -> Jacobian {
            self.jacobian
        }

        fn mass_matrix(&self, _q: &JointVector) -> JointMatrix {
            self.mass
        }

        fn coriolis_matrix(&self, _q: &JointVector, _qd: &JointVector) -> JointMatrix {
            JointMatrix::zeros()
        }

        fn gravity_load(&self, _q: &JointVector) -> JointVector {
            JointVector::zeros()
        }
    }

    fn stand_in_params() -> Params {
        Params {
            dt_s: 0.1,
            k_p: [1.0, 1.0, 1.0],
            k_i: [0.0, 0.0, 0.0],
            k_d: [0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_single_steps() {
        let mut sim = ControlSimulator::with_params(StandIn::unit(), stand_in_params());

        // First step starts on the desired position, so nothing moves
        let (out, report) = sim
            .proc(&InputData {
                q_des: JointVector::new(1.0, 2.0, 3.0),
                qd_des: JointVector::zeros(),
            })
            .unwrap();
        assert_eq!(report.time_s, 0.0);
        assert_eq!(report.error, JointVector::zeros());
        assert_eq!(out.q, JointVector::new(1.0, 2.0, 3.0));
        assert_eq!(out.tau, JointVector::zeros());

        // Unit error, unit gain, unit mass: qdd = 1, qd = 0.1, q += 0.01
        let (out, report) = sim
            .proc(&InputData {
                q_des: JointVector::new(2.0, 3.0, 4.0),
                qd_des: JointVector::zeros(),
            })
            .unwrap();
        assert!((report.time_s - 0.1).abs() < 1e-12);
        assert_eq!(report.error, JointVector::repeat(1.0));
        assert_eq!(out.tau, JointVector::repeat(1.0));
        assert!((out.qd - JointVector::repeat(0.1)).norm() < 1e-12);
        assert!((out.q - JointVector::new(1.01, 2.01, 3.01)).norm() < 1e-12);

        assert_eq!(sim.history().len(), 2);
        assert_eq!(sim.history().q[1], out.q);
    }

    #[test]
    fn test_reference_task() {
        let model = scara();
        let traj = task_traj(&model);
        let home = JointVector::new(0.0, -PI / 2.0, 0.0);

        let mut sim = ControlSimulator::with_params(model, sim_params());
        sim.run(&traj).unwrap();

        let history = sim.history();
        assert_eq!(history.len(), 650);
        assert!((history.time_s[649] - 6.49).abs() < 1e-9);

        let summary = sim.summary().unwrap();
        assert_eq!(summary.num_steps, 650);
        assert_eq!(summary.num_singular, 0);
        assert_eq!(summary.singular_percent, 0.0);
        assert!(
            (summary.final_q - home).amax() < 0.01,
            "Final configuration {:?} is not home",
            summary.final_q
        );
        assert!(summary.max_abs_error.amax() < 0.05);
        assert!(history.singularity.iter().all(|s| s.singular == (s.rank < 3)));
    }

    #[test]
    fn test_deterministic() {
        let model = scara();
        let traj = task_traj(&model);

        let mut sim_a = ControlSimulator::with_params(model.clone(), sim_params());
        let mut sim_b = ControlSimulator::with_params(model, sim_params());
        sim_a.run(&traj).unwrap();
        sim_b.run(&traj).unwrap();
        assert_eq!(sim_a.history(), sim_b.history());

        // Running again on the same simulator starts afresh
        let first = sim_a.history().clone();
        sim_a.run(&traj).unwrap();
        assert_eq!(*sim_a.history(), first);
    }

    #[test]
    fn test_singular_steps_are_counted() {
        let mut model = StandIn::unit();
        model.jacobian = Jacobian::zeros();

        let q = JointVector::new(0.1, 0.2, 0.3);
        let traj = JointTrajectory {
            pos: vec![q; 10],
            vel: vec![JointVector::zeros(); 10],
        };

        let mut sim = ControlSimulator::with_params(model, stand_in_params());
        sim.run(&traj).unwrap();

        // Singularity never stops the run
        let summary = sim.summary().unwrap();
        assert_eq!(summary.num_steps, 10);
        assert_eq!(summary.num_singular, 10);
        assert!((summary.singular_percent - 100.0).abs() < 1e-12);
        assert!(sim.history().singularity.iter().all(|s| s.rank == 0));
    }

    #[test]
    fn test_singular_mass_matrix() {
        let mut model = StandIn::unit();
        model.mass = JointMatrix::from_diagonal(&JointVector::new(1.0, -1.0, 1.0));

        let traj = JointTrajectory {
            pos: vec![JointVector::zeros(); 5],
            vel: vec![JointVector::zeros(); 5],
        };

        let mut sim = ControlSimulator::with_params(model, stand_in_params());
        match sim.run(&traj) {
            Err(CtrlSimError::SingularMassMatrix { time_s }) => assert_eq!(time_s, 0.0),
            other => panic!("Expected a singular mass matrix error, got {:?}", other),
        }
    }

    #[test]
    fn test_archive() {
        let path = std::env::temp_dir()
            .join("scara_sim_ctrl_sim_test")
            .join("history.csv");

        let traj = JointTrajectory {
            pos: vec![JointVector::zeros(), JointVector::repeat(1.0)],
            vel: vec![JointVector::zeros(); 2],
        };

        let mut sim = ControlSimulator::with_params(StandIn::unit(), stand_in_params());
        sim.arch_history = Archiver::from_file_path(&path).unwrap();
        sim.run(&traj).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("time_s,q_des_1_rad,"));
        assert!(lines[2].starts_with("0.1,1.0,1.0,1.0,"));
    }
}
