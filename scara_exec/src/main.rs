//! Main SCARA simulator executable entry point.
//!
//! # Architecture
//!
//! The execution consists of:
//!
//!     - Initialise the session and logging
//!     - Load the robot, task and simulator parameters
//!     - Resolve the task waypoints with inverse kinematics, aborting if any
//!       waypoint is out of reach
//!     - Generate the task's joint trajectory
//!     - Simulate tracking the trajectory, archiving every step
//!     - Report and save the run summary
//!
//! # Modules
//!
//! All cyclically processed modules (e.g. `ctrl_sim`) shall provide a public struct implementing
//! the `util::module::State` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::info;

// Internal
use scara_lib::{
    ctrl_sim::ControlSimulator,
    robot_model::{self, RobotModel, ScaraModel},
    traj_gen::{self, Task},
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session =
        Session::new("scara_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("SCARA Simulator Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let robot_params: robot_model::Params =
        util::params::load("robot.toml").wrap_err("Could not load robot params")?;
    let task_params: traj_gen::Params =
        util::params::load("task.toml").wrap_err("Could not load task params")?;

    info!("Exec parameters loaded");

    let model = ScaraModel::new(robot_params);
    info!(
        "Robot: L1 = {:.3} m, L2 = {:.3} m, masses = {:?} kg",
        model.params().l1(),
        model.params().l2(),
        model.params().link_masses_kg
    );

    // ---- BUILD THE TASK ----

    let task = Task::new(&task_params, &model).wrap_err("Failed to resolve the task")?;
    info!("Task resolved: {} legs", task.num_legs());

    let traj = task
        .trajectory()
        .wrap_err("Failed to generate the task trajectory")?;

    // ---- SIMULATE ----

    let mut sim = ControlSimulator::new(model);
    sim.init("ctrl_sim.toml", &session)
        .wrap_err("Failed to initialise the control simulator")?;
    info!("Control simulator init complete\n");

    sim.run(&traj).wrap_err("Simulation failed")?;

    // ---- REPORT ----

    let summary = sim
        .summary()
        .ok_or_else(|| eyre!("The simulation produced no steps"))?;

    info!("Steps simulated: {}", summary.num_steps);
    info!("Singular steps: {}", summary.num_singular);
    info!(
        "Percentage of the trajectory in singularity: {:.2} %",
        summary.singular_percent
    );
    info!(
        "Final configuration: ({:.4} rad, {:.4} rad, {:.4} m)",
        summary.final_q[0], summary.final_q[1], summary.final_q[2]
    );
    info!(
        "Final error: ({:.2e}, {:.2e}, {:.2e}), max abs error: ({:.2e}, {:.2e}, {:.2e})",
        summary.final_error[0],
        summary.final_error[1],
        summary.final_error[2],
        summary.max_abs_error[0],
        summary.max_abs_error[1],
        summary.max_abs_error[2]
    );

    let pose = sim.model().forward_kinematics(&summary.final_q);
    info!(
        "Final tool position: ({:.4}, {:.4}, {:.4}) m",
        pose.translation.x, pose.translation.y, pose.translation.z
    );

    session
        .save_json("summary.json", &summary)
        .wrap_err("Failed to save the run summary")?;

    info!("End of execution");

    Ok(())
}
