//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the simulator's root directory.
pub const SW_ROOT_ENV_VAR: &str = "SCARA_SIM_ROOT";

/// Get the root directory of the simulator, which contains the `params` and
/// `sessions` directories.
pub fn get_scara_sim_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
