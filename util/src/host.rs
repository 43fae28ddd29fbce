//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root.
pub const SW_ROOT_ENV_VAR: &str = "HEXAPOD_SW_ROOT";

/// Get the root directory of the software, as set by the `HEXAPOD_SW_ROOT`
/// environment variable.
pub fn get_hexapod_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
