//! # Hexapod Executable Parameters
//!
//! This module provide parameters for the hexapod executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Longest cycle period accepted from the parameter file.
///
/// Units: seconds
pub const MAX_CYCLE_PERIOD_S: f64 = 60.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct HexapodExecParams {

    /// Target period of one cycle when running a script.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Write the pose of every leg to the session archive each cycle.
    pub archive_poses: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExecParamsError {
    #[error("The cycle period must be greater than 0 and at most 60 s, found {0}")]
    InvalidCyclePeriod(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl HexapodExecParams {
    /// The cycle period as a duration.
    pub fn cycle_period(&self) -> Result<Duration, ExecParamsError> {
        let period_s = self.cycle_period_s;

        if !period_s.is_finite() || period_s <= 0.0 || period_s > MAX_CYCLE_PERIOD_S {
            return Err(ExecParamsError::InvalidCyclePeriod(period_s))
        }

        Ok(Duration::from_secs_f64(period_s))
    }
}

impl Default for HexapodExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.1,
            archive_poses: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cycle_period() {
        let params: HexapodExecParams = util::params::parse(
            "cycle_period_s = 0.25\narchive_poses = false\n"
        ).unwrap();

        assert_eq!(params.cycle_period().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_cycle_period() {
        let params: HexapodExecParams = util::params::parse(
            "cycle_period_s = -0.1\narchive_poses = true\n"
        ).unwrap();

        assert!(matches!(
            params.cycle_period(),
            Err(ExecParamsError::InvalidCyclePeriod(_))
        ));

        for period_s in [0.0, f64::NAN, f64::INFINITY, 1e30].iter() {
            let params = HexapodExecParams {
                cycle_period_s: *period_s,
                ..Default::default()
            };

            assert!(params.cycle_period().is_err());
        }
    }
}
