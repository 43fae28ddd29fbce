//! Leg control module
//!
//! Converts between the joint angles and tip positions of the hexapod's legs,
//! and routes commands to one leg or all of them.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
pub mod kinematics;
mod leg_array;
mod leg_state;
mod limits;
pub mod mount;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use kinematics::{
    Joint, JointAngles, KinematicsError, LinkParams, LinkParamsError, TipPosition,
};
pub use leg_array::*;
pub use leg_state::*;
pub use limits::*;
pub use mount::LegMount;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of legs on the hexapod.
pub const NUM_LEGS: usize = 6;

/// The number of joints in each leg.
pub const NUM_JOINTS: usize = 3;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LegCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LegCtrlError {
    #[error("Cannot load the LegCtrl parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("The limits of the {0:?} joint do not form a valid range")]
    InvalidJointLimits(Joint),

    #[error("The mounting radius must be finite and not negative, found {0}")]
    InvalidMountRadius(f64),

    #[error("There is no leg with index {0}, expected less than 6")]
    InvalidLegIndex(usize),
}
