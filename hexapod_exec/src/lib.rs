//! # Hexapod library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to
//! access items defined inside the hexapod crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - everything the executable carries from one cycle to the next
pub mod data_store;

/// Leg control module - converts between joint angles and tip positions for the six legs
pub mod leg_ctrl;

/// Control panel - the per-cycle user inputs driving leg control
pub mod panel;

/// Executable parameters
pub mod params;

/// Telecommands - instructions from a script or the console
pub mod tc;

/// Telecommand processor - applies telecommands to the data store
pub mod tc_processor;
