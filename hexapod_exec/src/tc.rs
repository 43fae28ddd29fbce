//! # Telecommand module
//!
//! Telecommands are the instructions sent to the executable, either read from
//! a script (as JSON) or typed into the console (as words, e.g.
//! `target 0.12 -0.05 0.0`).

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::{clap::AppSettings, StructOpt};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A telecommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
pub enum Tc {
    /// Set the joint angles, which drive the legs while IK is disabled.
    #[structopt(name = "joints", setting = AppSettings::AllowNegativeNumbers)]
    Joints {
        coxa_rad: f64,
        femur_rad: f64,
        tibia_rad: f64,
    },

    /// Set the tip target, which drives the legs while IK is enabled.
    ///
    /// Frame: Leg
    #[structopt(name = "target", setting = AppSettings::AllowNegativeNumbers)]
    Target {
        x_m: f64,
        y_m: f64,
        z_m: f64,
    },

    /// Enable or disable inverse kinematics.
    #[structopt(name = "ik")]
    EnableIk {
        #[structopt(parse(try_from_str))]
        enabled: bool,
    },

    /// Select the leg to command while the legs are unlocked.
    #[structopt(name = "select")]
    SelectLeg {
        leg: usize,
    },

    /// Lock the legs together, or unlock them.
    #[structopt(name = "lock")]
    LockLegs {
        #[structopt(parse(try_from_str))]
        locked: bool,
    },

    /// Change the link lengths of the addressed legs.
    #[structopt(name = "links")]
    Links {
        coxa_length_m: f64,
        femur_length_m: f64,
        tibia_length_m: f64,
    },

    /// Return all legs to the default link lengths and the zero pose.
    #[structopt(name = "reset")]
    Reset,

    /// Print the pose of every leg.
    #[structopt(name = "status")]
    Status,

    /// Stop the executable.
    #[structopt(name = "exit")]
    Exit,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Tc {
    /// Parse a telecommand from JSON.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Parse a telecommand from a line typed into the console.
    pub fn from_line(line: &str) -> Result<Self, structopt::clap::Error> {
        Tc::from_iter_safe(std::iter::once("tc").chain(line.split_whitespace()))
    }
}
