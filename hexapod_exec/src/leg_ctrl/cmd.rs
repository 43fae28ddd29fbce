//! Commands passed into LegCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{JointAngles, LinkParams, TipPosition};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command to a single leg.
///
/// The pose commands say which representation is authoritative for this
/// update: the other one is recomputed from it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LegCmd {
    /// Drive the joints directly, the tip follows by forward kinematics.
    SetJoints(JointAngles),

    /// Place the tip, the joints follow by inverse kinematics.
    SetTarget(TipPosition),

    /// Change the leg's link lengths, keeping its joint angles.
    SetLinks(LinkParams),
}

/// How commands are routed to the legs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressMode {
    /// Unlocked, commands only go to the leg with the given index.
    PerLeg(usize),

    /// Locked, commands go to all legs.
    Broadcast,
}
