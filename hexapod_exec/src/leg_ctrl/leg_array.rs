//! Coordination of the six legs
//!
//! Commands are either sent to the one selected leg (unlocked), or broadcast
//! to every leg (locked). Each leg solves a broadcast command with its own
//! geometry, so legs which have been reconfigured individually can end up in
//! different poses from the same command.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Point3;
use serde::Serialize;

// Internal
use super::{
    AddressMode, JointLimits, KinematicsError, LegCmd, LegCtrlError, LegMount,
    LegState, LimitPolicy, LinkParams, NUM_JOINTS, NUM_LEGS,
};
use super::params::DEFAULT_MOUNT_RADIUS_M;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The six legs of the hexapod and the addressing state used to command them.
#[derive(Clone, Debug)]
pub struct LegArray {
    legs: [LegState; NUM_LEGS],
    mounts: [LegMount; NUM_LEGS],

    /// The leg commanded when unlocked. Remembered while locked.
    selected: usize,

    locked: bool,

    ik_enabled: bool,
}

/// Status report for a command sent to the legs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Legs which could not reach the commanded target.
    pub unreachable: [bool; NUM_LEGS],

    /// Legs whose target solution was refused by the `Reject` limit policy.
    pub limit_rejected: [bool; NUM_LEGS],

    /// Joints which were clamped to their limits, per leg.
    pub joint_limited: [[bool; NUM_JOINTS]; NUM_LEGS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegArray {
    /// Create all legs in the zero pose, unlocked with leg 0 selected.
    pub fn new(
        links: LinkParams,
        limits: JointLimits,
        policy: LimitPolicy,
        mount_radius_m: f64
    ) -> Self {
        let mut mounts = [LegMount::for_leg(0, mount_radius_m); NUM_LEGS];
        for (i, m) in mounts.iter_mut().enumerate() {
            *m = LegMount::for_leg(i, mount_radius_m);
        }

        Self {
            legs: [LegState::new(links, limits, policy); NUM_LEGS],
            mounts,
            selected: 0,
            locked: false,
            ik_enabled: false,
        }
    }

    pub fn legs(&self) -> &[LegState; NUM_LEGS] {
        &self.legs
    }

    pub fn leg(&self, index: usize) -> Option<&LegState> {
        self.legs.get(index)
    }

    pub fn mounts(&self) -> &[LegMount; NUM_LEGS] {
        &self.mounts
    }

    pub fn selected_leg(&self) -> usize {
        self.selected
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// `true` if the last pose command placed the tips rather than driving
    /// the joints.
    pub fn ik_enabled(&self) -> bool {
        self.ik_enabled
    }

    /// How the next command will be routed.
    pub fn mode(&self) -> AddressMode {
        match self.locked {
            true => AddressMode::Broadcast,
            false => AddressMode::PerLeg(self.selected),
        }
    }

    /// Select the leg to command while unlocked. No leg moves.
    pub fn select_leg(&mut self, index: usize) -> Result<(), LegCtrlError> {
        if index >= NUM_LEGS {
            return Err(LegCtrlError::InvalidLegIndex(index))
        }

        self.selected = index;
        Ok(())
    }

    /// Lock or unlock the legs. No leg moves.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// The leg whose pose represents the whole array: leg 0 when locked, the
    /// selected leg otherwise.
    pub fn readback(&self) -> &LegState {
        match self.mode() {
            AddressMode::Broadcast => &self.legs[0],
            AddressMode::PerLeg(i) => &self.legs[i],
        }
    }

    /// Tip of the given leg in the body frame.
    pub fn tip_in_body(&self, index: usize) -> Option<Point3<f64>> {
        let leg = self.legs.get(index)?;
        Some(self.mounts[index].to_body(leg.tip()))
    }

    /// Send a command to the addressed legs.
    ///
    /// Legs which fail to solve a target keep their previous pose and are
    /// flagged in the report, the other addressed legs still move. Failures
    /// are only logged at debug, reporting them is left to the owner of the
    /// report.
    ///
    /// A target enables IK only if at least one addressed leg accepted it.
    pub fn apply(&mut self, cmd: &LegCmd) -> StatusReport {
        let mut report = StatusReport::default();
        let mut any_accepted = false;

        let indices = match self.mode() {
            AddressMode::Broadcast => 0..NUM_LEGS,
            AddressMode::PerLeg(i) => i..(i + 1),
        };

        for i in indices {
            match self.legs[i].apply(cmd) {
                Ok(limited) => {
                    if limited.contains(&true) {
                        debug!("Leg {} joints limited: {:?}", i, limited);
                    }
                    report.joint_limited[i] = limited;
                    any_accepted = true;
                },
                Err(e @ KinematicsError::JointLimitExceeded { .. }) => {
                    debug!("Leg {} target rejected: {}", i, e);
                    report.limit_rejected[i] = true;
                },
                Err(e) => {
                    debug!("Leg {} cannot reach target: {}", i, e);
                    report.unreachable[i] = true;
                }
            }
        }

        match cmd {
            LegCmd::SetJoints(_) => self.ik_enabled = false,
            LegCmd::SetTarget(_) if any_accepted => self.ik_enabled = true,
            LegCmd::SetTarget(_) | LegCmd::SetLinks(_) => ()
        }

        report
    }

    /// Return every leg to the given link lengths and the zero pose, and
    /// disable IK. Applies to all legs whether locked or not.
    pub fn reset_all(&mut self, links: LinkParams) {
        for leg in self.legs.iter_mut() {
            leg.reset(links);
        }

        self.ik_enabled = false;
    }
}

impl Default for LegArray {
    fn default() -> Self {
        Self::new(
            LinkParams::default(),
            JointLimits::default(),
            LimitPolicy::default(),
            DEFAULT_MOUNT_RADIUS_M
        )
    }
}

impl StatusReport {
    /// Returns `true` if any leg failed to execute the command.
    pub fn any_failed(&self) -> bool {
        self.unreachable.contains(&true) || self.limit_rejected.contains(&true)
    }
}
