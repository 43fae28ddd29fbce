//! Implementations for the LegCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::{
    AddressMode, JointAngles, LegArray, LegCmd, LegCtrlError, LegState, Params,
    StatusReport, TipPosition, NUM_LEGS,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::{get_elapsed_seconds, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Leg control module state
#[derive(Default)]
pub struct LegCtrl {
    pub(crate) params: Params,

    pub(crate) legs: LegArray,

    pub(crate) report: StatusReport,

    pub(crate) output: Option<OutputData>,
    arch_poses: Archiver,
}

/// Input data to Leg Control.
///
/// Each field is `None` (or `false`) if there is nothing new for it on this
/// cycle.
#[derive(Clone, Debug, Default)]
pub struct InputData {
    /// Select the leg commanded while unlocked.
    pub select_leg: Option<usize>,

    /// Lock (broadcast to all legs) or unlock (command the selected leg).
    pub lock_legs: Option<bool>,

    /// Return every leg to the default geometry and zero pose. When set any
    /// command on the same cycle is discarded.
    pub reset: bool,

    /// The command to execute.
    pub cmd: Option<LegCmd>,
}

/// Pose of one leg as seen from outside leg control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LegPose {
    pub joints: JointAngles,

    /// Frame: Leg
    pub tip: TipPosition,

    /// Tip position after the mounting transform.
    ///
    /// Units: meters,
    /// Frame: Body
    pub tip_m_body: [f64; 3],
}

/// Output from LegCtrl, consumed by rendering or the actuators.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct OutputData {
    /// Pose of each leg.
    pub legs: [LegPose; NUM_LEGS],

    /// Pose of the leg representing the array, leg 0 when locked or the
    /// selected leg when unlocked.
    pub readback: LegPose,

    pub mode: AddressMode,

    pub ik_enabled: bool,
}

/// One row of the pose archive.
#[derive(Serialize)]
struct PoseRecord {
    time_s: f64,
    leg: usize,
    coxa_rad: f64,
    femur_rad: f64,
    tibia_rad: f64,
    x_m: f64,
    y_m: f64,
    z_m: f64,
    unreachable: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for LegCtrl {
    type InitData = &'static str;
    type InitError = LegCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = LegCtrlError;

    /// Initialise the LegCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;

        *self = Self::from_params(params)?;

        Ok(())
    }

    /// Perform cyclic processing of Leg Control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Selection is validated first so that a bad index changes nothing
        if let Some(index) = input_data.select_leg {
            if index != self.legs.selected_leg() {
                self.legs.select_leg(index)?;
                debug!("Selected leg {}", index);
            }
        }

        self.report = StatusReport::default();

        if let Some(locked) = input_data.lock_legs {
            if locked != self.legs.is_locked() {
                self.legs.set_locked(locked);
                debug!("Legs {}", if locked { "locked" } else { "unlocked" });
            }
        }

        if input_data.reset {
            if let Some(cmd) = input_data.cmd {
                warn!("Reset requested, discarding LegCtrl command {:?}", cmd);
            }

            self.legs.reset_all(self.params.default_links);
            info!("All legs reset to default geometry");
        }
        else if let Some(cmd) = input_data.cmd {
            trace!("LegCtrl LegCmd::{:?} ({:?})", cmd, self.legs.mode());
            self.report = self.legs.apply(&cmd);
        }

        let output = self.build_output();

        trace!(
            "LegCtrl readback:\n    joints: {:?}\n    tip: {:?}",
            output.readback.joints,
            output.readback.tip
        );

        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl Archived for LegCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let output = match self.output {
            Some(o) => o,
            None => return Ok(())
        };

        let time_s = get_elapsed_seconds();

        for (i, pose) in output.legs.iter().enumerate() {
            self.arch_poses.serialise(PoseRecord {
                time_s,
                leg: i,
                coxa_rad: pose.joints.coxa_rad,
                femur_rad: pose.joints.femur_rad,
                tibia_rad: pose.joints.tibia_rad,
                x_m: pose.tip.x_m,
                y_m: pose.tip.y_m,
                z_m: pose.tip.z_m,
                unreachable: self.report.unreachable[i],
            })?;
        }

        Ok(())
    }
}

impl LegCtrl {
    /// Create the module directly from a set of parameters.
    pub fn from_params(params: Params) -> Result<Self, LegCtrlError> {
        if let Some(joint) = params.joint_limits.invalid_joint() {
            return Err(LegCtrlError::InvalidJointLimits(joint))
        }

        if !params.mount_radius_m.is_finite() || params.mount_radius_m < 0.0 {
            return Err(LegCtrlError::InvalidMountRadius(params.mount_radius_m))
        }

        let legs = LegArray::new(
            params.default_links,
            params.joint_limits,
            params.limit_policy,
            params.mount_radius_m
        );

        Ok(Self {
            params,
            legs,
            ..Default::default()
        })
    }

    /// Start archiving the leg poses into the session.
    pub fn init_archive(&mut self, session: &Session) -> Result<(), ArchiveError> {
        self.arch_poses = Archiver::from_path(session, "leg_ctrl/poses.csv")?;
        Ok(())
    }

    /// Read only access to the legs.
    pub fn legs(&self) -> &LegArray {
        &self.legs
    }

    fn build_output(&self) -> OutputData {
        let mut legs = [LegPose::default(); NUM_LEGS];

        for (i, pose) in legs.iter_mut().enumerate() {
            *pose = self.pose_of(i);
        }

        let readback = match self.legs.mode() {
            AddressMode::Broadcast => legs[0],
            AddressMode::PerLeg(i) => legs[i],
        };

        OutputData {
            legs,
            readback,
            mode: self.legs.mode(),
            ik_enabled: self.legs.ik_enabled(),
        }
    }

    fn pose_of(&self, index: usize) -> LegPose {
        let leg: &LegState = &self.legs.legs()[index];
        let body = self.legs.mounts()[index].to_body(leg.tip());

        LegPose {
            joints: *leg.joints(),
            tip: *leg.tip(),
            tip_m_body: [body.x, body.y, body.z],
        }
    }
}
