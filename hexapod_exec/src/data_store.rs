//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, warn};

use crate::{
    leg_ctrl::{self, LegCtrl},
    panel::ControlPanel,
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Set when an exit has been commanded
    pub exit_requested: bool,

    /// Set when the leg poses should be printed at the end of the cycle
    pub status_requested: bool,

    // Control panel
    pub panel: ControlPanel,

    // LegCtrl
    pub leg_ctrl: LegCtrl,
    pub leg_ctrl_input: leg_ctrl::InputData,
    pub leg_ctrl_output: Option<leg_ctrl::OutputData>,
    pub leg_ctrl_status_rpt: leg_ctrl::StatusReport,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Run leg control for one cycle using the current panel values.
    pub fn cycle(&mut self) {
        self.leg_ctrl_input = self.panel.input();

        match self.leg_ctrl.proc(&self.leg_ctrl_input) {
            Ok((o, r)) => {
                if r.any_failed() {
                    warn!("LegCtrl could not execute the command: {:?}", r);
                }

                self.panel.sync(&o);
                self.leg_ctrl_output = Some(o);
                self.leg_ctrl_status_rpt = r;
            },
            Err(e) => {
                // LegCtrl errors usually just mean you sent the wrong TC, so just issue the
                // warning and continue.
                warn!("Error during LegCtrl processing: {}", e)
            }
        }

        if self.status_requested {
            self.print_status();
            self.status_requested = false;
        }

        self.num_cycles += 1;
    }

    /// Log the pose of every leg.
    pub fn print_status(&self) {
        let output = match self.leg_ctrl_output {
            Some(ref o) => o,
            None => {
                info!("No LegCtrl output yet");
                return
            }
        };

        info!(
            "Legs {:?}, IK {}",
            output.mode,
            if output.ik_enabled { "enabled" } else { "disabled" }
        );
        for (i, pose) in output.legs.iter().enumerate() {
            info!(
                "    Leg {}: joints [{:.4}, {:.4}, {:.4}] rad, tip [{:.4}, {:.4}, {:.4}] m",
                i,
                pose.joints.coxa_rad,
                pose.joints.femur_rad,
                pose.joints.tibia_rad,
                pose.tip.x_m,
                pose.tip.y_m,
                pose.tip.z_m
            );
        }
    }
}
