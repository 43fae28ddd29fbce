//! # Telecommand processor module
//!
//! The telecommand processor handles TCs coming from any source. Commands only
//! change the control panel, leg control picks the changes up on the next
//! cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use crate::{
    data_store::DataStore,
    leg_ctrl::{JointAngles, LinkParams, TipPosition, NUM_LEGS},
    tc::Tc,
};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore's control panel.
pub fn exec(ds: &mut DataStore, tc: &Tc) {
    debug!("Recieved TC: {:?}", tc);

    match tc {
        Tc::Joints { coxa_rad, femur_rad, tibia_rad } => {
            ds.panel.set_joints(JointAngles::new(*coxa_rad, *femur_rad, *tibia_rad));
        },
        Tc::Target { x_m, y_m, z_m } => {
            ds.panel.set_target(TipPosition::new(*x_m, *y_m, *z_m));
        },
        Tc::EnableIk { enabled } => {
            ds.panel.set_ik_enabled(*enabled);
        },
        Tc::SelectLeg { leg } => {
            if *leg < NUM_LEGS {
                ds.panel.selected_leg = *leg;
            }
            else {
                warn!("Cannot select leg {}, there are only {} legs", leg, NUM_LEGS);
            }
        },
        Tc::LockLegs { locked } => {
            ds.panel.lock_legs = *locked;
        },
        Tc::Links { coxa_length_m, femur_length_m, tibia_length_m } => {
            match LinkParams::new(*coxa_length_m, *femur_length_m, *tibia_length_m) {
                Ok(l) => ds.panel.request_links(l),
                Err(e) => warn!("Invalid link lengths: {}", e)
            }
        },
        Tc::Reset => {
            ds.panel.request_reset();
        },
        Tc::Status => {
            ds.status_requested = true;
        },
        Tc::Exit => {
            ds.exit_requested = true;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::leg_ctrl::{LegCtrl, Params};

    fn test_ds() -> DataStore {
        let mut params = Params::default();
        params.default_links = LinkParams::new(1.0, 5.0, 5.0).unwrap();

        DataStore {
            leg_ctrl: LegCtrl::from_params(params).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_locked_target_script() {
        let mut ds = test_ds();

        for tc in [
            Tc::LockLegs { locked: true },
            Tc::EnableIk { enabled: true },
            Tc::Target { x_m: 6.0, y_m: -5.0, z_m: 2.0 },
        ].iter() {
            exec(&mut ds, tc);
        }
        ds.cycle();

        let output = ds.leg_ctrl_output.unwrap();
        assert!(output.ik_enabled);
        for pose in output.legs.iter() {
            assert!(pose.tip.distance_to(&TipPosition::new(6.0, -5.0, 2.0)) < 1e-9);
        }
        assert_eq!(*ds.panel.joints(), output.readback.joints);
        assert_eq!(ds.num_cycles, 1);
    }

    #[test]
    fn test_invalid_tcs_are_ignored() {
        let mut ds = test_ds();

        exec(&mut ds, &Tc::SelectLeg { leg: 7 });
        assert_eq!(ds.panel.selected_leg, 0);

        exec(&mut ds, &Tc::Links {
            coxa_length_m: 1.0,
            femur_length_m: -2.0,
            tibia_length_m: 3.0
        });
        ds.cycle();
        assert_eq!(
            *ds.leg_ctrl.legs().legs()[0].links(),
            LinkParams::new(1.0, 5.0, 5.0).unwrap()
        );
    }

    #[test]
    fn test_links_on_selected_leg() {
        let mut ds = test_ds();
        let links = LinkParams::new(2.0, 3.0, 4.0).unwrap();

        exec(&mut ds, &Tc::SelectLeg { leg: 5 });
        exec(&mut ds, &Tc::Links {
            coxa_length_m: 2.0,
            femur_length_m: 3.0,
            tibia_length_m: 4.0
        });
        ds.cycle();

        for (i, leg) in ds.leg_ctrl.legs().legs().iter().enumerate() {
            if i == 5 {
                assert_eq!(*leg.links(), links);
            }
            else {
                assert_ne!(*leg.links(), links);
            }
        }
    }

    #[test]
    fn test_exit() {
        let mut ds = test_ds();
        exec(&mut ds, &Tc::Exit);
        assert!(ds.exit_requested);
    }
}
