//! # Control panel
//!
//! The control panel holds the values a user edits to drive the legs: a joint
//! triple, a target triple, the IK switch, the selected leg and the lock
//! switch. Every cycle it produces the input for leg control, and takes back
//! the resulting pose so that it always shows where the addressed legs
//! actually are.
//!
//! A pose command is only sent on the cycle after the joints, the target or
//! the IK switch were edited. Changing the selection or the lock on its own
//! moves nothing, the panel just picks up the pose of the newly addressed leg.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::leg_ctrl::{InputData, JointAngles, LegCmd, LinkParams, OutputData, TipPosition};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Live control values.
#[derive(Clone, Debug, Default)]
pub struct ControlPanel {
    /// Joint angles, authoritative while IK is disabled.
    joints: JointAngles,

    /// Tip target, authoritative while IK is enabled.
    target: TipPosition,

    ik_enabled: bool,

    pub selected_leg: usize,

    pub lock_legs: bool,

    /// Set when the pose values have been edited since the last pose command.
    pose_edited: bool,

    /// Set when the input of this cycle carries a pose command.
    pose_sent: bool,

    reset_requested: bool,
    reset_in_flight: bool,

    pending_links: Option<LinkParams>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControlPanel {
    pub fn joints(&self) -> &JointAngles {
        &self.joints
    }

    pub fn target(&self) -> &TipPosition {
        &self.target
    }

    pub fn ik_enabled(&self) -> bool {
        self.ik_enabled
    }

    /// Edit the joint angles, which drive the legs while IK is disabled.
    pub fn set_joints(&mut self, joints: JointAngles) {
        self.joints = joints;
        self.pose_edited = true;
    }

    /// Edit the target, which drives the legs while IK is enabled.
    pub fn set_target(&mut self, target: TipPosition) {
        self.target = target;
        self.pose_edited = true;
    }

    /// Switch between driving the joints and driving the target.
    pub fn set_ik_enabled(&mut self, enabled: bool) {
        self.ik_enabled = enabled;
        self.pose_edited = true;
    }

    /// Ask for all legs to be reset on the next cycle.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Ask for the addressed legs to take new link lengths on the next cycle.
    pub fn request_links(&mut self, links: LinkParams) {
        self.pending_links = Some(links);
    }

    /// Build the leg control input for this cycle.
    ///
    /// A pending link change goes first, any pose edit waits for the next
    /// cycle.
    pub fn input(&mut self) -> InputData {
        let cmd = match self.pending_links.take() {
            Some(links) => Some(LegCmd::SetLinks(links)),
            None if self.pose_edited => {
                self.pose_edited = false;

                match self.ik_enabled {
                    true => Some(LegCmd::SetTarget(self.target)),
                    false => Some(LegCmd::SetJoints(self.joints)),
                }
            },
            None => None
        };

        self.pose_sent = matches!(
            cmd,
            Some(LegCmd::SetTarget(_)) | Some(LegCmd::SetJoints(_))
        );

        self.reset_in_flight = self.reset_requested;
        self.reset_requested = false;

        InputData {
            select_leg: Some(self.selected_leg),
            lock_legs: Some(self.lock_legs),
            reset: self.reset_in_flight,
            cmd,
        }
    }

    /// Update the panel from the output of leg control.
    ///
    /// The side that was just commanded keeps the user's value, so that an
    /// unreachable target stays visible. Everything else follows the legs.
    pub fn sync(&mut self, output: &OutputData) {
        if self.reset_in_flight {
            self.ik_enabled = output.ik_enabled;
            self.joints = output.readback.joints;
            self.target = output.readback.tip;
            self.reset_in_flight = false;
        }
        else if self.pose_sent && self.ik_enabled {
            self.joints = output.readback.joints;
        }
        else if self.pose_sent {
            self.target = output.readback.tip;
        }
        else {
            self.joints = output.readback.joints;
            self.target = output.readback.tip;
        }

        self.pose_sent = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::leg_ctrl::{LegCtrl, Params, NUM_LEGS};
    use util::module::State;

    fn test_ctrl() -> LegCtrl {
        let mut params = Params::default();
        params.default_links = LinkParams::new(1.0, 5.0, 5.0).unwrap();

        LegCtrl::from_params(params).unwrap()
    }

    fn step(panel: &mut ControlPanel, ctrl: &mut LegCtrl) -> OutputData {
        let (output, _) = ctrl.proc(&panel.input()).unwrap();
        panel.sync(&output);
        output
    }

    fn all_joints(output: &OutputData) -> [JointAngles; NUM_LEGS] {
        let mut joints = [JointAngles::default(); NUM_LEGS];
        for (j, pose) in joints.iter_mut().zip(output.legs.iter()) {
            *j = pose.joints;
        }
        joints
    }

    #[test]
    fn test_fk_mode_updates_target() {
        let mut panel = ControlPanel::default();
        let mut ctrl = test_ctrl();

        panel.set_joints(JointAngles::new(0.0, -0.5, -0.5));
        let output = step(&mut panel, &mut ctrl);

        assert_eq!(*panel.target(), output.readback.tip);
        assert_eq!(*panel.joints(), JointAngles::new(0.0, -0.5, -0.5));
    }

    #[test]
    fn test_ik_mode_updates_joints() {
        let mut panel = ControlPanel::default();
        let mut ctrl = test_ctrl();

        panel.set_ik_enabled(true);
        panel.set_target(TipPosition::new(6.0, -5.0, 2.0));
        let output = step(&mut panel, &mut ctrl);

        assert_eq!(*panel.joints(), output.readback.joints);
        assert_eq!(*panel.target(), TipPosition::new(6.0, -5.0, 2.0));

        // An unreachable target is left on the panel but the legs stay put
        panel.set_target(TipPosition::new(40.0, 0.0, 0.0));
        let unreachable = step(&mut panel, &mut ctrl);
        assert_eq!(unreachable.readback, output.readback);
        assert_eq!(*panel.target(), TipPosition::new(40.0, 0.0, 0.0));
    }

    #[test]
    fn test_pose_only_sent_after_an_edit() {
        let mut panel = ControlPanel::default();

        assert_eq!(panel.input().cmd, None);

        panel.set_joints(JointAngles::new(0.1, -0.2, -0.3));
        assert_eq!(
            panel.input().cmd,
            Some(LegCmd::SetJoints(JointAngles::new(0.1, -0.2, -0.3)))
        );
        assert_eq!(panel.input().cmd, None);
    }

    #[test]
    fn test_select_and_lock_do_not_move_legs() {
        let mut panel = ControlPanel::default();
        let mut ctrl = test_ctrl();

        panel.set_joints(JointAngles::new(0.5, -0.5, -0.5));
        let posed = step(&mut panel, &mut ctrl);
        assert_eq!(posed.legs[0].joints, JointAngles::new(0.5, -0.5, -0.5));

        // Selecting another leg moves nothing, the panel shows the new leg
        panel.selected_leg = 3;
        let selected = step(&mut panel, &mut ctrl);
        assert_eq!(all_joints(&selected), all_joints(&posed));
        assert_eq!(selected.legs[3].joints, JointAngles::default());
        assert_eq!(*panel.joints(), JointAngles::default());
        assert_eq!(*panel.target(), selected.legs[3].tip);

        // Locking moves nothing either, the panel shows leg 0
        panel.lock_legs = true;
        let locked = step(&mut panel, &mut ctrl);
        assert_eq!(all_joints(&locked), all_joints(&posed));
        assert_eq!(*panel.joints(), JointAngles::new(0.5, -0.5, -0.5));

        // Only an edit drives the legs, and then all of them
        panel.set_joints(JointAngles::new(0.2, -0.4, -0.6));
        let driven = step(&mut panel, &mut ctrl);
        for pose in driven.legs.iter() {
            assert_eq!(pose.joints, JointAngles::new(0.2, -0.4, -0.6));
        }
    }

    #[test]
    fn test_reset_clears_ik() {
        let mut panel = ControlPanel::default();
        let mut ctrl = test_ctrl();

        panel.set_ik_enabled(true);
        panel.lock_legs = true;
        panel.set_target(TipPosition::new(6.0, -5.0, 2.0));
        step(&mut panel, &mut ctrl);

        panel.request_reset();
        step(&mut panel, &mut ctrl);

        assert!(!panel.ik_enabled());
        assert_eq!(*panel.joints(), JointAngles::default());
        assert_eq!(*panel.target(), TipPosition::new(11.0, 0.0, 0.0));

        // Next cycle is neither a reset nor a pose command
        let input = panel.input();
        assert!(!input.reset);
        assert_eq!(input.cmd, None);
    }

    #[test]
    fn test_links_request_is_one_shot() {
        let mut panel = ControlPanel::default();
        let links = LinkParams::new(1.0, 2.0, 3.0).unwrap();

        panel.set_joints(JointAngles::new(0.1, -0.2, -0.3));
        panel.request_links(links);

        // The links go first, the pose edit follows on the next cycle
        assert_eq!(panel.input().cmd, Some(LegCmd::SetLinks(links)));
        assert_eq!(
            panel.input().cmd,
            Some(LegCmd::SetJoints(JointAngles::new(0.1, -0.2, -0.3)))
        );
        assert_eq!(panel.input().cmd, None);
    }
}
