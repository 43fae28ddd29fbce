//! State of a single leg

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{
    kinematics::{forward_kinematics, inverse_kinematics_limited},
    JointAngles, JointLimits, KinematicsError, LegCmd, LimitPolicy, LinkParams,
    TipPosition, NUM_JOINTS,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The geometry and current pose of one leg.
///
/// The joint angles and tip position always describe the same pose: every
/// update sets one of them and recomputes the other straight away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegState {
    links: LinkParams,
    limits: JointLimits,
    policy: LimitPolicy,
    joints: JointAngles,
    tip: TipPosition,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegState {
    /// Create a new leg in the zero pose.
    pub fn new(links: LinkParams, limits: JointLimits, policy: LimitPolicy) -> Self {
        let mut leg = Self {
            links,
            limits,
            policy,
            joints: JointAngles::default(),
            tip: TipPosition::default(),
        };
        leg.reset(links);
        leg
    }

    pub fn links(&self) -> &LinkParams {
        &self.links
    }

    pub fn limits(&self) -> &JointLimits {
        &self.limits
    }

    pub fn joints(&self) -> &JointAngles {
        &self.joints
    }

    pub fn tip(&self) -> &TipPosition {
        &self.tip
    }

    /// Drive the joints to the given angles, clamped to the joint limits.
    ///
    /// Returns a flag for each joint which is `true` if it was limited.
    pub fn set_joints(&mut self, proposed: &JointAngles) -> [bool; NUM_JOINTS] {
        let (joints, limited) = self.limits.clamp(proposed);

        self.joints = joints;
        self.tip = forward_kinematics(&self.links, &self.joints);

        limited
    }

    /// Move the tip to the given target.
    ///
    /// If a joint had to be clamped the stored tip is where the clamped joints
    /// put it, which is not the target. On error the leg is left unchanged.
    pub fn set_target(
        &mut self,
        proposed: &TipPosition
    ) -> Result<[bool; NUM_JOINTS], KinematicsError> {
        let (joints, limited) = inverse_kinematics_limited(
            &self.links, &self.limits, self.policy, proposed
        )?;

        self.joints = joints;
        self.tip = forward_kinematics(&self.links, &self.joints);

        Ok(limited)
    }

    /// Change the link lengths, keeping the current joint angles.
    pub fn reconfigure(&mut self, links: LinkParams) {
        self.links = links;
        self.tip = forward_kinematics(&self.links, &self.joints);
    }

    /// Set the given link lengths and return to the zero pose.
    pub fn reset(&mut self, links: LinkParams) {
        self.links = links;
        self.set_joints(&JointAngles::default());
    }

    /// Execute a command on this leg.
    pub fn apply(&mut self, cmd: &LegCmd) -> Result<[bool; NUM_JOINTS], KinematicsError> {
        match cmd {
            LegCmd::SetJoints(j) => Ok(self.set_joints(j)),
            LegCmd::SetTarget(t) => self.set_target(t),
            LegCmd::SetLinks(l) => {
                self.reconfigure(*l);
                Ok([false; NUM_JOINTS])
            }
        }
    }
}

impl Default for LegState {
    fn default() -> Self {
        Self::new(
            LinkParams::default(),
            JointLimits::default(),
            LimitPolicy::default()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_leg() -> LegState {
        LegState::new(
            LinkParams::new(1.0, 5.0, 5.0).unwrap(),
            JointLimits::default(),
            LimitPolicy::Clamp
        )
    }

    #[test]
    fn test_new_leg_is_straight() {
        let leg = test_leg();

        assert_eq!(*leg.joints(), JointAngles::default());
        assert_eq!(*leg.tip(), TipPosition::new(11.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_joints() {
        let mut leg = test_leg();

        let limited = leg.set_joints(&JointAngles::new(0.0, -1.0, -0.5));
        assert_eq!(limited, [false; NUM_JOINTS]);
        assert_eq!(
            *leg.tip(),
            forward_kinematics(leg.links(), &JointAngles::new(0.0, -1.0, -0.5))
        );

        // Out of range joints are clamped, the tip follows the clamped joints
        let limited = leg.set_joints(&JointAngles::new(0.0, 1.0, -0.5));
        assert_eq!(limited, [false, true, false]);
        assert_eq!(leg.joints().femur_rad, 0.0);
        assert_eq!(*leg.tip(), forward_kinematics(leg.links(), leg.joints()));
    }

    #[test]
    fn test_set_target() {
        let mut leg = test_leg();
        let target = TipPosition::new(6.0, -5.0, 2.0);

        assert_eq!(leg.set_target(&target), Ok([false; NUM_JOINTS]));
        assert!(leg.tip().distance_to(&target) < 1e-9);
        assert!(leg.limits().contains(leg.joints()));
    }

    #[test]
    fn test_set_target_clamped() {
        let mut leg = test_leg();
        let target = TipPosition::new(6.0, 5.0, 0.0);

        let limited = leg.set_target(&target).unwrap();
        assert!(limited[1]);

        // The foot is where the clamped joints put it, not at the target
        assert!(leg.tip().distance_to(&target) > 1e-3);
        assert_eq!(*leg.tip(), forward_kinematics(leg.links(), leg.joints()));
    }

    #[test]
    fn test_set_target_unreachable() {
        let mut leg = test_leg();
        leg.set_joints(&JointAngles::new(0.2, -0.5, -0.5));
        let before = leg;

        assert!(matches!(
            leg.set_target(&TipPosition::new(20.0, 0.0, 0.0)),
            Err(KinematicsError::Unreachable { .. })
        ));
        assert_eq!(leg, before);
    }

    #[test]
    fn test_set_target_rejected() {
        let mut leg = LegState::new(
            LinkParams::new(1.0, 5.0, 5.0).unwrap(),
            JointLimits::default(),
            LimitPolicy::Reject
        );
        let before = leg;

        assert!(matches!(
            leg.set_target(&TipPosition::new(6.0, 5.0, 0.0)),
            Err(KinematicsError::JointLimitExceeded { .. })
        ));
        assert_eq!(leg, before);
    }

    #[test]
    fn test_reconfigure_keeps_joints() {
        let mut leg = test_leg();
        leg.set_joints(&JointAngles::new(0.0, -0.5, -1.0));
        let joints = *leg.joints();

        let links = LinkParams::new(2.0, 6.0, 7.0).unwrap();
        leg.apply(&LegCmd::SetLinks(links)).unwrap();

        assert_eq!(*leg.joints(), joints);
        assert_eq!(*leg.links(), links);
        assert_eq!(*leg.tip(), forward_kinematics(&links, &joints));
    }
}
