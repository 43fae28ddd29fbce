//! Joint limits

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use super::{Joint, JointAngles, KinematicsError, NUM_JOINTS};
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Allowed range of each joint of a leg, ordered coxa, femur, tibia.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    /// Minimum joint position (lowest negative value)
    ///
    /// Units: radians
    pub min_rad: [f64; NUM_JOINTS],

    /// Maximum joint position (highest positive value)
    ///
    /// Units: radians
    pub max_rad: [f64; NUM_JOINTS],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// What to do when inverse kinematics produces a solution outside the joint
/// limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitPolicy {
    /// Clamp each joint to its nearest limit and carry on.
    Clamp,

    /// Refuse the solution, leaving the leg where it is.
    Reject,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointLimits {
    /// Clamp each angle into its range.
    ///
    /// Returns the clamped angles and a flag for each joint which is `true` if
    /// that joint was limited.
    pub fn clamp(&self, joints: &JointAngles) -> (JointAngles, [bool; NUM_JOINTS]) {
        let mut angles_rad = joints.as_array();
        let mut limited = [false; NUM_JOINTS];

        for i in 0..NUM_JOINTS {
            let (a, l) = maths::clamp(angles_rad[i], self.min_rad[i], self.max_rad[i]);
            angles_rad[i] = a;
            limited[i] = l;
        }

        (JointAngles::from_array(angles_rad), limited)
    }

    /// Clamp each angle into its range, treating angles a full turn apart as
    /// the same physical position.
    ///
    /// Used for solved angles, which only exist modulo a turn: an angle which
    /// is out of range goes to the bound closest around the circle rather
    /// than on the number line.
    pub fn clamp_wrapped(&self, joints: &JointAngles) -> (JointAngles, [bool; NUM_JOINTS]) {
        let mut angles_rad = joints.as_array();
        let mut limited = [false; NUM_JOINTS];

        for i in 0..NUM_JOINTS {
            let (a, l) = maths::clamp_angle(angles_rad[i], self.min_rad[i], self.max_rad[i]);
            angles_rad[i] = a;
            limited[i] = l;
        }

        (JointAngles::from_array(angles_rad), limited)
    }

    /// Check that every angle is within its range, returning the first joint
    /// (from the body outwards) which is not.
    pub fn check(&self, joints: &JointAngles) -> Result<(), KinematicsError> {
        let angles_rad = joints.as_array();

        for (i, joint) in Joint::ALL.iter().enumerate() {
            if angles_rad[i] < self.min_rad[i] || angles_rad[i] > self.max_rad[i] {
                return Err(KinematicsError::JointLimitExceeded {
                    joint: *joint,
                    angle_rad: angles_rad[i],
                })
            }
        }

        Ok(())
    }

    /// Returns `true` if all angles are within their ranges.
    pub fn contains(&self, joints: &JointAngles) -> bool {
        self.check(joints).is_ok()
    }

    /// Returns the first joint whose range is empty or not finite, if any.
    pub fn invalid_joint(&self) -> Option<Joint> {
        Joint::ALL.iter()
            .enumerate()
            .find(|(i, _)| {
                !self.min_rad[*i].is_finite()
                    || !self.max_rad[*i].is_finite()
                    || self.min_rad[*i] > self.max_rad[*i]
            })
            .map(|(_, j)| *j)
    }
}

impl Default for JointLimits {
    fn default() -> Self {
        Self {
            min_rad: [-FRAC_PI_2, -PI, -FRAC_PI_2],
            max_rad: [FRAC_PI_2, 0.0, FRAC_PI_2],
        }
    }
}

impl Default for LimitPolicy {
    fn default() -> Self {
        LimitPolicy::Clamp
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp_in_range_is_noop() {
        let limits = JointLimits::default();
        let joints = JointAngles::new(0.3, -1.0, -0.2);

        assert_eq!(limits.clamp(&joints), (joints, [false; NUM_JOINTS]));
        assert!(limits.contains(&joints));
    }

    #[test]
    fn test_clamp_out_of_range() {
        let limits = JointLimits::default();
        let (clamped, limited) = limits.clamp(&JointAngles::new(2.0, 0.5, -3.0));

        assert_eq!(clamped, JointAngles::new(FRAC_PI_2, 0.0, -FRAC_PI_2));
        assert_eq!(limited, [true, true, true]);

        // Clamping twice changes nothing more
        assert_eq!(limits.clamp(&clamped), (clamped, [false; NUM_JOINTS]));
    }

    #[test]
    fn test_clamp_wrapped() {
        let limits = JointLimits::default();

        // A femur at +pi is the same as the lower bound -pi
        let (clamped, limited) = limits.clamp_wrapped(&JointAngles::new(0.0, PI, 0.0));
        assert_eq!(clamped, JointAngles::new(0.0, -PI, 0.0));
        assert_eq!(limited, [false; NUM_JOINTS]);

        // Just short of +pi is far closer to -pi than to 0 around the circle
        let (clamped, limited) = limits.clamp_wrapped(&JointAngles::new(0.0, 3.1, 0.0));
        assert_eq!(clamped, JointAngles::new(0.0, -PI, 0.0));
        assert_eq!(limited, [false, true, false]);

        // Small overshoots behave as with plain clamping
        let joints = JointAngles::new(2.0, 0.5, -2.0);
        assert_eq!(limits.clamp_wrapped(&joints), limits.clamp(&joints));
    }

    #[test]
    fn test_check() {
        let limits = JointLimits::default();

        assert_eq!(
            limits.check(&JointAngles::new(0.0, -4.0, 3.0)),
            Err(KinematicsError::JointLimitExceeded {
                joint: Joint::Femur,
                angle_rad: -4.0
            })
        );
    }

    #[test]
    fn test_invalid_joint() {
        assert_eq!(JointLimits::default().invalid_joint(), None);

        let mut limits = JointLimits::default();
        limits.min_rad[2] = 1.0;
        limits.max_rad[2] = -1.0;
        assert_eq!(limits.invalid_joint(), Some(Joint::Tibia));
    }
}
