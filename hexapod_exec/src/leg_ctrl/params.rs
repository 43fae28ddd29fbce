//! Parameters structure for LegCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{JointLimits, LimitPolicy, LinkParams};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default length of the coxa link.
///
/// Units: meters
pub const DEFAULT_COXA_LENGTH_M: f64 = 0.03;

/// Default length of the femur link.
///
/// Units: meters
pub const DEFAULT_FEMUR_LENGTH_M: f64 = 0.07;

/// Default length of the tibia link.
///
/// Units: meters
pub const DEFAULT_TIBIA_LENGTH_M: f64 = 0.09;

/// Default distance from the centre of the body to each coxa joint.
///
/// Units: meters
pub const DEFAULT_MOUNT_RADIUS_M: f64 = 0.1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Leg control.
///
/// Any item missing from the parameter file takes its default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- GEOMETRY ----

    /// Link lengths every leg starts with, and returns to on reset.
    pub default_links: LinkParams,

    /// Distance from the centre of the body to each coxa joint. The legs are
    /// spaced evenly around this circle.
    ///
    /// Units: meters
    pub mount_radius_m: f64,

    // ---- CAPABILITIES ----

    /// Range of each joint, shared by all legs.
    pub joint_limits: JointLimits,

    /// How inverse kinematics solutions outside the joint limits are handled.
    pub limit_policy: LimitPolicy,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            default_links: LinkParams::default(),
            mount_radius_m: DEFAULT_MOUNT_RADIUS_M,
            joint_limits: JointLimits::default(),
            limit_policy: LimitPolicy::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params: Params = util::params::parse(
            "mount_radius_m = 0.2\n\
             limit_policy = \"Reject\"\n\
             \n\
             [default_links]\n\
             coxa_length_m = 0.01\n\
             femur_length_m = 0.05\n\
             tibia_length_m = 0.06\n"
        ).unwrap();

        assert_eq!(params.mount_radius_m, 0.2);
        assert_eq!(params.limit_policy, LimitPolicy::Reject);
        assert_eq!(params.default_links.femur_length_m(), 0.05);
        assert_eq!(params.joint_limits, JointLimits::default());
    }

    #[test]
    fn test_parse_rejects_bad_links() {
        let res: Result<Params, _> = util::params::parse(
            "[default_links]\n\
             coxa_length_m = 0.01\n\
             femur_length_m = 0.0\n\
             tibia_length_m = 0.06\n"
        );

        assert!(res.is_err());
    }
}
