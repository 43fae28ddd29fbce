//! Leg kinematics calculations
//!
//! Each leg is a coxa-femur-tibia serial chain. The coxa joint yaws the whole
//! leg plane about the vertical (y) axis, and the femur and tibia joints then
//! act as a planar two link arm within that plane:
//!
//! ```text
//!            femur
//!   coxa   o-------o
//!  o-----o          \  tibia
//!  ^ yaw   ^ femur   \
//!                     * tip
//! ```
//!
//! All positions are in the leg frame, whose origin is the coxa joint, with x
//! pointing outwards from the body at zero yaw and y pointing up. The mounting
//! of the leg on the body is not considered here, see `mount` for that.
//!
//! The functions in this module are pure: the same inputs always produce the
//! same outputs.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::f64::consts::PI;

// Internal
use super::{JointLimits, LimitPolicy, NUM_JOINTS};
use super::params::{
    DEFAULT_COXA_LENGTH_M, DEFAULT_FEMUR_LENGTH_M, DEFAULT_TIBIA_LENGTH_M
};
use util::maths::wrap_to_pi;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance applied to the reach limits, so that targets lying exactly on the
/// workspace boundary are not rejected due to floating point error.
///
/// Units: meters
pub const REACH_TOLERANCE_M: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The link lengths defining the geometry of one leg.
///
/// The femur and tibia must be strictly positive. The coxa may be zero, which
/// places the femur joint on the yaw axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedLinkParams")]
pub struct LinkParams {
    coxa_length_m: f64,
    femur_length_m: f64,
    tibia_length_m: f64,
}

/// Link lengths as read from a parameter file, before validation.
#[derive(Deserialize)]
struct UncheckedLinkParams {
    coxa_length_m: f64,
    femur_length_m: f64,
    tibia_length_m: f64,
}

/// Angles of the three joints of a leg.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    /// Yaw of the coxa about the vertical axis, positive towards +z.
    ///
    /// Units: radians
    pub coxa_rad: f64,

    /// Elevation of the femur above the horizontal plane.
    ///
    /// Units: radians
    pub femur_rad: f64,

    /// Elevation of the tibia relative to the femur. Zero is a straight
    /// femur-tibia chain, negative values fold the tibia downwards.
    ///
    /// Units: radians
    pub tibia_rad: f64,
}

/// Position of the tip of a leg.
///
/// Frame: Leg (coxa joint)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TipPosition {
    /// Units: meters
    pub x_m: f64,
    /// Units: meters
    pub y_m: f64,
    /// Units: meters
    pub z_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The joints of a leg, from the body outwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Joint {
    Coxa,
    Femur,
    Tibia,
}

/// Invalid leg geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkParamsError {
    #[error("The coxa length must be finite and not negative, found {0}")]
    InvalidCoxa(f64),

    #[error("The femur length must be finite and positive, found {0}")]
    InvalidFemur(f64),

    #[error("The tibia length must be finite and positive, found {0}")]
    InvalidTibia(f64),
}

/// Errors which can occur while solving the leg kinematics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    #[error(
        "Target is {distance_m:.6} m from the femur joint, outside the reachable \
        range [{min_reach_m:.6}, {max_reach_m:.6}] m"
    )]
    Unreachable {
        distance_m: f64,
        min_reach_m: f64,
        max_reach_m: f64,
    },

    #[error("The {joint:?} joint would need to be at {angle_rad:.6} rad, outside its limits")]
    JointLimitExceeded {
        joint: Joint,
        angle_rad: f64
    },

    #[error("Target position is not finite: {0:?}")]
    NonFiniteTarget(TipPosition),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LinkParams {
    /// Create a new set of link lengths, checking that they describe a
    /// physical leg.
    pub fn new(
        coxa_length_m: f64,
        femur_length_m: f64,
        tibia_length_m: f64
    ) -> Result<Self, LinkParamsError> {
        if !coxa_length_m.is_finite() || coxa_length_m < 0.0 {
            return Err(LinkParamsError::InvalidCoxa(coxa_length_m))
        }
        if !femur_length_m.is_finite() || femur_length_m <= 0.0 {
            return Err(LinkParamsError::InvalidFemur(femur_length_m))
        }
        if !tibia_length_m.is_finite() || tibia_length_m <= 0.0 {
            return Err(LinkParamsError::InvalidTibia(tibia_length_m))
        }

        Ok(Self {
            coxa_length_m,
            femur_length_m,
            tibia_length_m,
        })
    }

    pub fn coxa_length_m(&self) -> f64 {
        self.coxa_length_m
    }

    pub fn femur_length_m(&self) -> f64 {
        self.femur_length_m
    }

    pub fn tibia_length_m(&self) -> f64 {
        self.tibia_length_m
    }

    /// Closest distance from the femur joint that the tip can reach.
    pub fn min_reach_m(&self) -> f64 {
        (self.femur_length_m - self.tibia_length_m).abs()
    }

    /// Furthest distance from the femur joint that the tip can reach.
    pub fn max_reach_m(&self) -> f64 {
        self.femur_length_m + self.tibia_length_m
    }
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            coxa_length_m: DEFAULT_COXA_LENGTH_M,
            femur_length_m: DEFAULT_FEMUR_LENGTH_M,
            tibia_length_m: DEFAULT_TIBIA_LENGTH_M,
        }
    }
}

impl TryFrom<UncheckedLinkParams> for LinkParams {
    type Error = LinkParamsError;

    fn try_from(raw: UncheckedLinkParams) -> Result<Self, Self::Error> {
        Self::new(raw.coxa_length_m, raw.femur_length_m, raw.tibia_length_m)
    }
}

impl JointAngles {
    pub fn new(coxa_rad: f64, femur_rad: f64, tibia_rad: f64) -> Self {
        Self {
            coxa_rad,
            femur_rad,
            tibia_rad,
        }
    }

    /// The angles ordered coxa, femur, tibia.
    pub fn as_array(&self) -> [f64; NUM_JOINTS] {
        [self.coxa_rad, self.femur_rad, self.tibia_rad]
    }

    pub fn from_array(angles_rad: [f64; NUM_JOINTS]) -> Self {
        Self::new(angles_rad[0], angles_rad[1], angles_rad[2])
    }
}

impl TipPosition {
    pub fn new(x_m: f64, y_m: f64, z_m: f64) -> Self {
        Self { x_m, y_m, z_m }
    }

    pub fn is_finite(&self) -> bool {
        self.x_m.is_finite() && self.y_m.is_finite() && self.z_m.is_finite()
    }

    /// Euclidian distance to another position.
    pub fn distance_to(&self, other: &TipPosition) -> f64 {
        nalgebra::distance(&Point3::from(*self), &Point3::from(*other))
    }
}

impl From<TipPosition> for Point3<f64> {
    fn from(tip: TipPosition) -> Self {
        Point3::new(tip.x_m, tip.y_m, tip.z_m)
    }
}

impl From<Point3<f64>> for TipPosition {
    fn from(point: Point3<f64>) -> Self {
        TipPosition::new(point.x, point.y, point.z)
    }
}

impl Joint {
    /// All joints, ordered from the body outwards.
    pub const ALL: [Joint; NUM_JOINTS] = [Joint::Coxa, Joint::Femur, Joint::Tibia];
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the position of the tip of the leg for the given joint angles.
///
/// This is defined for any real joint angles, including those outside the
/// joint limits.
pub fn forward_kinematics(links: &LinkParams, joints: &JointAngles) -> TipPosition {
    let knee_rad = joints.femur_rad + joints.tibia_rad;

    // Reach and height within the leg plane
    let reach_m = links.coxa_length_m
        + links.femur_length_m * joints.femur_rad.cos()
        + links.tibia_length_m * knee_rad.cos();
    let height_m = links.femur_length_m * joints.femur_rad.sin()
        + links.tibia_length_m * knee_rad.sin();

    TipPosition {
        x_m: reach_m * joints.coxa_rad.cos(),
        y_m: height_m,
        z_m: reach_m * joints.coxa_rad.sin(),
    }
}

/// Calculate the joint angles that place the tip of the leg at the target.
///
/// The femur-tibia pair has two solutions for most targets. Only the one with
/// the tibia folded downwards (`tibia_rad <= 0`) is ever returned, since the
/// leg is assembled with that handedness. Joint limits are not applied, see
/// `inverse_kinematics_limited`.
///
/// Returns `KinematicsError::Unreachable` if the target is further from the
/// femur joint than the fully extended leg, or closer than the fully folded
/// leg.
pub fn inverse_kinematics(
    links: &LinkParams,
    target: &TipPosition
) -> Result<JointAngles, KinematicsError> {
    if !target.is_finite() {
        return Err(KinematicsError::NonFiniteTarget(*target))
    }

    let femur_m = links.femur_length_m;
    let tibia_m = links.tibia_length_m;

    // Aim the leg plane at the target
    let coxa_rad = target.z_m.atan2(target.x_m);

    // Target within the leg plane, relative to the femur joint
    let reach_m = target.x_m.hypot(target.z_m) - links.coxa_length_m;
    let height_m = target.y_m;
    let distance_m = reach_m.hypot(height_m);

    if distance_m > links.max_reach_m() + REACH_TOLERANCE_M
        || distance_m < links.min_reach_m() - REACH_TOLERANCE_M
    {
        return Err(KinematicsError::Unreachable {
            distance_m,
            min_reach_m: links.min_reach_m(),
            max_reach_m: links.max_reach_m(),
        })
    }

    // Interior angle at the knee from the law of cosines. The argument is
    // clamped since targets on the boundary can overshoot [-1, 1] slightly.
    let cos_knee = (femur_m.powi(2) + tibia_m.powi(2) - distance_m.powi(2))
        / (2.0 * femur_m * tibia_m);
    let knee_interior_rad = cos_knee.max(-1.0).min(1.0).acos();

    let tibia_rad = knee_interior_rad - PI;

    let femur_rad = height_m.atan2(reach_m)
        - (tibia_m * tibia_rad.sin()).atan2(femur_m + tibia_m * tibia_rad.cos());

    Ok(JointAngles {
        coxa_rad,
        femur_rad: wrap_to_pi(femur_rad),
        tibia_rad,
    })
}

/// Solve the inverse kinematics and apply the joint limits to the solution.
///
/// Under `LimitPolicy::Clamp` each angle is clamped into its range and the
/// returned flags show which joints were limited. Under `LimitPolicy::Reject`
/// a solution outside the limits is an error.
///
/// Solved angles are only defined modulo a turn, so they are limited around
/// the circle: a femur solution of +pi is the -pi bound, not a violation of
/// the 0 bound.
pub fn inverse_kinematics_limited(
    links: &LinkParams,
    limits: &JointLimits,
    policy: LimitPolicy,
    target: &TipPosition
) -> Result<(JointAngles, [bool; NUM_JOINTS]), KinematicsError> {
    let joints = inverse_kinematics(links, target)?;
    let (clamped, limited) = limits.clamp_wrapped(&joints);

    match policy {
        LimitPolicy::Clamp => Ok((clamped, limited)),
        LimitPolicy::Reject => match limited.iter().position(|l| *l) {
            Some(i) => Err(KinematicsError::JointLimitExceeded {
                joint: Joint::ALL[i],
                angle_rad: joints.as_array()[i],
            }),
            None => Ok((clamped, limited))
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
