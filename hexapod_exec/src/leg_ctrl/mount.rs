//! Mounting of the legs on the body
//!
//! The legs are spaced evenly around a circle centred on the body. This only
//! matters when positions are handed to something outside of leg control
//! (rendering for example), the kinematics themselves always work in the leg
//! frame.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::Serialize;
use std::f64::consts::TAU;

use super::{TipPosition, NUM_LEGS};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Where a leg is attached to the body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LegMount {
    /// Angle of the leg around the body, measured the same way as the coxa
    /// yaw.
    ///
    /// Units: radians
    pub angle_rad: f64,

    /// Distance from the centre of the body to the coxa joint.
    ///
    /// Units: meters
    pub radius_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegMount {
    /// Get the mounting of the leg with the given index, legs being spaced
    /// every 60 degrees.
    pub fn for_leg(index: usize, radius_m: f64) -> Self {
        Self {
            angle_rad: index as f64 * TAU / NUM_LEGS as f64,
            radius_m,
        }
    }

    /// Transform from the leg frame to the body frame.
    pub fn leg_to_body(&self) -> Isometry3<f64> {
        // A positive coxa yaw moves the tip from +x towards +z, which is a
        // negative rotation about +y.
        Isometry3::from_parts(
            Translation3::new(
                self.radius_m * self.angle_rad.cos(),
                0.0,
                self.radius_m * self.angle_rad.sin()
            ),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -self.angle_rad)
        )
    }

    /// Get a tip position in the body frame.
    pub fn to_body(&self, tip: &TipPosition) -> Point3<f64> {
        self.leg_to_body() * Point3::from(*tip)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mount_angles() {
        let mount = LegMount::for_leg(3, 0.1);
        assert!((mount.angle_rad - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_to_body() {
        let mount = LegMount::for_leg(1, 2.0);
        let p = mount.to_body(&TipPosition::new(1.0, -0.5, 0.0));

        let (s, c) = mount.angle_rad.sin_cos();
        assert!((p.x - 3.0 * c).abs() < 1e-9);
        assert!((p.y + 0.5).abs() < 1e-9);
        assert!((p.z - 3.0 * s).abs() < 1e-9);

        // A sideways tip continues the yaw direction
        let p = LegMount::for_leg(0, 1.0).to_body(&TipPosition::new(0.0, 0.0, 1.0));
        assert!((p - Point3::new(1.0, 0.0, 1.0)).norm() < 1e-9);
    }
}
