//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to the closed range `[min, max]`.
///
/// Returns the value along with a flag which is `true` if the value had to be
/// limited.
pub fn clamp<T>(value: T, min: T, max: T) -> (T, bool)
where
    T: Float
{
    if value > max {
        (max, true)
    }
    else if value < min {
        (min, true)
    }
    else {
        (value, false)
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle into the range `(-pi, pi]`.
pub fn wrap_to_pi<T>(angle: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid maps onto [-pi, pi), fold the lower bound onto pi
    if wrapped <= -pi_t {
        wrapped + tau_t
    }
    else {
        wrapped
    }
}

/// Limit an angle to the range `[min, max]`, treating angles a full turn
/// apart as the same.
///
/// The angle is first moved by a turn if that brings it inside the range. If
/// it is still outside it goes to whichever bound is closer around the circle.
/// Returns the angle along with a flag which is `true` if it had to be
/// limited.
pub fn clamp_angle<T>(angle: T, min: T, max: T) -> (T, bool)
where
    T: Float
{
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap_or_else(T::nan);

    for candidate in [angle, angle - tau_t, angle + tau_t].iter() {
        if *candidate >= min && *candidate <= max {
            return (*candidate, false)
        }
    }

    let to_min = wrap_to_pi(min - angle).abs();
    let to_max = wrap_to_pi(angle - max).abs();

    if to_min < to_max {
        (min, true)
    }
    else {
        (max, true)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(0.5f64, -1.0, 1.0), (0.5, false));
        assert_eq!(clamp(1.5f64, -1.0, 1.0), (1.0, true));
        assert_eq!(clamp(-1.5f64, -1.0, 1.0), (-1.0, true));

        // Bounds themselves are not limited
        assert_eq!(clamp(1.0f64, -1.0, 1.0), (1.0, false));

        // Idempotent
        let (once, _) = clamp(7.0f64, 0.0, 2.0);
        assert_eq!(clamp(once, 0.0, 2.0), (once, false));
    }

    #[test]
    fn test_wrap_to_pi() {
        assert!((wrap_to_pi(0.5f64) - 0.5).abs() < 1e-12);
        assert!((wrap_to_pi(PI + 0.5) - (-PI + 0.5)).abs() < 1e-12);
        assert!((wrap_to_pi(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);
        assert!((wrap_to_pi(2.0 * PI + 0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_to_pi(-PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_angle() {
        // Inside the range, or a turn away from it
        assert_eq!(clamp_angle(-0.5f64, -PI, 0.0), (-0.5, false));
        assert_eq!(clamp_angle(PI, -PI, 0.0), (PI - 2.0 * PI, false));

        // Just short of a half turn is nearer the lower bound around the circle
        assert_eq!(clamp_angle(3.1f64, -PI, 0.0), (-PI, true));
        assert_eq!(clamp_angle(0.4f64, -PI, 0.0), (0.0, true));

        // Idempotent
        let (once, _) = clamp_angle(2.0f64, -1.0, 1.0);
        assert_eq!(clamp_angle(once, -1.0, 1.0), (once, false));
    }
}
