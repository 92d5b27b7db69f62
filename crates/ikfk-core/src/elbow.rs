//! Mid-joint placement for a two-segment chain.

use glam::DVec3;

use crate::error::{IkFkError, Result};
use crate::transform::try_direction;

/// Amount the effective reach is shortened when the target is out of range.
pub const REACH_EPSILON: f64 = 1e-3;

/// Solves the mid-joint position for a chain rooted at `ik_root` reaching
/// for `ik_end`, bending towards `pole`.
///
/// Targets beyond `upper + lower` are pulled in to
/// `upper + lower - REACH_EPSILON` along the root-end line, and targets
/// closer than `|upper - lower|` are pushed out to
/// `|upper - lower| + REACH_EPSILON`, so the result is always a valid
/// triangle with the given segment lengths.
///
/// # Errors
///
/// Returns [`IkFkError::DegenerateGeometry`] if a segment length is not a
/// positive finite number, if root and end coincide (within
/// [`LENGTH_EPSILON`](crate::transform::LENGTH_EPSILON)), or if the pole lies
/// on the root-end line.
pub fn solve_elbow(
    ik_root: DVec3,
    ik_end: DVec3,
    pole: DVec3,
    upper_length: f64,
    lower_length: f64,
) -> Result<DVec3> {
    for (label, length) in [("upper", upper_length), ("lower", lower_length)] {
        if !length.is_finite() || length <= 0.0 {
            return Err(IkFkError::DegenerateGeometry(format!(
                "{label} segment length must be positive, got {length}"
            )));
        }
    }

    let ik_vector = ik_end - ik_root;
    let ik_dir = try_direction(ik_vector)
        .ok_or_else(|| IkFkError::DegenerateGeometry("IK root and end coincide".to_string()))?;

    let reach = upper_length + lower_length;
    let min_reach = (upper_length - lower_length).abs();
    let mut c = ik_vector.length();
    if c > reach {
        log::trace!("IK target out of reach ({c} > {reach}), clamping");
        c = reach - REACH_EPSILON;
    } else if c < min_reach {
        log::trace!("IK target too close ({c} < {min_reach}), clamping");
        c = min_reach + REACH_EPSILON;
    }

    // Law of cosines: distance from root to the foot of the elbow's altitude.
    let a = upper_length;
    let b = lower_length;
    let x = (a * a - b * b + c * c) / (2.0 * c);
    let foot = ik_root + ik_dir * x;

    let pole_dir = pole - ik_root;
    let perp_dir = try_direction(pole_dir - ik_dir * pole_dir.dot(ik_dir)).ok_or_else(|| {
        IkFkError::DegenerateGeometry("pole vector lies on the IK axis".to_string())
    })?;

    let h = (a * a - x * x).max(0.0).sqrt();
    Ok(foot + perp_dir * h)
}
