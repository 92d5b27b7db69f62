//! Aim-frame construction for FK joints.
//!
//! A joint's local +X is its aim (primary) axis and +Y its secondary axis.
//! [`build_aim_frame`] finds the world orientation that points +X at a
//! target and rolls +Y towards an up target.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};

use crate::error::{IkFkError, Result};
use crate::transform::{try_direction, Axis};

/// Per-component tolerance when checking which way the twist went.
pub const TWIST_TOLERANCE: f64 = 1e-5;

/// Local axis that is aimed at the target.
pub const AIM_AXIS: Axis = Axis::X;

/// Local axis that is rolled towards the up target.
pub const SECONDARY_AXIS: Axis = Axis::Y;

/// Result of [`build_aim_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimFrame {
    /// World orientation for the joint.
    pub orientation: DQuat,
    /// Roll about the aim direction that was applied after aiming, in
    /// radians within `[0, 2π]`.
    pub twist: f64,
    /// Orthonormal aim direction.
    pub forward: DVec3,
    /// Orthonormal up direction.
    pub up: DVec3,
}

/// Builds the world orientation for a joint at `position` aiming at
/// `aim_target`, with its secondary axis towards `up_target`.
///
/// When `mirrored` is set both the aim and up directions are negated, so a
/// right-side joint mirrors the left-side behaviour.
///
/// # Errors
///
/// Returns [`IkFkError::DegenerateGeometry`] if the aim target coincides
/// with `position`, the up target coincides with the aim target, or the up
/// direction is parallel to the aim direction.
pub fn build_aim_frame(
    position: DVec3,
    aim_target: DVec3,
    up_target: DVec3,
    mirrored: bool,
) -> Result<AimFrame> {
    let mut forward = try_direction(aim_target - position)
        .ok_or_else(|| IkFkError::DegenerateGeometry("aim target is at the joint".to_string()))?;
    let mut up = try_direction(up_target - aim_target).ok_or_else(|| {
        IkFkError::DegenerateGeometry("up target coincides with aim target".to_string())
    })?;

    if mirrored {
        forward = -forward;
        up = -up;
    }

    let binormal = try_direction(forward.cross(up)).ok_or_else(|| {
        IkFkError::DegenerateGeometry("up direction is parallel to aim direction".to_string())
    })?;
    let up = binormal.cross(forward).normalize();

    let aim = DQuat::from_rotation_arc(AIM_AXIS.unit(), forward);
    let secondary = aim * SECONDARY_AXIS.unit();

    let dot = secondary.dot(up).clamp(-1.0, 1.0);
    let mut angle = dot.acos();
    let mut twist = DQuat::from_axis_angle(forward, angle);

    // acos only yields [0, π]; the roll may need to go the other way round.
    if !(twist * secondary).abs_diff_eq(up, TWIST_TOLERANCE) {
        angle = TAU - angle;
        twist = DQuat::from_axis_angle(forward, angle);
    }

    Ok(AimFrame {
        orientation: (twist * aim).normalize(),
        twist: angle,
        forward,
        up,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DMat3;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_frame(frame: &AimFrame, forward: DVec3, up: DVec3) {
        let x = frame.orientation * DVec3::X;
        let y = frame.orientation * DVec3::Y;
        assert!(x.abs_diff_eq(forward, TWIST_TOLERANCE), "x = {x}, expected {forward}");
        assert!(y.abs_diff_eq(up, TWIST_TOLERANCE), "y = {y}, expected {up}");
    }

    #[test]
    fn test_short_twist_branch() {
        // Aim along +X, roll +Y onto +Z: a quarter turn the short way.
        let frame = build_aim_frame(DVec3::ZERO, DVec3::X, DVec3::X + DVec3::Z, false).unwrap();
        assert!((frame.twist - FRAC_PI_2).abs() < 1e-9);
        assert_frame(&frame, DVec3::X, DVec3::Z);
    }

    #[test]
    fn test_long_twist_branch() {
        // Rolling +Y onto -Z needs three quarter turns about +X.
        let frame = build_aim_frame(DVec3::ZERO, DVec3::X, DVec3::X - DVec3::Z, false).unwrap();
        assert!(frame.twist > PI);
        assert!((frame.twist - 3.0 * FRAC_PI_2).abs() < 1e-9);
        assert_frame(&frame, DVec3::X, -DVec3::Z);
    }

    #[test]
    fn test_short_twist_branch_mirrored() {
        // Mirroring negates both directions: aim -X gives forward +X.
        let aim = -DVec3::X;
        let frame = build_aim_frame(DVec3::ZERO, aim, aim - DVec3::Z, true).unwrap();
        assert!((frame.twist - FRAC_PI_2).abs() < 1e-9);
        assert_frame(&frame, DVec3::X, DVec3::Z);
    }

    #[test]
    fn test_long_twist_branch_mirrored() {
        let aim = -DVec3::X;
        let frame = build_aim_frame(DVec3::ZERO, aim, aim + DVec3::Z, true).unwrap();
        assert!(frame.twist > PI);
        assert_frame(&frame, DVec3::X, -DVec3::Z);
    }

    #[test]
    fn test_no_twist_needed() {
        let frame = build_aim_frame(DVec3::ZERO, DVec3::X, DVec3::X + DVec3::Y, false).unwrap();
        assert!(frame.twist.abs() < 1e-6 || (frame.twist - TAU).abs() < 1e-6);
        assert_frame(&frame, DVec3::X, DVec3::Y);
    }

    #[test]
    fn test_half_turn_twist() {
        let frame = build_aim_frame(DVec3::ZERO, DVec3::X, DVec3::X - DVec3::Y, false).unwrap();
        assert_frame(&frame, DVec3::X, -DVec3::Y);
    }

    #[test]
    fn test_up_is_orthogonalized() {
        let position = DVec3::new(1.0, 2.0, 3.0);
        let aim = DVec3::new(4.0, 6.0, 3.0);
        let up_target = aim + DVec3::new(0.3, 1.0, 0.2);
        let frame = build_aim_frame(position, aim, up_target, false).unwrap();

        let forward = (aim - position).normalize();
        assert!(frame.forward.abs_diff_eq(forward, 1e-12));
        assert!(frame.up.dot(forward).abs() < 1e-12);
        assert!(frame.up.dot(up_target - aim) > 0.0);
        assert_frame(&frame, frame.forward, frame.up);
    }

    #[test]
    fn test_mirrored_frame_is_behaviour_mirror() {
        // Reflect across the YZ plane. The mirrored solve on reflected input
        // must equal -R * M where M is the unmirrored solve.
        let reflect = DMat3::from_diagonal(DVec3::new(-1.0, 1.0, 1.0));
        let position = DVec3::new(2.0, 1.0, -0.5);
        let aim = DVec3::new(5.0, -1.0, 1.0);
        let up_target = DVec3::new(4.0, 3.0, 2.0);

        let left = build_aim_frame(position, aim, up_target, false).unwrap();
        let right = build_aim_frame(
            reflect * position,
            reflect * aim,
            reflect * up_target,
            true,
        )
        .unwrap();

        let expected = -(reflect * DMat3::from_quat(left.orientation));
        let actual = DMat3::from_quat(right.orientation);
        for (a, e) in [
            (actual.x_axis, expected.x_axis),
            (actual.y_axis, expected.y_axis),
            (actual.z_axis, expected.z_axis),
        ] {
            assert!(a.abs_diff_eq(e, 1e-9), "{a} != {e}");
        }
    }

    #[test]
    fn test_opposite_aim_axis() {
        // from_rotation_arc must cope with an aim straight down -X.
        let frame = build_aim_frame(DVec3::ZERO, -DVec3::X, -DVec3::X + DVec3::Y, false).unwrap();
        assert_frame(&frame, -DVec3::X, DVec3::Y);
    }

    #[test]
    fn test_degenerate_frames() {
        assert!(build_aim_frame(DVec3::ONE, DVec3::ONE, DVec3::Y, false)
            .unwrap_err()
            .is_geometric());
        assert!(build_aim_frame(DVec3::ZERO, DVec3::X, DVec3::X, false)
            .unwrap_err()
            .is_geometric());
        assert!(
            build_aim_frame(DVec3::ZERO, DVec3::X, DVec3::X * 3.0, false)
                .unwrap_err()
                .is_geometric()
        );
    }

    #[test]
    fn test_float_noise_is_degenerate() {
        let noise = DVec3::new(1e-15, -2e-15, 0.0);
        assert!(build_aim_frame(DVec3::ONE, DVec3::ONE + noise, DVec3::Y, false)
            .unwrap_err()
            .is_geometric());
        assert!(build_aim_frame(DVec3::ZERO, DVec3::X, DVec3::X + noise, false)
            .unwrap_err()
            .is_geometric());
        // Up target a hair off the aim line.
        let up_target = DVec3::X * 3.0 + DVec3::new(0.0, 1e-13, 0.0);
        assert!(build_aim_frame(DVec3::ZERO, DVec3::X, up_target, false)
            .unwrap_err()
            .is_geometric());
    }
}
