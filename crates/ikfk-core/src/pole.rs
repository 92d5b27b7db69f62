//! Pole-vector placement from an FK chain.
//!
//! The pole target is placed in the plane of the chain, pushed out from the
//! mid joint perpendicular to the root-tip line, so an IK solve driven by it
//! bends the limb the same way the FK chain is bent.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{IkFkError, Result};
use crate::transform::{try_direction, LENGTH_EPSILON};

/// Perpendicular components shorter than this are treated as collinear.
pub const COLLINEAR_EPSILON: f64 = LENGTH_EPSILON;

/// What to do when the chain is straight and the bend plane is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PoleFallback {
    /// Leave the pole target where it currently is.
    #[default]
    KeepCurrent,
    /// Use a fixed perpendicular of the root-tip axis.
    Orthogonal,
}

/// Computes the pole position for the chain `root`, `mid`, `tip`.
///
/// The result lies in the chain's plane at `|mid - root|` from `mid`, on the
/// side the chain bends towards.
///
/// # Errors
///
/// Returns [`IkFkError::DegenerateGeometry`] if `root` and `tip` coincide or
/// the three points are collinear.
pub fn project_pole_vector(root: DVec3, mid: DVec3, tip: DVec3) -> Result<DVec3> {
    let ac = try_direction(tip - root).ok_or_else(|| {
        IkFkError::DegenerateGeometry("root and tip joints coincide".to_string())
    })?;

    let ab = mid - root;
    let projected = root + ac * ab.dot(ac);
    let perpendicular = mid - projected;
    if perpendicular.length() < COLLINEAR_EPSILON {
        return Err(IkFkError::DegenerateGeometry(
            "root, mid and tip joints are collinear".to_string(),
        ));
    }

    Ok(mid + perpendicular.normalize() * ab.length())
}

/// Fallback pole position for a straight chain.
///
/// Deterministic for a given input: the offset direction is derived from the
/// root-tip axis alone.
#[must_use]
pub fn orthogonal_pole_vector(root: DVec3, mid: DVec3, tip: DVec3) -> DVec3 {
    let axis = (tip - root).try_normalize().unwrap_or(DVec3::X);
    mid + axis.any_orthonormal_vector() * (mid - root).length()
}
