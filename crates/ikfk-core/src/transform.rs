//! Decomposed transforms and matrix helpers.
//!
//! Scene providers exchange full affine matrices; the matchers mostly need
//! one component at a time (a rotation to write, a translation to read, an
//! axis of a joint frame). These helpers keep that bookkeeping in one place.

use glam::{DMat4, DQuat, DVec3};

use crate::error::{IkFkError, Result};

/// Determinants below this are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Vectors shorter than this have no usable direction.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// A transformation represented as separate components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation component.
    pub translation: DVec3,
    /// Rotation component as a quaternion.
    pub rotation: DQuat,
    /// Scale component.
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a transform from a translation.
    #[must_use]
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Creates a transform from a rotation.
    #[must_use]
    pub fn from_rotation(rotation: DQuat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Creates a transform from a matrix.
    ///
    /// This decomposition may not be exact for matrices with shear.
    #[must_use]
    pub fn from_matrix(matrix: DMat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Converts this transform to a matrix.
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Returns a copy with the rotation replaced.
    #[must_use]
    pub fn with_rotation(mut self, rotation: DQuat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns true if both transforms agree within `tolerance` per component.
    ///
    /// Rotations are compared up to quaternion sign.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        let rotation_matches = self.rotation.abs_diff_eq(other.rotation, tolerance)
            || self.rotation.abs_diff_eq(-other.rotation, tolerance);
        rotation_matches
            && self.translation.abs_diff_eq(other.translation, tolerance)
            && self.scale.abs_diff_eq(other.scale, tolerance)
    }
}

/// Axis of a transform matrix, in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Primary (aim) axis.
    X,
    /// Secondary (up) axis.
    Y,
    /// Binormal axis.
    Z,
}

impl Axis {
    /// Returns the unit vector for this axis.
    #[must_use]
    pub fn unit(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }
}

/// Returns the given basis column of `matrix`, including any scale.
#[must_use]
pub fn matrix_axis(matrix: &DMat4, axis: Axis) -> DVec3 {
    match axis {
        Axis::X => matrix.x_axis.truncate(),
        Axis::Y => matrix.y_axis.truncate(),
        Axis::Z => matrix.z_axis.truncate(),
    }
}

/// Normalizes `v`, or returns `None` if it is shorter than
/// [`LENGTH_EPSILON`] or not finite.
#[must_use]
pub fn try_direction(v: DVec3) -> Option<DVec3> {
    if v.length() < LENGTH_EPSILON {
        return None;
    }
    v.try_normalize()
}

/// Inverts `matrix`, failing instead of producing infinities.
///
/// `what` names the matrix in the error message.
pub fn try_inverse(matrix: &DMat4, what: &str) -> Result<DMat4> {
    let det = matrix.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return Err(IkFkError::NonInvertible(what.to_string()));
    }
    Ok(matrix.inverse())
}
