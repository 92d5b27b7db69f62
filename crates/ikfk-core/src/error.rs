//! Error types for ikfk-rs.

use thiserror::Error;

use crate::scene::ObjectId;

/// The main error type for ikfk-rs operations.
#[derive(Error, Debug)]
pub enum IkFkError {
    /// The input points do not describe a usable triangle or frame.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A limb module with the given name is not registered.
    #[error("module '{0}' not found")]
    ModuleNotFound(String),

    /// A limb module with the given name is already registered.
    #[error("module '{0}' already exists")]
    ModuleExists(String),

    /// A limb module was built with the wrong number of objects.
    #[error("invalid module: {0}")]
    InvalidModule(String),

    /// A frame range whose start lies after its end.
    #[error("invalid frame range: start {start} is after end {end}")]
    InvalidRange { start: i32, end: i32 },

    /// No scene object carries the given name.
    #[error("object '{0}' not found in scene")]
    ObjectNotFound(String),

    /// An object with the given name already exists in the scene.
    #[error("object '{0}' already exists in scene")]
    ObjectExists(String),

    /// The handle does not refer to an object of this scene.
    #[error("unknown object handle {0}")]
    UnknownObject(ObjectId),

    /// A joint has no parent where the neutral pose needs one.
    #[error("object '{0}' has no parent")]
    MissingParent(String),

    /// The FK joints are not parented in root, mid, tip order.
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// A transform could not be inverted.
    #[error("matrix is not invertible: {0}")]
    NonInvertible(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IkFkError {
    /// Returns true for failures caused by the pose itself rather than by
    /// the registry or the scene.
    #[must_use]
    pub fn is_geometric(&self) -> bool {
        matches!(self, IkFkError::DegenerateGeometry(_))
    }
}

/// A specialized Result type for ikfk-rs operations.
pub type Result<T> = std::result::Result<T, IkFkError>;
