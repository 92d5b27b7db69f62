//! Core abstractions for ikfk-rs.
//!
//! This crate provides the types and math the IK/FK matchers are built on:
//! - [`LimbModule`] and [`SelectionSet`] describing the limbs of a rig
//! - Solver routines: [`project_pole_vector`], [`solve_elbow`] and
//!   [`build_aim_frame`]
//! - The [`SceneGraph`], [`Timeline`], [`Keying`] and [`Selection`] traits a
//!   host implements, and [`MemoryScene`], an in-process host
//! - Configuration options and the crate-wide error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Solver variables follow the triangle notation (a, b, c, x, h)
#![allow(clippy::many_single_char_names)]

pub mod aim;
pub mod elbow;
pub mod error;
pub mod frame_range;
pub mod module;
pub mod options;
pub mod pole;
pub mod registry;
pub mod scene;
pub mod transform;

pub use aim::{build_aim_frame, AimFrame, TWIST_TOLERANCE};
pub use elbow::{solve_elbow, REACH_EPSILON};
pub use error::{IkFkError, Result};
pub use frame_range::FrameRange;
pub use module::{LimbModule, LimbNames, Side};
pub use options::SwitchOptions;
pub use pole::{orthogonal_pole_vector, project_pole_vector, PoleFallback};
pub use registry::SelectionSet;
pub use scene::{
    Channel, Host, Keying, MemoryScene, ObjectId, RelativeFilter, SceneGraph, Selection, Timeline,
};
pub use transform::{matrix_axis, try_direction, try_inverse, Axis, Transform, LENGTH_EPSILON};

// Re-export glam types for convenience
pub use glam::{DMat4, DQuat, DVec3};
