//! ikfk-rs: IK/FK pose matching and baking for three-joint limbs.
//!
//! A limb module is a root-mid-tip FK chain paired with an IK handle and a
//! pole-vector target. The matchers compute the transforms one side must take
//! to reproduce the other's world-space pose, and the baking driver repeats
//! a matcher on every frame of a range, keying the result.
//!
//! # Quick Start
//!
//! ```no_run
//! use ikfk_rs::*;
//!
//! fn main() -> Result<()> {
//!     let mut scene = MemoryScene::new();
//!     // ... build or load a rig into `scene` ...
//!
//!     let mut switcher = Switcher::new(SwitchOptions::default());
//!     let names = LimbNames {
//!         fk: [
//!             "arm_L0_fk0_ctl".to_string(),
//!             "arm_L0_fk1_ctl".to_string(),
//!             "arm_L0_fk2_ctl".to_string(),
//!         ],
//!         pole: "arm_L0_upv_ctl".to_string(),
//!         ik: vec!["arm_L0_ik_ctl".to_string()],
//!     };
//!     switcher.register_names(&scene, "arm_L0", &names)?;
//!
//!     // Snap FK onto the current IK pose, then bake it over the timeline.
//!     switcher.snap_fk_to_ik::<_, &str>(&mut scene, None);
//!     let report = switcher.bake_fk_to_ik::<_, &str>(&mut scene, None, None)?;
//!     println!("baked {} frames", report.frames_baked);
//!     Ok(())
//! }
//! ```
//!
//! # Hosts
//!
//! The matchers never own scene state. A host application implements
//! [`SceneGraph`], [`Timeline`], [`Keying`] and [`Selection`]; [`MemoryScene`]
//! is an in-process implementation for headless use and tests.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod bake;
pub mod batch;
pub mod matcher;
pub mod switcher;

// Re-export core types
pub use ikfk_core::{
    build_aim_frame, orthogonal_pole_vector, project_pole_vector, solve_elbow, AimFrame, Axis,
    Channel, FrameRange, Host, IkFkError, Keying, LimbModule, LimbNames, MemoryScene, ObjectId,
    PoleFallback, RelativeFilter, Result, SceneGraph, Selection, SelectionSet, Side,
    SwitchOptions, Timeline, Transform, DMat4, DQuat, DVec3, REACH_EPSILON, TWIST_TOLERANCE,
};

pub use bake::{bake, bake_with, BakeReport, FrameFailure};
pub use batch::{match_modules, BatchReport};
pub use matcher::{
    match_fk_to_ik, match_ik_to_fk, match_module, match_tip, MatchDirection, PolePlacement,
    TipDirection,
};
pub use switcher::Switcher;
