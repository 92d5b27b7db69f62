//! Pose matching between the FK chain and the IK controls of one module.
//!
//! Both matchers read every input before writing anything, so a module whose
//! pose is degenerate is left untouched.

use glam::{DMat4, DVec3};
use ikfk_core::{
    build_aim_frame, matrix_axis, orthogonal_pole_vector, project_pole_vector, solve_elbow,
    try_direction, try_inverse, Axis, IkFkError, LimbModule, ObjectId, PoleFallback, Result,
    SceneGraph, SwitchOptions,
};

/// Sine of the angle below which the root's Y axis counts as lying along
/// the upper bone.
const ROLL_EPSILON: f64 = 1e-6;

/// Which representation is snapped onto the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchDirection {
    /// Move the IK handle and pole target onto the FK pose.
    IkToFk,
    /// Rotate the FK joints onto the IK pose.
    FkToIk,
}

impl MatchDirection {
    /// Returns the objects this direction writes for `module`.
    pub fn driven_objects(self, module: &LimbModule) -> Vec<ObjectId> {
        match self {
            MatchDirection::IkToFk => vec![module.pole(), module.ik_handle()],
            MatchDirection::FkToIk => vec![module.root(), module.mid()],
        }
    }
}

/// Which end of the limb follows the other in [`match_tip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipDirection {
    /// The IK handle is moved onto the FK tip.
    IkFollowsFk,
    /// The FK tip is moved onto the IK handle.
    FkFollowsIk,
}

/// Where [`match_ik_to_fk`] put the pole target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolePlacement {
    /// Projected from the bent FK chain.
    Projected(DVec3),
    /// The chain was straight; a fixed perpendicular was used.
    Orthogonal(DVec3),
    /// The chain was straight; the pole was left where it was.
    Kept,
}

fn parent_world<S: SceneGraph + ?Sized>(scene: &S, id: ObjectId) -> Result<DMat4> {
    match scene.parent(id)? {
        Some(parent) => scene.world_transform(parent),
        None => Ok(DMat4::IDENTITY),
    }
}

/// Rest pose of the FK tip's parent space.
///
/// Composes the world matrix of the root's parent with the local matrix of
/// each following joint's parent, skipping the joints' own animated values.
pub fn neutral_fk_pose<S: SceneGraph + ?Sized>(scene: &S, module: &LimbModule) -> Result<DMat4> {
    let mut pose = parent_world(scene, module.root())?;
    for joint in [module.mid(), module.tip()] {
        let Some(parent) = scene.parent(joint)? else {
            return Err(IkFkError::MissingParent(scene.name(joint)?));
        };
        pose *= scene.local_transform(parent)?;
    }
    Ok(pose)
}

/// Rest pose of the IK handle: the world matrix of its parent.
pub fn neutral_ik_pose<S: SceneGraph + ?Sized>(scene: &S, module: &LimbModule) -> Result<DMat4> {
    parent_world(scene, module.ik_handle())
}

/// Snaps one end of the limb onto the other, keeping the rest-pose offset
/// between the FK tip and the IK handle.
pub fn match_tip<S: SceneGraph + ?Sized>(
    scene: &mut S,
    module: &LimbModule,
    direction: TipDirection,
) -> Result<()> {
    let neutral_fk = neutral_fk_pose(scene, module)?;
    let neutral_ik = neutral_ik_pose(scene, module)?;

    let (driver, driven, neutral_driver, neutral_driven) = match direction {
        TipDirection::IkFollowsFk => (module.tip(), module.ik_handle(), neutral_fk, neutral_ik),
        TipDirection::FkFollowsIk => (module.ik_handle(), module.tip(), neutral_ik, neutral_fk),
    };

    let offset = try_inverse(&neutral_driver, "neutral driver pose")? * neutral_driven;
    let result = scene.world_transform(driver)? * offset;
    scene.set_world_transform(driven, result)
}

/// Moves the IK handle onto the FK tip and places the pole target so the IK
/// solve bends the limb like the FK chain.
///
/// Only the pole target and the IK handle are written.
pub fn match_ik_to_fk<S: SceneGraph + ?Sized>(
    scene: &mut S,
    module: &LimbModule,
    options: &SwitchOptions,
) -> Result<PolePlacement> {
    let root = scene.world_translation(module.root())?;
    let mid = scene.world_translation(module.mid())?;
    let tip = scene.world_translation(module.tip())?;

    let placement = match project_pole_vector(root, mid, tip) {
        Ok(pole) => PolePlacement::Projected(pole),
        Err(err) => {
            log::warn!(
                "'{}': {err}; pole fallback {:?}",
                module.name(),
                options.pole_fallback
            );
            match options.pole_fallback {
                PoleFallback::KeepCurrent => PolePlacement::Kept,
                PoleFallback::Orthogonal => {
                    PolePlacement::Orthogonal(orthogonal_pole_vector(root, mid, tip))
                }
            }
        }
    };

    match_tip(scene, module, TipDirection::IkFollowsFk)?;
    match placement {
        PolePlacement::Projected(pole) | PolePlacement::Orthogonal(pole) => {
            scene.set_world_translation(module.pole(), pole)?;
        }
        PolePlacement::Kept => {}
    }

    log::debug!("'{}': IK matched to FK ({placement:?})", module.name());
    Ok(placement)
}

/// Rotates the FK root and mid joints so the chain reaches the IK handle
/// with the bend given by the pole target.
///
/// Writes the root rotation, the mid rotation and the mid translation. The
/// tip keeps its authored local transform. No option affects this direction;
/// `_options` keeps the signature in line with [`match_ik_to_fk`].
pub fn match_fk_to_ik<S: SceneGraph + ?Sized>(
    scene: &mut S,
    module: &LimbModule,
    _options: &SwitchOptions,
) -> Result<DVec3> {
    let mirrored = module.is_mirrored();

    let root_world = scene.world_transform(module.root())?;
    let root = root_world.w_axis.truncate();
    let mid = scene.world_translation(module.mid())?;
    let tip = scene.world_translation(module.tip())?;
    let end = scene.world_translation(module.ik_handle())?;
    let pole = scene.world_translation(module.pole())?;

    let upper = (mid - root).length();
    let lower = (tip - mid).length();
    let elbow = solve_elbow(root, end, pole, upper, lower)?;

    // The root keeps its current roll: its up target sits along its own
    // secondary axis, pre-flipped on mirrored limbs since the frame flips it
    // back. If that axis lines up with the new upper bone the roll is
    // undefined, and the root rolls into the bend plane like the mid joint.
    let mut root_up = try_direction(matrix_axis(&root_world, Axis::Y))
        .ok_or_else(|| IkFkError::DegenerateGeometry("root joint has no Y axis".to_string()))?;
    if mirrored {
        root_up = -root_up;
    }
    let upper_dir = (elbow - root).normalize_or_zero();
    let root_up_target = if root_up.cross(upper_dir).length() < ROLL_EPSILON {
        log::debug!(
            "'{}': root Y axis is along the upper bone, rolling towards the pole",
            module.name()
        );
        pole
    } else {
        elbow + root_up
    };
    let root_frame = build_aim_frame(root, elbow, root_up_target, mirrored)?;
    let mid_frame = build_aim_frame(elbow, end, pole, mirrored)?;

    scene.set_world_rotation(module.root(), root_frame.orientation)?;
    scene.set_world_rotation(module.mid(), mid_frame.orientation)?;
    scene.set_world_translation(module.mid(), elbow)?;

    log::debug!(
        "'{}': FK matched to IK, elbow at {elbow}, twists {:.4}/{:.4}",
        module.name(),
        root_frame.twist,
        mid_frame.twist
    );
    Ok(elbow)
}

/// Runs the matcher for `direction` on one module.
pub fn match_module<S: SceneGraph + ?Sized>(
    scene: &mut S,
    module: &LimbModule,
    direction: MatchDirection,
    options: &SwitchOptions,
) -> Result<()> {
    match direction {
        MatchDirection::IkToFk => match_ik_to_fk(scene, module, options).map(|_| ()),
        MatchDirection::FkToIk => match_fk_to_ik(scene, module, options).map(|_| ()),
    }
}
