//! Rig fixtures shared by the integration tests.
#![allow(dead_code)]

use ikfk_rs::*;

/// Handles of one arm built by [`build_arm`].
pub struct Arm {
    pub module: LimbModule,
    pub root_npo: ObjectId,
    pub root: ObjectId,
    pub mid_npo: ObjectId,
    pub mid: ObjectId,
    pub tip_npo: ObjectId,
    pub tip: ObjectId,
    pub ik_npo: ObjectId,
    pub ik: ObjectId,
    pub pole: ObjectId,
}

impl Arm {
    /// Every object of the rig, offset groups included.
    pub fn all_objects(&self) -> Vec<ObjectId> {
        vec![
            self.root_npo,
            self.root,
            self.mid_npo,
            self.mid,
            self.tip_npo,
            self.tip,
            self.ik_npo,
            self.ik,
            self.pole,
        ]
    }
}

/// Object names following the `<module>_<role>_ctl` convention.
pub fn limb_names(name: &str) -> LimbNames {
    LimbNames {
        fk: [
            format!("{name}_fk0_ctl"),
            format!("{name}_fk1_ctl"),
            format!("{name}_fk2_ctl"),
        ],
        pole: format!("{name}_upv_ctl"),
        ik: vec![format!("{name}_ik_ctl")],
    }
}

/// Builds an arm whose FK joints sit at `root`, `mid` and `tip`, with each
/// joint's aim axis along its bone (away from it on right-side modules).
///
/// Every control sits under an offset group holding its rest pose, and the
/// IK handle's rest pose coincides with the FK tip's.
pub fn build_arm(scene: &mut MemoryScene, name: &str, root: DVec3, mid: DVec3, tip: DVec3) -> Arm {
    let side = Side::from_module_name(name).unwrap_or_default();
    let mirrored = side.is_mirrored();

    let pole = project_pole_vector(root, mid, tip).unwrap();
    let root_rot = build_aim_frame(root, mid, pole, mirrored).unwrap().orientation;
    let mid_rot = build_aim_frame(mid, tip, pole, mirrored).unwrap().orientation;
    let at = DMat4::from_rotation_translation;

    let root_npo = scene
        .add_world(format!("{name}_fk0_npo"), None, at(root_rot, root))
        .unwrap();
    let root_ctl = scene
        .add(format!("{name}_fk0_ctl"), Some(root_npo), DMat4::IDENTITY)
        .unwrap();
    let mid_npo = scene
        .add_world(format!("{name}_fk1_npo"), Some(root_ctl), at(mid_rot, mid))
        .unwrap();
    let mid_ctl = scene
        .add(format!("{name}_fk1_ctl"), Some(mid_npo), DMat4::IDENTITY)
        .unwrap();
    let tip_npo = scene
        .add_world(format!("{name}_fk2_npo"), Some(mid_ctl), at(mid_rot, tip))
        .unwrap();
    let tip_ctl = scene
        .add(format!("{name}_fk2_ctl"), Some(tip_npo), DMat4::IDENTITY)
        .unwrap();
    let ik_npo = scene
        .add_world(format!("{name}_ik_npo"), None, at(mid_rot, tip))
        .unwrap();
    let ik_ctl = scene
        .add(format!("{name}_ik_ctl"), Some(ik_npo), DMat4::IDENTITY)
        .unwrap();
    let upv_ctl = scene
        .add_world(format!("{name}_upv_ctl"), None, DMat4::from_translation(pole))
        .unwrap();

    let module = LimbModule::resolve(scene, name, &limb_names(name)).unwrap();
    module.validate_hierarchy(scene).unwrap();

    Arm {
        module,
        root_npo,
        root: root_ctl,
        mid_npo,
        mid: mid_ctl,
        tip_npo,
        tip: tip_ctl,
        ik_npo,
        ik: ik_ctl,
        pole: upv_ctl,
    }
}

/// A left arm in the XY plane, bent at the elbow towards +Y.
pub fn left_arm(scene: &mut MemoryScene) -> Arm {
    build_arm(
        scene,
        "arm_L0",
        DVec3::new(1.0, 10.0, 0.0),
        DVec3::new(4.0, 11.0, -0.5),
        DVec3::new(7.0, 10.0, 0.0),
    )
}

/// Mirror of [`left_arm`] across the YZ plane.
pub fn right_arm(scene: &mut MemoryScene) -> Arm {
    build_arm(
        scene,
        "arm_R0",
        DVec3::new(-1.0, 10.0, 0.0),
        DVec3::new(-4.0, 11.0, -0.5),
        DVec3::new(-7.0, 10.0, 0.0),
    )
}

/// A left leg hanging down, bent forward at the knee.
pub fn left_leg(scene: &mut MemoryScene) -> Arm {
    build_arm(
        scene,
        "leg_L0",
        DVec3::new(1.0, 9.0, 0.0),
        DVec3::new(1.0, 5.0, 1.0),
        DVec3::new(1.0, 1.0, 0.0),
    )
}

/// Moves `id` to a world position and keys its resulting local transform.
pub fn key_world_position(scene: &mut MemoryScene, id: ObjectId, frame: i32, position: DVec3) {
    scene.set_world_translation(id, position).unwrap();
    let local = Transform::from_matrix(scene.local_transform(id).unwrap());
    scene.insert_key(id, frame, local).unwrap();
}

pub fn world(scene: &MemoryScene, id: ObjectId) -> DMat4 {
    scene.world_transform(id).unwrap()
}

pub fn position(scene: &MemoryScene, id: ObjectId) -> DVec3 {
    scene.world_translation(id).unwrap()
}

pub fn assert_close(actual: DVec3, expected: DVec3, tolerance: f64) {
    assert!(
        actual.abs_diff_eq(expected, tolerance),
        "{actual} != {expected} (tolerance {tolerance})"
    );
}

pub fn assert_same_matrix(actual: DMat4, expected: DMat4, tolerance: f64) {
    assert!(
        actual.abs_diff_eq(expected, tolerance),
        "{actual} != {expected} (tolerance {tolerance})"
    );
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
