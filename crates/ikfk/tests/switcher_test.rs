//! Session-level tests: registration, targeting and the snap/bake actions.

mod common;

use common::*;
use ikfk_rs::*;

struct Rig {
    scene: MemoryScene,
    left: Arm,
    right: Arm,
    leg: Arm,
    switcher: Switcher,
}

fn rig() -> Rig {
    let mut scene = MemoryScene::new();
    let left = left_arm(&mut scene);
    let right = right_arm(&mut scene);
    let leg = left_leg(&mut scene);

    let mut switcher = Switcher::default();
    for name in ["arm_L0", "arm_R0", "leg_L0"] {
        switcher
            .register_names(&scene, name, &limb_names(name))
            .unwrap();
    }

    Rig {
        scene,
        left,
        right,
        leg,
        switcher,
    }
}

fn all_modules() -> Vec<String> {
    vec![
        "arm_L0".to_string(),
        "arm_R0".to_string(),
        "leg_L0".to_string(),
    ]
}

#[test]
fn test_register_by_names() {
    init_logging();
    let Rig {
        scene,
        left,
        right,
        mut switcher,
        ..
    } = rig();

    assert_eq!(switcher.modules().len(), 3);
    assert_eq!(switcher.modules().get("arm_L0"), Some(&left.module));
    assert_eq!(switcher.modules().owner_of(right.pole), Some("arm_R0"));
    assert!(switcher.modules().get("arm_R0").unwrap().is_mirrored());

    let err = switcher
        .register_names(&scene, "arm_L0", &limb_names("arm_L0"))
        .unwrap_err();
    assert!(matches!(err, IkFkError::ModuleExists(name) if name == "arm_L0"));

    switcher.clear();
    assert!(switcher.modules().is_empty());
}

#[test]
fn test_register_rejects_bad_modules() {
    let mut scene = MemoryScene::new();
    left_arm(&mut scene);
    let mut switcher = Switcher::default();

    let mut swapped = limb_names("arm_L0");
    swapped.fk.swap(1, 2);
    assert!(matches!(
        switcher.register_names(&scene, "arm_L0", &swapped),
        Err(IkFkError::InvalidHierarchy(_))
    ));

    let mut missing = limb_names("arm_L0");
    missing.ik = vec!["arm_L0_ik_ctl".to_string(), "arm_L0_ikRot_ctl".to_string()];
    assert!(matches!(
        switcher.register_names(&scene, "arm_L0", &missing),
        Err(IkFkError::ObjectNotFound(name)) if name == "arm_L0_ikRot_ctl"
    ));

    let mut empty = limb_names("arm_L0");
    empty.ik.clear();
    assert!(matches!(
        switcher.register_names(&scene, "arm_L0", &empty),
        Err(IkFkError::InvalidModule(_))
    ));

    assert!(switcher.modules().is_empty());
}

#[test]
fn test_targets_fall_back_from_names_to_selection_to_all() {
    let Rig {
        mut scene,
        left,
        leg,
        switcher,
        ..
    } = rig();

    // Nothing selected: every module.
    let report = switcher.snap_ik_to_fk::<_, &str>(&mut scene, None);
    assert!(report.is_success());
    assert_eq!(report.matched, all_modules());

    // A selected control picks its module.
    scene.select(&[left.ik, leg.pole, left.root]);
    let report = switcher.snap_ik_to_fk::<_, &str>(&mut scene, None);
    assert_eq!(
        report.matched,
        vec!["arm_L0".to_string(), "leg_L0".to_string()]
    );

    // Explicit names ignore the selection.
    let report = switcher.snap_ik_to_fk(&mut scene, Some(&["arm_R0"][..]));
    assert_eq!(report.matched, vec!["arm_R0".to_string()]);

    // A selection outside every module counts as no selection.
    let stray = scene.add("stray", None, DMat4::IDENTITY).unwrap();
    scene.select(&[stray]);
    let report = switcher.snap_ik_to_fk::<_, &str>(&mut scene, None);
    assert_eq!(report.matched, all_modules());

    // An empty explicit list counts as no names.
    scene.clear_selection();
    let none: [&str; 0] = [];
    let report = switcher.snap_ik_to_fk(&mut scene, Some(&none[..]));
    assert_eq!(report.matched, all_modules());
}

#[test]
fn test_failed_module_does_not_stop_the_others() {
    let Rig {
        mut scene,
        left,
        right,
        leg,
        switcher,
    } = rig();

    // Make arm_R0 unsolvable.
    let right_root = position(&scene, right.root);
    scene.set_world_translation(right.ik, right_root).unwrap();
    scene
        .set_world_translation(left.ik, DVec3::new(5.0, 6.0, 2.0))
        .unwrap();
    scene
        .set_world_translation(leg.ik, DVec3::new(1.0, 3.0, 1.0))
        .unwrap();

    let report =
        switcher.snap_fk_to_ik(&mut scene, Some(&["arm_L0", "nope", "arm_R0", "leg_L0"][..]));

    assert!(!report.is_success());
    assert_eq!(
        report.matched,
        vec!["arm_L0".to_string(), "leg_L0".to_string()]
    );
    assert!(matches!(
        report.failure("nope"),
        Some(IkFkError::ModuleNotFound(_))
    ));
    assert!(report.failure("arm_R0").is_some_and(IkFkError::is_geometric));
    assert!(report.failure("arm_L0").is_none());

    assert_close(position(&scene, left.tip), DVec3::new(5.0, 6.0, 2.0), 1e-6);
    assert_close(position(&scene, leg.tip), DVec3::new(1.0, 3.0, 1.0), 1e-6);
}

#[test]
fn test_snap_round_trip() {
    let Rig {
        mut scene,
        left,
        switcher,
        ..
    } = rig();

    scene
        .set_world_rotation(left.root, DQuat::from_rotation_z(-0.3))
        .unwrap();
    let tip = position(&scene, left.tip);

    let names = Some(&["arm_L0"][..]);
    assert!(switcher.snap_ik_to_fk(&mut scene, names).is_success());
    assert_close(position(&scene, left.ik), tip, 1e-9);

    // Undo the FK pose, then bring it back from the IK controls.
    scene
        .set_world_rotation(left.root, DQuat::from_rotation_z(0.5))
        .unwrap();
    assert!(switcher.snap_fk_to_ik(&mut scene, names).is_success());
    assert_close(position(&scene, left.tip), tip, 1e-6);
}

#[test]
fn test_bake_uses_configured_range() {
    let Rig {
        mut scene,
        left,
        right,
        mut switcher,
        ..
    } = rig();

    switcher.set_options(
        SwitchOptions::new().with_frame_range(FrameRange::new(2, 4).unwrap()),
    );
    assert_eq!(
        switcher.options().frame_range,
        Some(FrameRange::new(2, 4).unwrap())
    );

    let report = switcher
        .bake_ik_to_fk(&mut scene, Some(&["arm_L0"][..]), None)
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(scene.keyed_frames(left.ik), vec![2, 3, 4]);
    assert!(scene.keyed_frames(right.ik).is_empty());

    let report = switcher
        .bake_fk_to_ik::<_, &str>(&mut scene, None, Some(FrameRange::single(7)))
        .unwrap();
    assert_eq!(report.modules, all_modules());
    assert_eq!(report.keys_set, 3);
    assert_eq!(scene.keyed_frames(right.root), vec![7]);
}

#[test]
fn test_options_from_json_drive_the_fallback() {
    let mut scene = MemoryScene::new();
    let arm = build_arm(
        &mut scene,
        "arm_L0",
        DVec3::new(0.0, 10.0, 0.0),
        DVec3::new(5.0, 11.0, 0.0),
        DVec3::new(10.0, 10.0, 0.0),
    );
    // Straighten the FK chain.
    scene.set_world_rotation(arm.root, DQuat::IDENTITY).unwrap();
    scene
        .set_world_translation(arm.mid, DVec3::new(5.0, 10.0, 0.0))
        .unwrap();
    scene
        .set_world_translation(arm.tip, DVec3::new(10.0, 10.0, 0.0))
        .unwrap();
    let pole = position(&scene, arm.pole);

    let mut switcher = Switcher::default();
    switcher.register(arm.module.clone()).unwrap();
    assert!(switcher.snap_ik_to_fk::<_, &str>(&mut scene, None).is_success());
    assert_close(position(&scene, arm.pole), pole, 1e-12);

    let options = SwitchOptions::from_json_str(r#"{ "pole_fallback": "Orthogonal" }"#).unwrap();
    assert_eq!(options.key_channels, SwitchOptions::default().key_channels);
    switcher.set_options(options);
    assert!(switcher.snap_ik_to_fk::<_, &str>(&mut scene, None).is_success());
    let moved = position(&scene, arm.pole);
    assert!((moved - pole).length() > 1e-3);
    assert!((moved - DVec3::new(5.0, 10.0, 0.0)).dot(DVec3::X).abs() < 1e-9);
}
