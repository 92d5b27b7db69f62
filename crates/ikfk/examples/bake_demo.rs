//! Bakes an animated IK arm onto its FK joints in an in-memory scene.
//!
//! Run with `RUST_LOG=debug` to see the per-module matcher output.

use ikfk_rs::*;

/// Builds `arm_L0`: three FK controls under offset groups, an IK handle and
/// a pole target, with the arm bent at (4, 11, -0.5).
fn build_arm(scene: &mut MemoryScene) -> Result<LimbNames> {
    let root = DVec3::new(1.0, 10.0, 0.0);
    let mid = DVec3::new(4.0, 11.0, -0.5);
    let tip = DVec3::new(7.0, 10.0, 0.0);

    let pole = project_pole_vector(root, mid, tip)?;
    let root_rot = build_aim_frame(root, mid, pole, false)?.orientation;
    let mid_rot = build_aim_frame(mid, tip, pole, false)?.orientation;

    let fk0_npo = scene.add_world(
        "arm_L0_fk0_npo",
        None,
        DMat4::from_rotation_translation(root_rot, root),
    )?;
    let fk0 = scene.add("arm_L0_fk0_ctl", Some(fk0_npo), DMat4::IDENTITY)?;
    let fk1_npo = scene.add_world(
        "arm_L0_fk1_npo",
        Some(fk0),
        DMat4::from_rotation_translation(mid_rot, mid),
    )?;
    let fk1 = scene.add("arm_L0_fk1_ctl", Some(fk1_npo), DMat4::IDENTITY)?;
    let fk2_npo = scene.add_world(
        "arm_L0_fk2_npo",
        Some(fk1),
        DMat4::from_rotation_translation(mid_rot, tip),
    )?;
    scene.add("arm_L0_fk2_ctl", Some(fk2_npo), DMat4::IDENTITY)?;

    let ik_npo = scene.add_world(
        "arm_L0_ik_npo",
        None,
        DMat4::from_rotation_translation(mid_rot, tip),
    )?;
    scene.add("arm_L0_ik_ctl", Some(ik_npo), DMat4::IDENTITY)?;
    scene.add_world("arm_L0_upv_ctl", None, DMat4::from_translation(pole))?;

    Ok(LimbNames {
        fk: [
            "arm_L0_fk0_ctl".to_string(),
            "arm_L0_fk1_ctl".to_string(),
            "arm_L0_fk2_ctl".to_string(),
        ],
        pole: "arm_L0_upv_ctl".to_string(),
        ik: vec!["arm_L0_ik_ctl".to_string()],
    })
}

/// Keys the IK handle on a small circle in front of the shoulder.
fn animate_ik(scene: &mut MemoryScene, handle: ObjectId) -> Result<()> {
    let (start, end) = scene.playback_range();
    for frame in start..=end {
        let angle = f64::from(frame - start) / f64::from(end - start + 1) * std::f64::consts::TAU;
        let target = DVec3::new(5.5, 8.0 + angle.sin(), 1.5 + angle.cos());
        scene.set_world_translation(handle, target)?;
        let local = Transform::from_matrix(scene.local_transform(handle)?);
        scene.insert_key(handle, frame, local)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let mut scene = MemoryScene::new().with_playback_range(1, 12);
    let names = build_arm(&mut scene)?;

    let mut switcher = Switcher::new(SwitchOptions::default());
    switcher.register_names(&scene, "arm_L0", &names)?;

    let module = switcher.modules().get_required("arm_L0")?.clone();
    animate_ik(&mut scene, module.ik_handle())?;

    let report = switcher.bake_fk_to_ik::<_, &str>(&mut scene, None, None)?;
    log::info!(
        "baked {} frame(s) of {:?}, {} key(s), complete: {}",
        report.frames_baked,
        report.modules,
        report.keys_set,
        report.is_complete()
    );

    for frame in report.range.frames() {
        scene.set_current_frame(frame);
        let tip = scene.world_translation(module.tip())?;
        let handle = scene.world_translation(module.ik_handle())?;
        log::info!(
            "frame {frame:>2}: FK tip {tip:.3}, IK handle {handle:.3}, gap {:.2e}",
            (tip - handle).length()
        );
    }

    Ok(())
}
