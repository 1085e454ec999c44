//! The light/shadow showcase: spot light, generator, glow, gizmo and the
//! optional light rigs.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Point3, Vector3};
use diorama::scene::gizmo::AttachMode;
use diorama::scene::light::{LightKind, ShadowFilter};
use diorama::scene::node::Select;
use diorama::scenes::LightsAndShadows;
use diorama::stage::{StageSettings, run_headless};

mod common;
use common::test_utils::{LIGHTING_SCENE_GLTF, TempAssets};

fn room_assets(tag: &str) -> TempAssets {
    let assets = TempAssets::new(tag);
    assets.write_model("LightingScene.glb", LIGHTING_SCENE_GLTF);
    assets
}

fn settings_for(assets: &TempAssets) -> StageSettings {
    StageSettings {
        assets: assets.root(),
        ..StageSettings::default()
    }
}

#[test]
fn the_room_is_fully_wired_after_the_import_lands() {
    let assets = room_assets("shadows");
    let scene = run_headless(
        vec![Box::new(LightsAndShadows::new())],
        settings_for(&assets),
        2,
    )
    .unwrap();

    // This showcase deliberately runs without an environment.
    assert!(scene.environment().is_none());
    assert_eq!(scene.camera().position, Point3::new(0.0, 1.0, -5.0));
    assert_eq!(scene.camera().speed, 0.2);

    // The ball spawned by the continuation.
    let ball = scene.find("ball").unwrap();
    assert_eq!(
        scene.world_position(ball).unwrap(),
        Vector3::new(0.0, 1.0, -1.0)
    );

    let glow = scene.glow().expect("glow layer installed");
    assert_eq!(glow.intensity, 0.75);

    // Bricks tile the walls, soil the floor, nothing else is touched.
    for id in scene.select(&Select::prefix("wall")) {
        assert_eq!(scene.node(id).unwrap().material.as_deref(), Some("bricks"));
    }
    let floor = scene.find("floor").unwrap();
    assert_eq!(scene.node(floor).unwrap().material.as_deref(), Some("soil"));
    assert_eq!(scene.material("bricks").unwrap().albedo.as_ref().unwrap().u_scale, 4.0);
    assert_eq!(scene.material("soil").unwrap().normal.as_ref().unwrap().v_scale, 4.0);
    for id in scene.select(&Select::names(["lightTube_left", "lightTube_right"])) {
        assert_eq!(scene.node(id).unwrap().material, None);
    }

    let spot = scene.light("spotLight").expect("spot light added");
    assert_eq!(spot.intensity, 10.0);
    assert!(spot.shadow_enabled);
    assert_eq!(spot.shadow_min_z, Some(1.0));
    assert_eq!(spot.shadow_max_z, Some(10.0));
    match &spot.kind {
        LightKind::Spot {
            position,
            direction,
            angle,
            exponent,
        } => {
            assert_eq!(*position, Point3::new(0.0, 0.5, -3.0));
            assert_eq!(*direction, Vector3::new(0.0, 1.0, 3.0));
            assert_eq!(*angle, FRAC_PI_2);
            assert_eq!(*exponent, 10.0);
        }
        other => panic!("expected a spot light, got {other:?}"),
    }

    let generator = scene.shadow_generator("spotLight").unwrap();
    assert_eq!(generator.map_size, 1024);
    assert_eq!(generator.filter, ShadowFilter::BlurCloseExponential);

    // Everything receives and everything casts, the ball included.
    for (id, node) in scene.nodes() {
        assert!(node.receives_shadows, "{} does not receive", node.name);
        assert!(generator.is_caster(id), "{} does not cast", node.name);
    }

    let gizmo = &scene.light_gizmos()[0];
    assert_eq!(gizmo.light, "spotLight");
    assert_eq!(gizmo.scale_ratio, 2.0);
    let settings = scene.gizmo_settings();
    assert!(settings.position_enabled);
    assert!(settings.rotation_enabled);
    assert_eq!(settings.attach, AttachMode::Always);
    assert_eq!(settings.attached_to.as_deref(), Some("spotLight"));
}

#[test]
fn pointer_gated_gizmos_wait_for_a_pick() {
    let assets = room_assets("shadows-pointer");
    let scene = run_headless(
        vec![Box::new(
            LightsAndShadows::new().with_attach_mode(AttachMode::PointerGated),
        )],
        settings_for(&assets),
        2,
    )
    .unwrap();

    let settings = scene.gizmo_settings();
    assert_eq!(settings.attach, AttachMode::PointerGated);
    assert_eq!(settings.attached_to, None);
    // The gizmo itself is configured either way.
    assert_eq!(scene.light_gizmos().len(), 1);
}

#[test]
fn optional_light_rigs_stay_off_by_default() {
    let assets = room_assets("default-rigs");
    let scene = run_headless(
        vec![Box::new(LightsAndShadows::new())],
        settings_for(&assets),
        2,
    )
    .unwrap();

    assert_eq!(scene.lights().len(), 1);
    assert!(scene.light("hemiLight").is_none());
    assert!(scene.light("pointLight").is_none());
}

#[test]
fn tube_point_lights_ride_their_tubes() {
    let assets = room_assets("tube-lights");
    let scene = run_headless(
        vec![Box::new(
            LightsAndShadows::new()
                .with_tinted_hemisphere()
                .with_overhead_directional()
                .with_tube_point_lights(),
        )],
        settings_for(&assets),
        2,
    )
    .unwrap();

    let hemi = scene.light("hemiLight").unwrap();
    assert_eq!(hemi.diffuse, [1.0, 0.0, 0.0]);
    assert_eq!(hemi.specular, [0.0, 1.0, 0.0]);
    match &hemi.kind {
        LightKind::Hemispheric { ground, .. } => assert_eq!(*ground, [0.0, 0.0, 1.0]),
        other => panic!("expected a hemispheric light, got {other:?}"),
    }

    assert!(scene.light("directionalLight").is_some());

    let warm = [172.0 / 255.0, 246.0 / 255.0, 250.0 / 255.0];
    let left = scene.light("pointLight").unwrap();
    assert_eq!(left.parent.as_deref(), Some("lightTube_left"));
    assert_eq!(left.intensity, 0.25);
    assert_eq!(left.diffuse, warm);
    let right = scene.light("pointClone").unwrap();
    assert_eq!(right.parent.as_deref(), Some("lightTube_right"));

    // The experiment rigs never steal the shadow generator.
    assert_eq!(scene.shadow_generators().len(), 1);
    assert_eq!(scene.shadow_generator("spotLight").unwrap().light, "spotLight");
}
