//! The environment/material showcases, driven headless over a temp asset
//! tree.

use cgmath::{InnerSpace, Point3, Vector3};
use diorama::scene::light::LightKind;
use diorama::scene::node::{ROOT_NODE, Select};
use diorama::scenes::{CompositeModel, CustomModel, PhysicalMaterials};
use diorama::stage::{StageSettings, run_headless};

mod common;
use common::test_utils::{BARREL_GLTF, CAMPFIRE_GLTF, SKY_PIXEL, TempAssets};

fn settings_for(assets: &TempAssets) -> StageSettings {
    StageSettings {
        assets: assets.root(),
        ..StageSettings::default()
    }
}

#[test]
fn physical_materials_assembles_ground_ball_and_muted_light() {
    let assets = TempAssets::new("pbr");
    assets.write_environment();

    let scene = run_headless(vec![Box::new(PhysicalMaterials)], settings_for(&assets), 2).unwrap();

    let camera = scene.camera();
    assert_eq!(camera.position, Point3::new(0.0, 3.0, -5.0));
    assert_eq!(camera.speed, 0.25);
    assert!(camera.controllable);

    let environment = scene.environment().expect("environment installed");
    assert_eq!(environment.intensity, 1.0);
    assert!(environment.skybox);
    for (channel, expected) in environment.ambient.iter().zip(SKY_PIXEL) {
        assert!((channel - expected as f32 / 255.0).abs() < 1e-3);
    }

    let hemi = scene.light("hemiLight").expect("muted hemispheric light");
    assert_eq!(hemi.intensity, 0.0);
    assert!(matches!(hemi.kind, LightKind::Hemispheric { .. }));

    let ground = scene.find("ground").unwrap();
    assert_eq!(scene.node(ground).unwrap().material.as_deref(), Some("asphalt"));
    let asphalt = scene.material("asphalt").unwrap();
    assert_eq!(asphalt.roughness, Some(1.0));

    let ball = scene.find("ball").unwrap();
    assert_eq!(
        scene.world_position(ball).unwrap(),
        Vector3::new(0.0, 1.0, 0.0)
    );
    assert_eq!(scene.node(ball).unwrap().material.as_deref(), Some("magic"));
    assert!(scene.material("magic").unwrap().albedo.is_none());
}

#[test]
fn custom_model_imports_the_barrel_next_to_the_ground() {
    let assets = TempAssets::new("barrel");
    assets.write_environment();
    assets.write_model("barrel.glb", BARREL_GLTF);

    let scene = run_headless(vec![Box::new(CustomModel)], settings_for(&assets), 2).unwrap();

    assert_eq!(scene.camera().position, Point3::new(0.0, 1.0, -5.0));
    assert_eq!(scene.environment().unwrap().intensity, 1.0);

    assert!(scene.find("ground").is_some());
    let barrel = scene.find("barrel").expect("imported barrel node");
    // Inserted unchanged: the file's own transform holds.
    assert_eq!(
        scene.world_position(barrel).unwrap(),
        Vector3::new(0.0, 0.5, 0.0)
    );
}

#[test]
fn composite_model_moves_as_one_group() {
    let assets = TempAssets::new("campfire");
    assets.write_environment();
    assets.write_model("campfire.glb", CAMPFIRE_GLTF);

    let scene = run_headless(vec![Box::new(CompositeModel)], settings_for(&assets), 2).unwrap();

    assert_eq!(scene.camera().position, Point3::new(0.0, 2.0, -8.0));
    assert_eq!(scene.environment().unwrap().intensity, 0.5);

    let offset = Vector3::new(-3.0, 0.0, 0.0);
    let root = scene.find(ROOT_NODE).unwrap();
    assert_eq!(scene.world_position(root).unwrap(), offset);

    // Descendants carried their in-file offsets along with the root.
    let group = scene.find("campfire").unwrap();
    let group_world = scene.world_position(group).unwrap();
    assert!((group_world - (Vector3::new(0.5, 0.0, 0.5) + offset)).magnitude() < 1e-5);

    let log_a = scene.find("log_a").unwrap();
    let relative = scene.world_position(log_a).unwrap() - group_world;
    assert!((relative - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-5);

    assert_eq!(scene.select(&Select::All).len(), 4);
}

#[test]
fn a_rejected_import_leaves_the_loop_ticking_on_a_partial_scene() {
    let assets = TempAssets::new("missing-model");
    assets.write_environment();
    // barrel.glb is never written.

    let scene = run_headless(vec![Box::new(CustomModel)], settings_for(&assets), 3).unwrap();

    // The synchronous half of the scene exists, the import's nodes do not.
    assert!(scene.find("ground").is_some());
    assert!(scene.find("barrel").is_none());
    assert_eq!(scene.node_count(), 1);
}
