//! The glTF importer: root synthesis, ordering and transform decomposition.

use cgmath::Vector3;
use diorama::resources::model::parse_model;
use diorama::scene::node::ROOT_NODE;

mod common;
use common::test_utils::{CAMPFIRE_GLTF, LIGHTING_SCENE_GLTF};

#[test]
fn import_prepends_a_synthetic_root() {
    let import = parse_model("campfire.glb", CAMPFIRE_GLTF.as_bytes()).unwrap();

    assert_eq!(import.file, "campfire.glb");
    assert_eq!(import.nodes[0].name, ROOT_NODE);
    assert_eq!(import.nodes[0].parent, None);
    assert_eq!(
        import.node_names(),
        vec![ROOT_NODE, "campfire", "log_a", "log_b"]
    );
}

#[test]
fn parents_precede_their_children() {
    let import = parse_model("campfire.glb", CAMPFIRE_GLTF.as_bytes()).unwrap();

    for (index, node) in import.nodes.iter().enumerate().skip(1) {
        let parent = node.parent.expect("non-root nodes carry a parent");
        assert!(parent < index, "{} parented forward", node.name);
    }
    // Document nodes hang off the root, children off their group.
    assert_eq!(import.nodes[1].parent, Some(0));
    assert_eq!(import.nodes[2].parent, Some(1));
    assert_eq!(import.nodes[3].parent, Some(1));
}

#[test]
fn node_transforms_are_decomposed() {
    let import = parse_model("campfire.glb", CAMPFIRE_GLTF.as_bytes()).unwrap();

    let group = &import.nodes[1];
    assert_eq!(group.transform.position, Vector3::new(0.5, 0.0, 0.5));
    assert_eq!(group.transform.scale, Vector3::new(1.0, 1.0, 1.0));

    let rotated = &import.nodes[3];
    assert_eq!(rotated.name, "log_b");
    // Quarter turn around y, stored wxyz.
    assert!((rotated.transform.rotation.s - 0.7071068).abs() < 1e-5);
    assert!((rotated.transform.rotation.v.y - 0.7071068).abs() < 1e-5);
    assert!(rotated.transform.rotation.v.x.abs() < 1e-6);
    assert!(rotated.transform.rotation.v.z.abs() < 1e-6);
}

#[test]
fn flat_documents_parent_everything_to_the_root() {
    let import = parse_model("LightingScene.glb", LIGHTING_SCENE_GLTF.as_bytes()).unwrap();

    assert_eq!(import.nodes.len(), 6);
    for node in &import.nodes[1..] {
        assert_eq!(node.parent, Some(0));
    }
}

#[test]
fn nodes_without_meshes_stay_empty() {
    let import = parse_model("campfire.glb", CAMPFIRE_GLTF.as_bytes()).unwrap();
    assert!(import.nodes.iter().all(|node| node.mesh.is_none()));
}

#[test]
fn garbage_fails_to_parse() {
    assert!(parse_model("broken.glb", b"not a gltf document").is_err());
}
