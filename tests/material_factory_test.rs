//! The material factory recipe and its knobs.

use diorama::scene::material::MaterialFactory;

#[test]
fn texture_set_applies_the_full_recipe() {
    let material = MaterialFactory::texture_set("bricks", "bricks").build();

    assert_eq!(material.name, "bricks");
    assert_eq!(
        material.albedo.as_ref().unwrap().stem,
        "textures/bricks/diffuse"
    );
    assert_eq!(
        material.normal.as_ref().unwrap().stem,
        "textures/bricks/normal"
    );
    assert_eq!(
        material.orm.as_ref().unwrap().stem,
        "textures/bricks/ao_rough_metal"
    );

    // Authoring-tool convention: both normal map axes flipped.
    assert!(material.invert_normal_x);
    assert!(material.invert_normal_y);

    // Packed ORM routing: red occlusion, green roughness, blue metallic.
    assert!(material.ao_from_red);
    assert!(material.roughness_from_green);
    assert!(material.metallic_from_blue);

    assert_eq!(material.roughness, None);
}

#[test]
fn uv_scale_tiles_every_texture_on_both_axes() {
    let material = MaterialFactory::texture_set("bricks", "bricks")
        .uv_scale(4.0)
        .build();

    for texture in [&material.albedo, &material.normal, &material.orm] {
        let texture = texture.as_ref().unwrap();
        assert_eq!(texture.u_scale, 4.0);
        assert_eq!(texture.v_scale, 4.0);
    }
}

#[test]
fn textures_default_to_unit_tiling() {
    let material = MaterialFactory::texture_set("soil", "soil").build();
    for texture in [&material.albedo, &material.normal, &material.orm] {
        let texture = texture.as_ref().unwrap();
        assert_eq!(texture.u_scale, 1.0);
        assert_eq!(texture.v_scale, 1.0);
    }
}

#[test]
fn flat_roughness_override_is_independent_of_the_packed_texture() {
    let material = MaterialFactory::texture_set("asphalt", "asphalt")
        .roughness(1.0)
        .build();
    assert_eq!(material.roughness, Some(1.0));
    // The green-channel routing stays on; the override sits on top.
    assert!(material.roughness_from_green);
}

#[test]
fn plain_materials_carry_no_textures() {
    let material = MaterialFactory::plain("magic").tint([0.2, 0.4, 0.9]).build();
    assert!(material.albedo.is_none());
    assert!(material.normal.is_none());
    assert!(material.orm.is_none());
    assert!(!material.invert_normal_x);
    assert_eq!(material.albedo_tint, [0.2, 0.4, 0.9]);
}
