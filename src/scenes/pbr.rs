//! Physically based materials on a ground and a sphere.

use cgmath::Vector3;

use crate::camera::FreeCamera;
use crate::resources::texture::load_environment;
use crate::scene::Scene;
use crate::scene::light::Light;
use crate::scene::material::MaterialFactory;
use crate::scene::node::Shape;
use crate::stage::{Out, SceneBuilder};

/// An environment-lit ground with a tiled asphalt set and a bare sphere.
///
/// The hemispheric light is present but muted so the image-based lighting
/// from the environment map carries the shading.
pub struct PhysicalMaterials;

impl SceneBuilder for PhysicalMaterials {
    fn assemble(&mut self, scene: &mut Scene) -> anyhow::Result<Out> {
        scene.set_camera(
            FreeCamera::new((0.0, 3.0, -5.0))
                .with_speed(0.25)
                .attach_control(),
        );

        scene.add_light(Light::hemispheric("hemiLight", Vector3::unit_y()).with_intensity(0.0));

        let environment = load_environment(scene.assets())?;
        scene.install_environment(environment);

        scene.add_material(
            MaterialFactory::texture_set("asphalt", "asphalt")
                .roughness(1.0)
                .build(),
        );
        let ground = scene.spawn(
            "ground",
            Shape::Ground {
                width: 10.0,
                depth: 10.0,
            },
        );
        scene.set_material(ground, "asphalt");

        scene.add_material(MaterialFactory::plain("magic").build());
        let ball = scene.spawn("ball", Shape::Sphere { diameter: 1.0 });
        scene.set_position(ball, Vector3::new(0.0, 1.0, 0.0));
        scene.set_material(ball, "magic");

        Ok(Out::Empty)
    }
}
