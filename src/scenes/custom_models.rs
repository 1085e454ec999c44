//! A single imported model over the asphalt ground.

use futures::FutureExt;

use crate::camera::FreeCamera;
use crate::resources::model::import_model;
use crate::resources::texture::load_environment;
use crate::scene::Scene;
use crate::scene::material::MaterialFactory;
use crate::scene::node::Shape;
use crate::scene::patch::ScenePatch;
use crate::stage::{Out, SceneBuilder};

/// Imports `barrel.glb` into an environment-lit scene. The barrel lands
/// wherever the file put it; the continuation only logs what arrived.
pub struct CustomModel;

impl SceneBuilder for CustomModel {
    fn assemble(&mut self, scene: &mut Scene) -> anyhow::Result<Out> {
        scene.set_camera(
            FreeCamera::new((0.0, 1.0, -5.0))
                .with_speed(0.25)
                .attach_control(),
        );

        let environment = load_environment(scene.assets())?;
        scene.install_environment(environment);
        scene.set_environment_intensity(1.0);

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

        let assets = scene.assets().clone();
        let import = async move {
            let import = import_model(&assets, "barrel.glb").await?;
            log::info!("barrel.glb meshes: {:?}", import.node_names());
            let mut patch = ScenePatch::new();
            patch.insert_model(import);
            Ok(patch)
        }
        .boxed();

        Ok(Out::Patches(vec![import]))
    }
}
