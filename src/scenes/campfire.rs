//! A multi-mesh model moved as one group.

use cgmath::Vector3;
use futures::FutureExt;

use crate::camera::FreeCamera;
use crate::resources::model::import_model;
use crate::resources::texture::load_environment;
use crate::scene::Scene;
use crate::scene::node::{ROOT_NODE, Select};
use crate::scene::patch::ScenePatch;
use crate::stage::{Out, SceneBuilder};

/// Imports `campfire.glb` and shifts the whole composite to the side.
///
/// Every mesh of the file hangs off the import's synthetic root, so
/// repositioning that single node carries the logs, stones and flames along
/// with their relative offsets intact.
pub struct CompositeModel;

impl SceneBuilder for CompositeModel {
    fn assemble(&mut self, scene: &mut Scene) -> anyhow::Result<Out> {
        scene.set_camera(
            FreeCamera::new((0.0, 2.0, -8.0))
                .with_speed(0.25)
                .attach_control(),
        );

        let environment = load_environment(scene.assets())?;
        scene.install_environment(environment);
        scene.set_environment_intensity(0.5);

        let assets = scene.assets().clone();
        let import = async move {
            let import = import_model(&assets, "campfire.glb").await?;
            log::info!("campfire.glb meshes: {:?}", import.node_names());
            let mut patch = ScenePatch::new();
            patch.insert_model(import);
            patch.set_position(Select::name(ROOT_NODE), Vector3::new(-3.0, 0.0, 0.0));
            Ok(patch)
        }
        .boxed();

        Ok(Out::Patches(vec![import]))
    }
}
