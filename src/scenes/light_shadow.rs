//! Spot light, shadows, glow and a light gizmo on an imported room.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Point3, Vector3};
use futures::FutureExt;

use crate::camera::FreeCamera;
use crate::resources::model::import_model;
use crate::scene::Scene;
use crate::scene::gizmo::{AttachMode, GizmoSettings, LightGizmo};
use crate::scene::light::{GlowLayer, Light, ShadowFilter, ShadowGenerator};
use crate::scene::material::MaterialFactory;
use crate::scene::node::{Select, Shape};
use crate::scene::patch::ScenePatch;
use crate::stage::{Out, SceneBuilder};

const TUBE_LEFT: &str = "lightTube_left";
const TUBE_RIGHT: &str = "lightTube_right";

/// Imports `LightingScene.glb` and configures it once the file is in:
/// bricks on the walls, soil on the floor, a shadowing spot light with a
/// blurred-exponential 1024 map, a glow layer for the light tubes and a
/// movable gizmo on the spot light.
///
/// The extra light rigs the original kept around for experiments stay
/// available as options and are off by default.
#[derive(Clone, Copy)]
pub struct LightsAndShadows {
    attach_mode: AttachMode,
    tinted_hemisphere: bool,
    overhead_directional: bool,
    tube_point_lights: bool,
}

impl LightsAndShadows {
    pub fn new() -> Self {
        Self {
            attach_mode: AttachMode::Always,
            tinted_hemisphere: false,
            overhead_directional: false,
            tube_point_lights: false,
        }
    }

    /// Gizmos bind to the spot light immediately by default; pointer-gated
    /// binding waits for an explicit pick.
    pub fn with_attach_mode(mut self, mode: AttachMode) -> Self {
        self.attach_mode = mode;
        self
    }

    /// Adds a hemispheric light with red diffuse, blue ground and green
    /// specular tint.
    pub fn with_tinted_hemisphere(mut self) -> Self {
        self.tinted_hemisphere = true;
        self
    }

    /// Adds a directional light pointing straight down.
    pub fn with_overhead_directional(mut self) -> Self {
        self.overhead_directional = true;
        self
    }

    /// Adds a dim warm point light inside each of the two light tubes.
    pub fn with_tube_point_lights(mut self) -> Self {
        self.tube_point_lights = true;
        self
    }

    fn build_patch(&self, patch: &mut ScenePatch) {
        patch.spawn(
            "ball",
            Shape::Sphere { diameter: 0.5 },
            Vector3::new(0.0, 1.0, -1.0),
            None,
        );

        patch.install_glow(GlowLayer::new("glowLayer").with_intensity(0.75));

        patch.add_material(
            MaterialFactory::texture_set("bricks", "bricks")
                .uv_scale(4.0)
                .build(),
        );
        patch.assign_material(Select::prefix("wall"), "bricks");

        patch.add_material(
            MaterialFactory::texture_set("soil", "soil")
                .uv_scale(4.0)
                .build(),
        );
        patch.assign_material(Select::name("floor"), "soil");

        if self.tinted_hemisphere {
            patch.add_light(
                Light::hemispheric("hemiLight", Vector3::unit_y())
                    .with_diffuse([1.0, 0.0, 0.0])
                    .with_ground([0.0, 0.0, 1.0])
                    .with_specular([0.0, 1.0, 0.0]),
            );
        }
        if self.overhead_directional {
            patch.add_light(Light::directional(
                "directionalLight",
                Vector3::new(0.0, -1.0, 0.0),
            ));
        }
        if self.tube_point_lights {
            let warm = [172.0 / 255.0, 246.0 / 255.0, 250.0 / 255.0];
            for (name, tube) in [("pointLight", TUBE_LEFT), ("pointClone", TUBE_RIGHT)] {
                patch.add_light(
                    Light::point(name, Point3::new(0.0, 1.0, 0.0))
                        .with_diffuse(warm)
                        .with_intensity(0.25)
                        .with_parent(tube),
                );
            }
        }

        patch.add_light(
            Light::spot(
                "spotLight",
                Point3::new(0.0, 0.5, -3.0),
                Vector3::new(0.0, 1.0, 3.0),
                FRAC_PI_2,
                10.0,
            )
            .with_intensity(10.0)
            .with_shadows(1.0, 10.0),
        );
        patch.attach_shadow_generator(
            ShadowGenerator::new("spotLight", 1024)
                .with_filter(ShadowFilter::BlurCloseExponential),
        );

        // Everything in the room both shows and throws shadows, the spawned
        // ball included.
        patch.receive_shadows(Select::All, true);
        patch.register_casters("spotLight", Select::All);

        patch.attach_light_gizmo(LightGizmo::new("spotLight", 2.0));
        patch.configure_gizmos(GizmoSettings {
            position_enabled: true,
            rotation_enabled: true,
            attach: self.attach_mode,
            attached_to: match self.attach_mode {
                AttachMode::Always => Some("spotLight".to_string()),
                AttachMode::PointerGated => None,
            },
        });
    }
}

impl Default for LightsAndShadows {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder for LightsAndShadows {
    fn assemble(&mut self, scene: &mut Scene) -> anyhow::Result<Out> {
        scene.set_camera(
            FreeCamera::new((0.0, 1.0, -5.0))
                .with_speed(0.2)
                .attach_control(),
        );

        let assets = scene.assets().clone();
        let options = *self;
        let import = async move {
            let import = import_model(&assets, "LightingScene.glb").await?;
            anyhow::ensure!(
                import.nodes.len() > 1,
                "LightingScene.glb resolved without any nodes"
            );
            log::info!("LightingScene.glb meshes: {:?}", import.node_names());
            let mut patch = ScenePatch::new();
            patch.insert_model(import);
            options.build_patch(&mut patch);
            Ok(patch)
        }
        .boxed();

        Ok(Out::Patches(vec![import]))
    }
}
