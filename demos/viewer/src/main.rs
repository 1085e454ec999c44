//! Hosting binary for the showcase scenes.
//!
//! Picks a showcase by its first argument and runs it against a window.
//! Expects an `assets/` tree next to the binary (or in the working
//! directory) with `environment/sky.env`, `models/*.glb` and
//! `textures/<set>/{diffuse,normal,ao_rough_metal}.*`.

use diorama::scene::gizmo::AttachMode;
use diorama::scenes::{CompositeModel, CustomModel, LightsAndShadows, PhysicalMaterials};
use diorama::stage::{self, SceneBuilder, StageSettings};

fn main() -> anyhow::Result<()> {
    let pick = std::env::args().nth(1).unwrap_or_else(|| "pbr".to_string());
    let builder: Box<dyn SceneBuilder> = match pick.as_str() {
        "pbr" => Box::new(PhysicalMaterials),
        "barrel" => Box::new(CustomModel),
        "campfire" => Box::new(CompositeModel),
        "shadows" => Box::new(LightsAndShadows::new()),
        "shadows-pointer" => {
            Box::new(LightsAndShadows::new().with_attach_mode(AttachMode::PointerGated))
        }
        other => {
            eprintln!(
                "unknown scene {other}; pick one of pbr, barrel, campfire, shadows, shadows-pointer"
            );
            std::process::exit(2);
        }
    };

    let settings = StageSettings {
        title: format!("diorama - {pick}"),
        ..StageSettings::default()
    };
    stage::run(vec![builder], settings)
}
