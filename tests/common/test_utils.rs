//! Shared scaffolding for the scenario tests: temporary asset roots and
//! small hand-written glTF documents.

use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use diorama::resources::AssetRoot;

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

/// Colour of the test environment map, so assertions on the derived ambient
/// tone have a known value.
pub const SKY_PIXEL: [u8; 4] = [64, 128, 192, 255];

/// A throwaway asset tree under the system temp directory, removed on drop.
pub struct TempAssets {
    base: PathBuf,
}

impl TempAssets {
    pub fn new(tag: &str) -> Self {
        let unique = NEXT_ROOT.fetch_add(1, Ordering::Relaxed);
        let base = std::env::temp_dir().join(format!(
            "diorama-test-{tag}-{}-{unique}",
            std::process::id()
        ));
        std::fs::create_dir_all(&base).expect("failed to create temp asset root");
        Self { base }
    }

    pub fn root(&self) -> AssetRoot {
        AssetRoot::new(self.base.clone())
    }

    /// Writes a tiny uniform image as `environment/sky.env`.
    pub fn write_environment(&self) {
        let dir = self.base.join("environment");
        std::fs::create_dir_all(&dir).expect("failed to create environment dir");
        let image = image::RgbaImage::from_pixel(4, 4, image::Rgba(SKY_PIXEL));
        let file = std::fs::File::create(dir.join("sky.env")).expect("failed to create sky.env");
        image
            .write_to(&mut BufWriter::new(file), image::ImageFormat::Png)
            .expect("failed to encode sky.env");
    }

    /// Writes a model file under `models/`. The importer sniffs content, so
    /// JSON documents may carry a `.glb` name.
    pub fn write_model(&self, file_name: &str, document: &str) {
        let dir = self.base.join("models");
        std::fs::create_dir_all(&dir).expect("failed to create models dir");
        std::fs::write(dir.join(file_name), document).expect("failed to write model");
    }
}

impl Drop for TempAssets {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

/// A composite asset: one named group node with two children at distinct
/// offsets, one of them rotated a quarter turn around y.
pub const CAMPFIRE_GLTF: &str = r#"{
  "asset": {"version": "2.0"},
  "scene": 0,
  "scenes": [{"nodes": [0]}],
  "nodes": [
    {"name": "campfire", "children": [1, 2], "translation": [0.5, 0.0, 0.5]},
    {"name": "log_a", "translation": [1.0, 0.0, 0.0]},
    {"name": "log_b", "translation": [0.0, 0.0, 2.0], "rotation": [0.0, 0.7071068, 0.0, 0.7071068]}
  ]
}"#;

/// The room the light/shadow showcase configures: two wall segments, a
/// floor and the two light tubes, all flat under the document scene.
pub const LIGHTING_SCENE_GLTF: &str = r#"{
  "asset": {"version": "2.0"},
  "scene": 0,
  "scenes": [{"nodes": [0, 1, 2, 3, 4]}],
  "nodes": [
    {"name": "wall_left", "translation": [-2.0, 1.0, 0.0]},
    {"name": "wall_right", "translation": [2.0, 1.0, 0.0]},
    {"name": "floor"},
    {"name": "lightTube_left", "translation": [-1.0, 2.0, 0.0]},
    {"name": "lightTube_right", "translation": [1.0, 2.0, 0.0]}
  ]
}"#;

/// A single unparented barrel node.
pub const BARREL_GLTF: &str = r#"{
  "asset": {"version": "2.0"},
  "scene": 0,
  "scenes": [{"nodes": [0]}],
  "nodes": [
    {"name": "barrel", "translation": [0.0, 0.5, 0.0]}
  ]
}"#;
