//! Decoding of environment maps and material textures.

use std::path::Path;

use anyhow::Context;

use crate::resources::{AssetRoot, load_binary};
use crate::scene::Environment;
use crate::scene::material::TextureRef;

/// A decoded image, always expanded to tightly packed rgba8.
pub struct TextureData {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Decodes from bytes, sniffing the format from the content rather than
    /// the file name. `label` only feeds error messages.
    pub fn from_bytes(bytes: &[u8], label: &str) -> anyhow::Result<Self> {
        let image = image::load_from_memory(bytes).with_context(|| format!("decoding {label}"))?;
        let rgba = image.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        Ok(Self {
            rgba: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Mean colour over every pixel, linear 0..1.
    pub fn mean_colour(&self) -> [f32; 3] {
        let pixels = (self.width * self.height) as f64;
        if pixels == 0.0 {
            return [0.0, 0.0, 0.0];
        }
        let mut sums = [0.0f64; 3];
        for pixel in self.rgba.chunks_exact(4) {
            sums[0] += pixel[0] as f64;
            sums[1] += pixel[1] as f64;
            sums[2] += pixel[2] as f64;
        }
        [
            (sums[0] / pixels / 255.0) as f32,
            (sums[1] / pixels / 255.0) as f32,
            (sums[2] / pixels / 255.0) as f32,
        ]
    }
}

/// Loads and validates `environment/sky.env` under the asset root.
///
/// Assembly is synchronous, so this read is too; a scene that cannot load
/// its environment is supposed to fail assembly. The returned value starts
/// at intensity 1.0 with a skybox requested.
pub fn load_environment(root: &AssetRoot) -> anyhow::Result<Environment> {
    let path = root.environment();
    let bytes = read_sync(&path)?;
    let data = TextureData::from_bytes(&bytes, &path.display().to_string())?;
    Ok(Environment {
        source: path,
        dimensions: (data.width, data.height),
        ambient: data.mean_colour(),
        intensity: 1.0,
        skybox: true,
    })
}

/// Resolves a texture reference against the asset root and decodes it.
pub async fn load_texture(root: &AssetRoot, reference: &TextureRef) -> anyhow::Result<TextureData> {
    let path = root.resolve_texture(&reference.stem)?;
    let bytes = load_binary(&path).await?;
    TextureData::from_bytes(&bytes, &reference.stem)
}

fn read_sync(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}
