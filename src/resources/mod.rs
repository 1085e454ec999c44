use std::path::{Path, PathBuf};

use anyhow::Context;

/**
 * This module contains all logic for loading models/environments/etc. from
 * the asset tree. Every path funnels through an [`AssetRoot`] handed in by
 * the caller, so the library stays agnostic of where a deployment keeps its
 * assets:
 *
 * - `environment/sky.env` is the prefiltered environment map
 * - `models/<file>` holds glTF files and their sidecar buffers
 * - `textures/<set>/<stem>.<ext>` holds material texture sets
 */
pub mod model;
pub mod texture;

/// Extensions probed, in order, when a texture stem is resolved to a file.
const TEXTURE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Base directory of the asset tree.
#[derive(Clone, Debug)]
pub struct AssetRoot {
    base: PathBuf,
}

impl AssetRoot {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of the prefiltered environment map.
    pub fn environment(&self) -> PathBuf {
        self.base.join("environment").join("sky.env")
    }

    pub fn model(&self, file_name: &str) -> PathBuf {
        self.base.join("models").join(file_name)
    }

    /// Resolves an extension-less texture stem such as
    /// `textures/bricks/diffuse` to the first existing file, probing jpg,
    /// jpeg and png in that order.
    pub fn resolve_texture(&self, stem: &str) -> anyhow::Result<PathBuf> {
        for extension in TEXTURE_EXTENSIONS {
            let candidate = self.base.join(format!("{stem}.{extension}"));
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        anyhow::bail!("no texture found for {stem} under {}", self.base.display())
    }
}

impl Default for AssetRoot {
    /// The tree `build.rs` stages next to the binaries.
    fn default() -> Self {
        Self::new(Path::new("./").join("assets"))
    }
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}
