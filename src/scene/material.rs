//! PBR material descriptors and the factory recipe shared by every showcase.
//!
//! Materials are pure descriptions: texture references are stored as
//! extension-less stems under the asset root and nothing is read from disk
//! here. Whether the referenced files exist only matters once a presenter
//! decides to sample them.

/// Reference to one texture of a material.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureRef {
    /// Asset-root relative path without extension, e.g.
    /// `textures/bricks/diffuse`. The loader probes jpg/jpeg/png when the
    /// file is actually opened.
    pub stem: String,
    pub u_scale: f32,
    pub v_scale: f32,
}

impl TextureRef {
    pub fn new(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            u_scale: 1.0,
            v_scale: 1.0,
        }
    }
}

/// A physically based material description.
#[derive(Clone, Debug, PartialEq)]
pub struct PbrMaterial {
    pub name: String,
    pub albedo_tint: [f32; 3],
    pub albedo: Option<TextureRef>,
    pub normal: Option<TextureRef>,
    /// Packed occlusion/roughness/metallic map, routed per channel by the
    /// three flags below.
    pub orm: Option<TextureRef>,
    pub invert_normal_x: bool,
    pub invert_normal_y: bool,
    pub ao_from_red: bool,
    pub roughness_from_green: bool,
    pub metallic_from_blue: bool,
    /// Flat roughness override, applied on top of whatever the ORM green
    /// channel says.
    pub roughness: Option<f32>,
}

/// Builder for [`PbrMaterial`] values.
///
/// [`MaterialFactory::texture_set`] applies the full showcase recipe for a
/// named set: diffuse, normal and `ao_rough_metal` textures with both normal
/// axes inverted and the ORM channels routed red to occlusion, green to
/// roughness and blue to metallic.
pub struct MaterialFactory {
    material: PbrMaterial,
}

impl MaterialFactory {
    /// A material with no textures, everything left at its defaults.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            material: PbrMaterial {
                name: name.into(),
                albedo_tint: [1.0, 1.0, 1.0],
                albedo: None,
                normal: None,
                orm: None,
                invert_normal_x: false,
                invert_normal_y: false,
                ao_from_red: false,
                roughness_from_green: false,
                metallic_from_blue: false,
                roughness: None,
            },
        }
    }

    /// The full recipe over the texture set at `textures/<set>/`.
    pub fn texture_set(name: impl Into<String>, set: &str) -> Self {
        let mut factory = Self::plain(name);
        factory.material.albedo = Some(TextureRef::new(format!("textures/{set}/diffuse")));
        factory.material.normal = Some(TextureRef::new(format!("textures/{set}/normal")));
        factory.material.orm = Some(TextureRef::new(format!("textures/{set}/ao_rough_metal")));
        factory.material.invert_normal_x = true;
        factory.material.invert_normal_y = true;
        factory.material.ao_from_red = true;
        factory.material.roughness_from_green = true;
        factory.material.metallic_from_blue = true;
        factory
    }

    /// Applies `scale` to both axes of every texture the material references.
    /// Larger values tile the textures more densely.
    pub fn uv_scale(mut self, scale: f32) -> Self {
        for texture in [
            self.material.albedo.as_mut(),
            self.material.normal.as_mut(),
            self.material.orm.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            texture.u_scale = scale;
            texture.v_scale = scale;
        }
        self
    }

    pub fn roughness(mut self, value: f32) -> Self {
        self.material.roughness = Some(value);
        self
    }

    pub fn tint(mut self, rgb: [f32; 3]) -> Self {
        self.material.albedo_tint = rgb;
        self
    }

    pub fn build(self) -> PbrMaterial {
        self.material
    }
}
