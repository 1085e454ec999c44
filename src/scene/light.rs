//! Light sources, shadow generators and the glow layer.

use std::collections::HashSet;

use cgmath::{Point3, Vector3};

use crate::scene::node::NodeId;

/// Kind-specific light geometry. Colour and intensity are common to all
/// kinds and live on [`Light`] itself.
#[derive(Clone, Debug)]
pub enum LightKind {
    /// Ambient dome light. `direction` points at the sky half; `ground` is
    /// the colour blended in from the opposite half.
    Hemispheric {
        direction: Vector3<f32>,
        ground: [f32; 3],
    },
    /// Parallel rays travelling along `direction`.
    Directional { direction: Vector3<f32> },
    Point { position: Point3<f32> },
    /// Cone light. `angle` is the full cone angle in radians and `exponent`
    /// shapes the falloff towards the cone edge.
    Spot {
        position: Point3<f32>,
        direction: Vector3<f32>,
        angle: f32,
        exponent: f32,
    },
}

/// A named light source.
#[derive(Clone, Debug)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub intensity: f32,
    pub shadow_enabled: bool,
    /// Near clip of the shadow frustum. Kept on the light, like the far
    /// clip, while map size and filtering live on the generator.
    pub shadow_min_z: Option<f32>,
    pub shadow_max_z: Option<f32>,
    /// Exact name of the node this light rides on, resolved against the
    /// arena when positions are needed. Unresolved names leave the light in
    /// world space.
    pub parent: Option<String>,
}

impl Light {
    fn new(name: impl Into<String>, kind: LightKind) -> Self {
        Self {
            name: name.into(),
            kind,
            diffuse: [1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0],
            intensity: 1.0,
            shadow_enabled: false,
            shadow_min_z: None,
            shadow_max_z: None,
            parent: None,
        }
    }

    pub fn hemispheric(name: impl Into<String>, direction: Vector3<f32>) -> Self {
        Self::new(
            name,
            LightKind::Hemispheric {
                direction,
                ground: [0.0, 0.0, 0.0],
            },
        )
    }

    pub fn directional(name: impl Into<String>, direction: Vector3<f32>) -> Self {
        Self::new(name, LightKind::Directional { direction })
    }

    pub fn point(name: impl Into<String>, position: Point3<f32>) -> Self {
        Self::new(name, LightKind::Point { position })
    }

    pub fn spot(
        name: impl Into<String>,
        position: Point3<f32>,
        direction: Vector3<f32>,
        angle: f32,
        exponent: f32,
    ) -> Self {
        Self::new(
            name,
            LightKind::Spot {
                position,
                direction,
                angle,
                exponent,
            },
        )
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_diffuse(mut self, rgb: [f32; 3]) -> Self {
        self.diffuse = rgb;
        self
    }

    pub fn with_specular(mut self, rgb: [f32; 3]) -> Self {
        self.specular = rgb;
        self
    }

    /// Ground colour of a hemispheric light. Ignored for other kinds.
    pub fn with_ground(mut self, rgb: [f32; 3]) -> Self {
        if let LightKind::Hemispheric { ground, .. } = &mut self.kind {
            *ground = rgb;
        }
        self
    }

    /// Enables shadow casting from this light and sets the shadow frustum
    /// clip range.
    pub fn with_shadows(mut self, min_z: f32, max_z: f32) -> Self {
        self.shadow_enabled = true;
        self.shadow_min_z = Some(min_z);
        self.shadow_max_z = Some(max_z);
        self
    }

    pub fn with_parent(mut self, node: impl Into<String>) -> Self {
        self.parent = Some(node.into());
        self
    }
}

/// Shadow map filtering modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowFilter {
    Hard,
    Poisson,
    Exponential,
    BlurExponential,
    CloseExponential,
    /// Blurred exponential map tuned for casters close to the light. The
    /// showcases use this to keep close-range shadow edges from aliasing.
    BlurCloseExponential,
}

/// Shadow map configuration for a single light.
///
/// A scene holds at most one generator per light; attaching a second one
/// replaces the first. Casters are registered explicitly and independently of
/// the per-node `receives_shadows` flag.
#[derive(Clone, Debug)]
pub struct ShadowGenerator {
    pub light: String,
    pub map_size: u32,
    pub filter: ShadowFilter,
    casters: HashSet<NodeId>,
}

impl ShadowGenerator {
    pub fn new(light: impl Into<String>, map_size: u32) -> Self {
        if !map_size.is_power_of_two() {
            log::warn!("shadow map size {map_size} is not a power of two");
        }
        Self {
            light: light.into(),
            map_size,
            filter: ShadowFilter::Hard,
            casters: HashSet::new(),
        }
    }

    pub fn with_filter(mut self, filter: ShadowFilter) -> Self {
        self.filter = filter;
        self
    }

    pub(crate) fn register_caster(&mut self, id: NodeId) {
        self.casters.insert(id);
    }

    pub fn is_caster(&self, id: NodeId) -> bool {
        self.casters.contains(&id)
    }

    pub fn caster_count(&self) -> usize {
        self.casters.len()
    }
}

/// Post-process layer making emissive surfaces bleed.
#[derive(Clone, Debug)]
pub struct GlowLayer {
    pub name: String,
    pub intensity: f32,
}

impl GlowLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intensity: 1.0,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }
}
