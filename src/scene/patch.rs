//! Scene patches: the mutation batches produced by asynchronous work.
//!
//! A continuation that waited for a model import does not touch the scene
//! directly. It builds a [`ScenePatch`] describing everything it wants to
//! change and hands that back to the stage, which applies the whole batch
//! with a single [`Scene::apply`](crate::scene::Scene::apply) call between
//! two frames. Ops run in the order they were pushed, so a patch can insert
//! a model and then select the nodes it just added by name.

use cgmath::Vector3;

use crate::scene::gizmo::{GizmoSettings, LightGizmo};
use crate::scene::light::{GlowLayer, Light, ShadowGenerator};
use crate::scene::material::PbrMaterial;
use crate::scene::node::{ModelImport, Select, Shape};

/// A single scene mutation.
#[derive(Debug)]
pub enum PatchOp {
    InsertModel(ModelImport),
    Spawn {
        name: String,
        shape: Shape,
        position: Vector3<f32>,
        material: Option<String>,
    },
    SetPosition {
        select: Select,
        position: Vector3<f32>,
    },
    AssignMaterial {
        select: Select,
        material: String,
    },
    ReceiveShadows {
        select: Select,
        enabled: bool,
    },
    RegisterCasters {
        light: String,
        select: Select,
    },
    AddMaterial(PbrMaterial),
    AddLight(Light),
    AttachShadowGenerator(ShadowGenerator),
    InstallGlow(GlowLayer),
    AttachLightGizmo(LightGizmo),
    ConfigureGizmos(GizmoSettings),
}

/// An ordered batch of scene mutations, applied atomically.
#[derive(Debug, Default)]
pub struct ScenePatch {
    pub(crate) ops: Vec<PatchOp>,
}

impl ScenePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_model(&mut self, import: ModelImport) -> &mut Self {
        self.ops.push(PatchOp::InsertModel(import));
        self
    }

    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        position: Vector3<f32>,
        material: Option<String>,
    ) -> &mut Self {
        self.ops.push(PatchOp::Spawn {
            name: name.into(),
            shape,
            position,
            material,
        });
        self
    }

    pub fn set_position(&mut self, select: Select, position: Vector3<f32>) -> &mut Self {
        self.ops.push(PatchOp::SetPosition { select, position });
        self
    }

    pub fn assign_material(&mut self, select: Select, material: impl Into<String>) -> &mut Self {
        self.ops.push(PatchOp::AssignMaterial {
            select,
            material: material.into(),
        });
        self
    }

    pub fn receive_shadows(&mut self, select: Select, enabled: bool) -> &mut Self {
        self.ops.push(PatchOp::ReceiveShadows { select, enabled });
        self
    }

    pub fn register_casters(&mut self, light: impl Into<String>, select: Select) -> &mut Self {
        self.ops.push(PatchOp::RegisterCasters {
            light: light.into(),
            select,
        });
        self
    }

    pub fn add_material(&mut self, material: PbrMaterial) -> &mut Self {
        self.ops.push(PatchOp::AddMaterial(material));
        self
    }

    pub fn add_light(&mut self, light: Light) -> &mut Self {
        self.ops.push(PatchOp::AddLight(light));
        self
    }

    pub fn attach_shadow_generator(&mut self, generator: ShadowGenerator) -> &mut Self {
        self.ops.push(PatchOp::AttachShadowGenerator(generator));
        self
    }

    pub fn install_glow(&mut self, glow: GlowLayer) -> &mut Self {
        self.ops.push(PatchOp::InstallGlow(glow));
        self
    }

    pub fn attach_light_gizmo(&mut self, gizmo: LightGizmo) -> &mut Self {
        self.ops.push(PatchOp::AttachLightGizmo(gizmo));
        self
    }

    pub fn configure_gizmos(&mut self, settings: GizmoSettings) -> &mut Self {
        self.ops.push(PatchOp::ConfigureGizmos(settings));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}
