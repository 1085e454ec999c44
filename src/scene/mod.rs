//! The scene model: nodes, materials, lights, shadows and gizmos.
//!
//! This module contains the engine-facing description of a showcase:
//!
//! - `node` holds the node arena records, transforms and name selection
//! - `material` holds PBR material descriptors and their factory
//! - `light` holds light sources, shadow generators and the glow layer
//! - `gizmo` holds editor gizmo configuration
//! - `patch` holds the mutation batches async work resolves to
//!
//! [`Scene`] itself is the mutable container a
//! [`SceneBuilder`](crate::stage::SceneBuilder) assembles synchronously and
//! patches mutate later. It is pure data plus bookkeeping; everything that
//! talks to the GPU lives in [`render`](crate::render) and below.

pub mod gizmo;
pub mod light;
pub mod material;
pub mod node;
pub mod patch;

use std::collections::HashMap;
use std::path::PathBuf;

use cgmath::Vector3;

use crate::camera::FreeCamera;
use crate::resources::AssetRoot;
use crate::scene::gizmo::{GizmoSettings, LightGizmo};
use crate::scene::light::{GlowLayer, Light, ShadowGenerator};
use crate::scene::material::PbrMaterial;
use crate::scene::node::{ModelImport, Node, NodeId, NodeSource, Select, Shape, Transform};
use crate::scene::patch::{PatchOp, ScenePatch};

/// An installed environment cubemap.
///
/// The pixel payload stays on disk; the scene only keeps what assembly
/// validated: dimensions and an average colour the presenter can use as an
/// ambient stand-in.
#[derive(Clone, Debug)]
pub struct Environment {
    pub source: PathBuf,
    pub dimensions: (u32, u32),
    /// Mean colour of the map, linear 0..1.
    pub ambient: [f32; 3],
    pub intensity: f32,
    /// Whether a skybox was requested alongside the reflection map.
    pub skybox: bool,
}

/// The mutable scene a stage drives.
///
/// Nodes live in an arena and are addressed by [`NodeId`] or by name through
/// [`Select`]. Names need not be unique; name-based operations affect every
/// match. Nodes are never removed, so ids stay valid for the scene lifetime.
#[derive(Debug)]
pub struct Scene {
    nodes: Vec<Node>,
    camera: FreeCamera,
    environment: Option<Environment>,
    materials: HashMap<String, PbrMaterial>,
    lights: Vec<Light>,
    shadow_generators: Vec<ShadowGenerator>,
    glow: Option<GlowLayer>,
    gizmos: Vec<LightGizmo>,
    gizmo_settings: GizmoSettings,
    assets: AssetRoot,
}

impl Scene {
    pub fn new(assets: AssetRoot) -> Self {
        Self {
            nodes: Vec::new(),
            camera: FreeCamera::default(),
            environment: None,
            materials: HashMap::new(),
            lights: Vec::new(),
            shadow_generators: Vec::new(),
            glow: None,
            gizmos: Vec::new(),
            gizmo_settings: GizmoSettings::default(),
            assets,
        }
    }

    /// Root of the asset tree this scene loads from.
    pub fn assets(&self) -> &AssetRoot {
        &self.assets
    }

    pub fn set_camera(&mut self, camera: FreeCamera) {
        self.camera = camera;
    }

    pub fn camera(&self) -> &FreeCamera {
        &self.camera
    }

    pub fn install_environment(&mut self, environment: Environment) {
        if self.environment.is_some() {
            log::debug!("environment replaced");
        }
        self.environment = Some(environment);
    }

    pub fn set_environment_intensity(&mut self, intensity: f32) {
        match &mut self.environment {
            Some(environment) => environment.intensity = intensity,
            None => log::warn!("environment intensity set before an environment was installed"),
        }
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    /// Adds a primitive node at the origin and returns its id.
    pub fn spawn(&mut self, name: impl Into<String>, shape: Shape) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            local: Transform::default(),
            world: Transform::default(),
            parent: None,
            children: Vec::new(),
            material: None,
            receives_shadows: false,
            source: NodeSource::Primitive(shape),
        });
        id
    }

    /// Inserts an imported hierarchy and returns the id of its root.
    ///
    /// Node ids are handed out in list order, so the import's internal
    /// parent indices carry over unchanged. Parents must precede their
    /// children, which the importer guarantees.
    pub fn insert_model(&mut self, import: ModelImport) -> Option<NodeId> {
        if import.nodes.is_empty() {
            log::warn!("{}: import carried no nodes", import.file);
            return None;
        }
        let base = self.nodes.len();
        let count = import.nodes.len();
        for (index, imported) in import.nodes.into_iter().enumerate() {
            let id = NodeId(base + index);
            let parent = imported.parent.map(|parent| NodeId(base + parent));
            self.nodes.push(Node {
                name: imported.name,
                local: imported.transform,
                world: Transform::default(),
                parent,
                children: Vec::new(),
                material: None,
                receives_shadows: false,
                source: match imported.mesh {
                    Some(mesh) => NodeSource::Imported(mesh),
                    None => NodeSource::Empty,
                },
            });
            if let Some(parent) = parent {
                self.nodes[parent.0].children.push(id);
            }
        }
        let root = NodeId(base);
        self.refresh_world(root);
        log::info!("{}: {} nodes inserted", self.nodes[root.0].name, count);
        Some(root)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of every node the selector matches, in arena order.
    pub fn select(&self, select: &Select) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| select.matches(&node.name))
            .map(|(id, _)| id)
            .collect()
    }

    /// First node with exactly this name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    pub fn set_position(&mut self, id: NodeId, position: Vector3<f32>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.local.position = position;
            self.refresh_world(id);
        }
    }

    pub fn set_local_transform(&mut self, id: NodeId, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.local = transform;
            self.refresh_world(id);
        }
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vector3<f32>> {
        self.node(id).map(|node| node.world().position)
    }

    pub fn set_material(&mut self, id: NodeId, material: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.material = Some(material.to_string());
        }
    }

    /// Points every matching node at the named material. The material itself
    /// may arrive later; resolution happens at draw time.
    pub fn assign_material(&mut self, select: &Select, material: &str) {
        let ids = self.select(select);
        if ids.is_empty() {
            log::warn!("no nodes match {select:?} for material {material}");
        }
        for id in ids {
            self.nodes[id.0].material = Some(material.to_string());
        }
    }

    pub fn set_receives_shadows(&mut self, select: &Select, enabled: bool) {
        let ids = self.select(select);
        if ids.is_empty() {
            log::warn!("no nodes match {select:?} for shadow receiving");
        }
        for id in ids {
            self.nodes[id.0].receives_shadows = enabled;
        }
    }

    pub fn add_material(&mut self, material: PbrMaterial) {
        if let Some(previous) = self.materials.insert(material.name.clone(), material) {
            log::debug!("material {} redefined", previous.name);
        }
    }

    pub fn material(&self, name: &str) -> Option<&PbrMaterial> {
        self.materials.get(name)
    }

    pub fn add_light(&mut self, light: Light) {
        if let Some(parent) = &light.parent {
            if self.find(parent).is_none() {
                log::warn!("light {} parents to unknown node {parent}", light.name);
            }
        }
        self.lights.push(light);
    }

    /// First light with exactly this name.
    pub fn light(&self, name: &str) -> Option<&Light> {
        self.lights.iter().find(|light| light.name == name)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Attaches a shadow generator to its light. A light owns at most one
    /// generator; a second attachment replaces the first and its casters.
    pub fn attach_shadow_generator(&mut self, generator: ShadowGenerator) {
        if self.light(&generator.light).is_none() {
            log::warn!("shadow generator targets unknown light {}", generator.light);
        }
        match self
            .shadow_generators
            .iter_mut()
            .find(|candidate| candidate.light == generator.light)
        {
            Some(existing) => {
                log::warn!("replacing shadow generator for light {}", generator.light);
                *existing = generator;
            }
            None => self.shadow_generators.push(generator),
        }
    }

    pub fn shadow_generator(&self, light: &str) -> Option<&ShadowGenerator> {
        self.shadow_generators
            .iter()
            .find(|generator| generator.light == light)
    }

    pub fn shadow_generators(&self) -> &[ShadowGenerator] {
        &self.shadow_generators
    }

    /// Registers every node the selector currently matches as a caster for
    /// the light's generator. Nodes inserted later are not picked up
    /// retroactively; register them again.
    pub fn register_casters(&mut self, light: &str, select: &Select) {
        let ids = self.select(select);
        match self
            .shadow_generators
            .iter_mut()
            .find(|generator| generator.light == light)
        {
            Some(generator) => {
                for id in ids {
                    generator.register_caster(id);
                }
            }
            None => log::warn!("no shadow generator attached to light {light}"),
        }
    }

    pub fn install_glow(&mut self, glow: GlowLayer) {
        if self.glow.is_some() {
            log::debug!("glow layer replaced");
        }
        self.glow = Some(glow);
    }

    pub fn glow(&self) -> Option<&GlowLayer> {
        self.glow.as_ref()
    }

    /// Puts a grab widget on a light. One gizmo per light; re-attaching
    /// replaces the previous configuration.
    pub fn attach_light_gizmo(&mut self, gizmo: LightGizmo) {
        if self.light(&gizmo.light).is_none() {
            log::warn!("light gizmo targets unknown light {}", gizmo.light);
        }
        match self
            .gizmos
            .iter_mut()
            .find(|candidate| candidate.light == gizmo.light)
        {
            Some(existing) => *existing = gizmo,
            None => self.gizmos.push(gizmo),
        }
    }

    pub fn light_gizmos(&self) -> &[LightGizmo] {
        &self.gizmos
    }

    pub fn configure_gizmos(&mut self, settings: GizmoSettings) {
        if let Some(target) = &settings.attached_to {
            if self.light(target).is_none() {
                log::warn!("gizmo manager bound to unknown light {target}");
            }
        }
        self.gizmo_settings = settings;
    }

    pub fn gizmo_settings(&self) -> &GizmoSettings {
        &self.gizmo_settings
    }

    /// Applies a patch in one go, running its ops in push order. Nothing
    /// observes the scene between two ops of the same patch.
    pub fn apply(&mut self, patch: ScenePatch) {
        let ops = patch.ops.len();
        for op in patch.ops {
            match op {
                PatchOp::InsertModel(import) => {
                    self.insert_model(import);
                }
                PatchOp::Spawn {
                    name,
                    shape,
                    position,
                    material,
                } => {
                    let id = self.spawn(name, shape);
                    self.set_position(id, position);
                    if let Some(material) = material {
                        self.set_material(id, &material);
                    }
                }
                PatchOp::SetPosition { select, position } => {
                    let ids = self.select(&select);
                    if ids.is_empty() {
                        log::warn!("no nodes match {select:?} for repositioning");
                    }
                    for id in ids {
                        self.set_position(id, position);
                    }
                }
                PatchOp::AssignMaterial { select, material } => {
                    self.assign_material(&select, &material)
                }
                PatchOp::ReceiveShadows { select, enabled } => {
                    self.set_receives_shadows(&select, enabled)
                }
                PatchOp::RegisterCasters { light, select } => {
                    self.register_casters(&light, &select)
                }
                PatchOp::AddMaterial(material) => self.add_material(material),
                PatchOp::AddLight(light) => self.add_light(light),
                PatchOp::AttachShadowGenerator(generator) => {
                    self.attach_shadow_generator(generator)
                }
                PatchOp::InstallGlow(glow) => self.install_glow(glow),
                PatchOp::AttachLightGizmo(gizmo) => self.attach_light_gizmo(gizmo),
                PatchOp::ConfigureGizmos(settings) => self.configure_gizmos(settings),
            }
        }
        log::debug!("patch applied, {ops} ops");
    }

    /// Recomputes the cached world transforms of `id` and everything below
    /// it. The parent's world transform is taken as already valid.
    fn refresh_world(&mut self, id: NodeId) {
        let parent_world = match self.nodes[id.0].parent {
            Some(parent) => self.nodes[parent.0].world.clone(),
            None => Transform::default(),
        };
        self.refresh_world_from(id, &parent_world);
    }

    fn refresh_world_from(&mut self, id: NodeId, parent_world: &Transform) {
        let world = parent_world * &self.nodes[id.0].local;
        self.nodes[id.0].world = world.clone();
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.refresh_world_from(child, &world);
        }
    }
}
