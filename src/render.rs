//! Frame rendering for the stand-in viewer.
//!
//! The renderer walks the scene arena each frame, lazily uploads geometry
//! for nodes it has not seen yet and rewrites their per-node instance data
//! (world matrix plus material tint). Patches can therefore add nodes at any
//! point between frames without touching GPU state themselves.
//!
//! # Key types
//!
//! - [`SceneRenderer`] owns the pipeline and the per-node GPU meshes
//! - [`SceneVertex`] is the interleaved position/normal vertex stream
//! - [`NodeInstanceRaw`] is the per-node instance stream
//!
//! Shadow maps, glow and the full PBR treatment described by the material
//! descriptors are out of scope for this presenter; nodes draw flat-shaded
//! with their albedo tint.

use std::collections::{HashMap, HashSet};

use cgmath::Matrix3;
use wgpu::util::DeviceExt;

use crate::context::Context;
use crate::geometry;
use crate::pipelines::scene::mk_scene_pipeline;
use crate::scene::Scene;
use crate::scene::node::{MeshData, Node, NodeId, NodeSource, Transform};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for SceneVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-node instance data: world matrix, normal matrix and material tint.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeInstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    tint: [f32; 3],
}

impl NodeInstanceRaw {
    fn new(world: &Transform, tint: [f32; 3]) -> Self {
        Self {
            model: world.to_matrix().into(),
            // Rotation only; good enough while scales stay uniform-ish.
            normal: Matrix3::from(world.rotation).into(),
            tint,
        }
    }
}

impl Vertex for NodeInstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<NodeInstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 25]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
}

impl GpuMesh {
    fn upload(ctx: &Context, label: &str, data: &MeshData) -> Self {
        let vertices: Vec<SceneVertex> = data
            .positions
            .iter()
            .enumerate()
            .map(|(index, position)| SceneVertex {
                position: *position,
                normal: data.normals.get(index).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let instance_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Instance Buffer")),
                contents: bytemuck::cast_slice(&[NodeInstanceRaw::new(
                    &Transform::default(),
                    [1.0, 1.0, 1.0],
                )]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            instance_buffer,
        }
    }
}

pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    meshes: HashMap<NodeId, GpuMesh>,
    warned_materials: HashSet<String>,
}

impl SceneRenderer {
    pub fn new(ctx: &Context) -> Self {
        let pipeline = mk_scene_pipeline(
            &ctx.device,
            &ctx.config,
            &ctx.camera.bind_group_layout,
            &ctx.key_light.bind_group_layout,
        );
        Self {
            pipeline,
            meshes: HashMap::new(),
            warned_materials: HashSet::new(),
        }
    }

    /// Uploads geometry for nodes seen for the first time and refreshes
    /// every node's instance data.
    // TODO: share one GPU mesh between nodes spawned from the same shape
    pub fn prepare(&mut self, ctx: &Context, scene: &Scene) {
        for (id, node) in scene.nodes() {
            if !self.meshes.contains_key(&id) {
                let data = match &node.source {
                    NodeSource::Primitive(shape) => Some(geometry::tessellate(shape)),
                    NodeSource::Imported(mesh) => Some(mesh.clone()),
                    NodeSource::Empty => None,
                };
                if let Some(data) = data {
                    if !data.indices.is_empty() {
                        self.meshes.insert(id, GpuMesh::upload(ctx, &node.name, &data));
                    }
                }
            }
            if self.meshes.contains_key(&id) {
                let raw = NodeInstanceRaw::new(node.world(), self.resolve_tint(scene, node));
                let mesh = &self.meshes[&id];
                ctx.queue
                    .write_buffer(&mesh.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
            }
        }
    }

    fn resolve_tint(&mut self, scene: &Scene, node: &Node) -> [f32; 3] {
        match &node.material {
            Some(name) => match scene.material(name) {
                Some(material) => material.albedo_tint,
                None => {
                    if self.warned_materials.insert(name.clone()) {
                        log::warn!("node {} references unknown material {name}", node.name);
                    }
                    [1.0, 1.0, 1.0]
                }
            },
            None => [1.0, 1.0, 1.0],
        }
    }

    /// Records one draw per uploaded node into the pass.
    pub fn record<'a>(&'a self, ctx: &'a Context, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
        render_pass.set_bind_group(1, &ctx.key_light.bind_group, &[]);
        for mesh in self.meshes.values() {
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, mesh.instance_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
