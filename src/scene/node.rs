//! Node records, transforms and name-based selection.
//!
//! Every visible or grouping object in a [`Scene`](crate::scene::Scene) is a
//! [`Node`]. Nodes form a hierarchy: each stores a local transform relative to
//! its parent and a cached world transform that the scene refreshes whenever a
//! subtree moves. Imported models arrive as an ordered [`ModelImport`] whose
//! first entry is always a synthetic root, so moving that root moves the whole
//! composite.

use std::ops::Mul;

use cgmath::{Matrix4, Quaternion, Vector3};

/// Name given to the synthetic root inserted above every imported model.
pub const ROOT_NODE: &str = "__root__";

/// Index of a node inside its owning scene's arena.
///
/// Ids are only meaningful for the scene that handed them out and stay valid
/// for the lifetime of that scene; nodes are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Position, rotation and scale relative to the parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Composes two transforms: `parent * local` yields the world transform of a
/// child whose parent sits at `parent`. Scale is applied component-wise and
/// the child offset is scaled and rotated into the parent's frame.
impl Mul for &Transform {
    type Output = Transform;

    fn mul(self, rhs: Self) -> Self::Output {
        let rotation = self.rotation * rhs.rotation;
        let scale = Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let scaled_offset = Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        let position = self.position + self.rotation * scaled_offset;
        Transform {
            position,
            rotation,
            scale,
        }
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

/// Parametric geometry for nodes spawned directly by a builder.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere { diameter: f32 },
    Ground { width: f32, depth: f32 },
    Cube { size: f32 },
}

/// Triangle geometry carried by an imported node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// What a node draws, if anything.
#[derive(Clone, Debug)]
pub enum NodeSource {
    /// Pure grouping node, nothing is drawn.
    Empty,
    Primitive(Shape),
    Imported(MeshData),
}

/// A single entry in the scene arena.
///
/// Transforms are read through [`Node::local`] and [`Node::world`]; writing
/// goes through the scene so the cached world transforms of the whole subtree
/// stay consistent.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub(crate) local: Transform,
    pub(crate) world: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Name of the material this node draws with, resolved lazily at draw
    /// time so patches may deliver the material in the same batch.
    pub material: Option<String>,
    pub receives_shadows: bool,
    pub source: NodeSource,
}

impl Node {
    pub fn local(&self) -> &Transform {
        &self.local
    }

    pub fn world(&self) -> &Transform {
        &self.world
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Name-based node selection.
///
/// `Name` is exact equality and matches every duplicate. `Prefix` is a raw
/// `starts_with` test, so `Prefix("wall")` also picks up `wallpaper`, and the
/// empty prefix matches every node.
#[derive(Clone, Debug, PartialEq)]
pub enum Select {
    Name(String),
    Names(Vec<String>),
    Prefix(String),
    All,
}

impl Select {
    pub fn name(name: impl Into<String>) -> Self {
        Select::Name(name.into())
    }

    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Select::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Select::Prefix(prefix.into())
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Select::Name(exact) => name == exact,
            Select::Names(names) => names.iter().any(|candidate| candidate == name),
            Select::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Select::All => true,
        }
    }
}

/// One node of an imported model, in depth-first order.
///
/// `parent` indexes into the surrounding [`ModelImport::nodes`] list and is
/// `None` only for the synthetic root at index zero. Parents always precede
/// their children in the list.
#[derive(Clone, Debug)]
pub struct ImportedNode {
    pub name: String,
    pub transform: Transform,
    pub parent: Option<usize>,
    pub mesh: Option<MeshData>,
}

impl ImportedNode {
    /// The synthetic root every import starts with.
    pub fn root() -> Self {
        Self {
            name: ROOT_NODE.to_string(),
            transform: Transform::default(),
            parent: None,
            mesh: None,
        }
    }
}

/// Result of loading a model file: the flattened node hierarchy plus the
/// file it came from.
#[derive(Clone, Debug)]
pub struct ModelImport {
    pub file: String,
    pub nodes: Vec<ImportedNode>,
}

impl ModelImport {
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.name.as_str()).collect()
    }
}
