//! glTF import: flattening a document into ordered node records.
//!
//! The importer walks every scene of the document depth first and prepends a
//! synthetic root, so the result always has the whole file hanging off one
//! node. Mesh primitives are merged per node into a single position/normal/
//! index soup; materials baked into the file are ignored, the showcases
//! assign their own.

use crate::resources::{AssetRoot, load_binary};
use crate::scene::node::{ImportedNode, MeshData, ModelImport, Transform};

/// Loads and parses a model from `models/<file_name>` under the asset root.
/// External `.bin` buffers are resolved next to the model file.
pub async fn import_model(root: &AssetRoot, file_name: &str) -> anyhow::Result<ModelImport> {
    let bytes = load_binary(&root.model(file_name)).await?;
    let gltf = gltf::Gltf::from_slice(&bytes)?;

    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.to_vec());
                };
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(&root.model(uri)).await?;
                buffer_data.push(bin);
            }
        }
    }

    let import = build_import(file_name, &gltf, &buffer_data);
    log::info!("{file_name}: imported {} nodes", import.nodes.len());
    Ok(import)
}

/// Parses a model from bytes already in memory. Only self-contained files
/// work here; anything referencing sidecar buffers needs [`import_model`].
pub fn parse_model(file_name: &str, bytes: &[u8]) -> anyhow::Result<ModelImport> {
    let gltf = gltf::Gltf::from_slice(bytes)?;

    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.to_vec());
                };
            }
            gltf::buffer::Source::Uri(uri) => {
                anyhow::bail!("model {file_name} references external buffer {uri}")
            }
        }
    }

    Ok(build_import(file_name, &gltf, &buffer_data))
}

fn build_import(file_name: &str, gltf: &gltf::Gltf, buffer_data: &[Vec<u8>]) -> ModelImport {
    let mut nodes = vec![ImportedNode::root()];
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            flatten_node(&node, 0, buffer_data, &mut nodes);
        }
    }
    ModelImport {
        file: file_name.to_string(),
        nodes,
    }
}

fn flatten_node(
    node: &gltf::Node,
    parent: usize,
    buffer_data: &[Vec<u8>],
    nodes: &mut Vec<ImportedNode>,
) {
    let index = nodes.len();
    let (position, rotation, scale) = node.transform().decomposed();
    nodes.push(ImportedNode {
        name: node.name().unwrap_or("unnamed").to_string(),
        transform: Transform::new(
            position.into(),
            cgmath::Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
            scale.into(),
        ),
        parent: Some(parent),
        mesh: node.mesh().map(|mesh| mesh_data(&mesh, buffer_data)),
    });
    for child in node.children() {
        flatten_node(&child, index, buffer_data, nodes);
    }
}

/// Merges every primitive of a mesh into one buffer set. Primitives without
/// an index accessor get a sequential one; missing normals fall back to
/// straight up so the mesh still shades.
fn mesh_data(mesh: &gltf::Mesh, buffer_data: &[Vec<u8>]) -> MeshData {
    let mut data = MeshData::default();
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
        let base = data.positions.len() as u32;
        let mut added = 0;
        if let Some(positions) = reader.read_positions() {
            for position in positions {
                data.positions.push(position);
                added += 1;
            }
        }
        if let Some(normals) = reader.read_normals() {
            data.normals.extend(normals);
        }
        while data.normals.len() < data.positions.len() {
            data.normals.push([0.0, 1.0, 0.0]);
        }
        match reader.read_indices() {
            Some(indices) => data
                .indices
                .extend(indices.into_u32().map(|index| index + base)),
            None => data.indices.extend(base..base + added),
        }
    }
    data
}
