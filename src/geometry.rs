//! Primitive tessellation for spawned shapes.

use std::f32::consts::PI;

use crate::scene::node::{MeshData, Shape};

const SPHERE_LONGITUDES: u32 = 24;
const SPHERE_LATITUDES: u32 = 16;

/// Triangulates a shape into the mesh layout imported models use, so the
/// renderer uploads both the same way.
pub fn tessellate(shape: &Shape) -> MeshData {
    match shape {
        Shape::Sphere { diameter } => sphere(*diameter / 2.0),
        Shape::Ground { width, depth } => ground(*width, *depth),
        Shape::Cube { size } => cube(*size),
    }
}

/// UV sphere centred on the origin. Vertices run pole to pole so the normal
/// at each vertex is just its unit position.
fn sphere(radius: f32) -> MeshData {
    let mut data = MeshData::default();
    for latitude in 0..=SPHERE_LATITUDES {
        let theta = latitude as f32 * PI / SPHERE_LATITUDES as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for longitude in 0..=SPHERE_LONGITUDES {
            let phi = longitude as f32 * 2.0 * PI / SPHERE_LONGITUDES as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.positions.push([
                normal[0] * radius,
                normal[1] * radius,
                normal[2] * radius,
            ]);
            data.normals.push(normal);
        }
    }
    let stride = SPHERE_LONGITUDES + 1;
    for latitude in 0..SPHERE_LATITUDES {
        for longitude in 0..SPHERE_LONGITUDES {
            let first = latitude * stride + longitude;
            let second = first + stride;
            data.indices
                .extend_from_slice(&[first, second, first + 1]);
            data.indices
                .extend_from_slice(&[second, second + 1, first + 1]);
        }
    }
    data
}

/// Flat quad in the xz plane facing up, `width` along x and `depth` along z.
fn ground(width: f32, depth: f32) -> MeshData {
    let half_width = width / 2.0;
    let half_depth = depth / 2.0;
    MeshData {
        positions: vec![
            [-half_width, 0.0, -half_depth],
            [-half_width, 0.0, half_depth],
            [half_width, 0.0, half_depth],
            [half_width, 0.0, -half_depth],
        ],
        normals: vec![[0.0, 1.0, 0.0]; 4],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Axis-aligned cube centred on the origin, four vertices per face so every
/// face keeps its own flat normal.
fn cube(size: f32) -> MeshData {
    let half = size / 2.0;
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]),
        ([0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ];
    let mut data = MeshData::default();
    for (normal, up, right) in faces {
        let base = data.positions.len() as u32;
        for (u, v) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)] {
            data.positions.push([
                half * (normal[0] + u * right[0] + v * up[0]),
                half * (normal[1] + u * right[1] + v * up[1]),
                half * (normal[2] + u * right[2] + v * up[2]),
            ]);
            data.normals.push(normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_has_expected_counts() {
        let data = tessellate(&Shape::Sphere { diameter: 2.0 });
        let expected_vertices = ((SPHERE_LATITUDES + 1) * (SPHERE_LONGITUDES + 1)) as usize;
        assert_eq!(data.positions.len(), expected_vertices);
        assert_eq!(data.normals.len(), expected_vertices);
        assert_eq!(
            data.indices.len(),
            (SPHERE_LATITUDES * SPHERE_LONGITUDES * 6) as usize
        );
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let data = tessellate(&Shape::Sphere { diameter: 1.0 });
        for position in &data.positions {
            let length =
                (position[0].powi(2) + position[1].powi(2) + position[2].powi(2)).sqrt();
            assert!((length - 0.5).abs() < 1e-4, "vertex off the sphere: {length}");
        }
    }

    #[test]
    fn sphere_indices_stay_in_bounds() {
        let data = tessellate(&Shape::Sphere { diameter: 1.0 });
        let max = *data.indices.iter().max().unwrap();
        assert!((max as usize) < data.positions.len());
    }

    #[test]
    fn cube_faces_stay_on_the_surface() {
        let data = tessellate(&Shape::Cube { size: 2.0 });
        assert_eq!(data.positions.len(), 24);
        assert_eq!(data.indices.len(), 36);
        for position in &data.positions {
            let max = position
                .iter()
                .map(|axis| axis.abs())
                .fold(0.0f32, f32::max);
            assert!((max - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn ground_is_a_flat_quad() {
        let data = tessellate(&Shape::Ground {
            width: 10.0,
            depth: 4.0,
        });
        assert_eq!(data.positions.len(), 4);
        assert_eq!(data.indices.len(), 6);
        for position in &data.positions {
            assert_eq!(position[1], 0.0);
            assert!(position[0].abs() <= 5.0);
            assert!(position[2].abs() <= 2.0);
        }
        for normal in &data.normals {
            assert_eq!(*normal, [0.0, 1.0, 0.0]);
        }
    }
}
