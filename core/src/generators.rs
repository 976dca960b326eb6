//! Walkmesh generators for test scenes and benchmarks.
//!
//! Generated meshes lie over the XY plane, centered on the origin, with +z
//! up. Vertex normals are the area-weighted average of the adjacent face
//! normals.

use crate::error::WalkMeshError;
use crate::math::{Vec3, normalize_or_zero};
use crate::walkmesh::WalkMesh;

/// Generate a flat rectangular grid.
///
/// # Arguments
///
/// * `size_x` - Extent along x
/// * `size_y` - Extent along y
/// * `segments_x` - Number of cells along x
/// * `segments_y` - Number of cells along y
pub fn generate_grid(
    size_x: f32,
    size_y: f32,
    segments_x: u32,
    segments_y: u32,
) -> Result<WalkMesh, WalkMeshError> {
    generate_heightfield(size_x, size_y, segments_x, segments_y, |_, _| 0.0)
}

/// Generate a grid whose vertex heights are given by `height(x, y)`.
///
/// Each cell is split into two triangles along its (+x, +y) diagonal. Fails
/// if the surface is so steep that a vertex normal disagrees with one of its
/// faces.
pub fn generate_heightfield(
    size_x: f32,
    size_y: f32,
    segments_x: u32,
    segments_y: u32,
    height: impl Fn(f32, f32) -> f32,
) -> Result<WalkMesh, WalkMeshError> {
    let columns = segments_x + 1;
    let mut vertices = Vec::with_capacity((columns * (segments_y + 1)) as usize);

    for row in 0..=segments_y {
        let y = (row as f32 / segments_y.max(1) as f32 - 0.5) * size_y;
        for column in 0..=segments_x {
            let x = (column as f32 / segments_x.max(1) as f32 - 0.5) * size_x;
            vertices.push(Vec3::new(x, y, height(x, y)));
        }
    }

    let mut triangles = Vec::with_capacity((segments_x * segments_y * 2) as usize);
    for row in 0..segments_y {
        for column in 0..segments_x {
            let current = row * columns + column;
            let above = current + columns;

            triangles.push([current, current + 1, above]);
            triangles.push([above + 1, above, current + 1]);
        }
    }

    let normals = smooth_normals(&vertices, &triangles);
    WalkMesh::new(vertices, normals, triangles)
}

/// Area-weighted vertex normals.
fn smooth_normals(vertices: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::zeros(); vertices.len()];
    for tri in triangles {
        let [a, b, c] = tri.map(|i| vertices[i as usize]);
        // Cross product length is twice the area.
        let face = (b - a).cross(&(c - a));
        for &i in tri {
            normals[i as usize] += face;
        }
    }
    normals.iter().map(normalize_or_zero).collect()
}
