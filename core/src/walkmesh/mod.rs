//! Triangulated surface that a character walks on.
//!
//! This module provides:
//! - [`WalkMesh`] - Immutable vertices, normals, triangles and the directed
//!   edge adjacency index
//! - [`WalkPoint`] - A position on the mesh as (triangle, barycentric weights)
//! - [`TriangleStep`] - Result of advancing a walk point inside one triangle
//! - [`EdgeCrossing`] - Result of stepping over the edge a walk point sits on
//!
//! A mesh is validated once at construction and never changes afterwards, so
//! it can be shared between any number of walkers without locking.

mod cross;
mod nearest;
mod point;
mod walk;

pub use cross::EdgeCrossing;
pub use point::{EDGE_EPSILON, WalkPoint};
pub use walk::TriangleStep;

use std::collections::HashMap;

use crate::error::WalkMeshError;
use crate::math::Vec3;

/// Minimum dot product between a face normal and each of its vertex normals.
pub const NORMAL_AGREEMENT: f32 = 0.1;

/// An immutable walkable triangle mesh.
///
/// Triangles are wound so that `cross(b - a, c - a)` points along the
/// surface's up direction. Every oriented edge belongs to exactly one
/// triangle; an edge is interior when its reverse belongs to another one.
#[derive(Clone)]
pub struct WalkMesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    /// Directed edge `(a, b)` of some triangle -> that triangle's third vertex.
    next_vertex: HashMap<(u32, u32), u32>,
}

impl WalkMesh {
    /// Build a walkmesh, validating its structure.
    ///
    /// Fails if positions and normals differ in length, a triangle indexes a
    /// missing vertex, an oriented edge is used twice (non-manifold or
    /// inconsistently wound input), or a vertex normal disagrees with its
    /// triangle's face normal. Degenerate triangles fail the normal check.
    pub fn new(
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    ) -> Result<Self, WalkMeshError> {
        if vertices.len() != normals.len() {
            return Err(WalkMeshError::NormalCountMismatch {
                vertices: vertices.len(),
                normals: normals.len(),
            });
        }

        for (ti, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(WalkMeshError::VertexOutOfRange {
                    triangle: ti,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let mut next_vertex = HashMap::with_capacity(triangles.len() * 3);
        for &[x, y, z] in &triangles {
            for (a, b, c) in [(x, y, z), (y, z, x), (z, x, y)] {
                if next_vertex.insert((a, b), c).is_some() {
                    return Err(WalkMeshError::DuplicateDirectedEdge { a, b });
                }
            }
        }

        for (ti, tri) in triangles.iter().enumerate() {
            let [a, b, c] = tri.map(|i| vertices[i as usize]);
            let out = (b - a).cross(&(c - a)).normalize();
            for &vi in tri {
                // NaN from a degenerate face also fails here.
                if !(out.dot(&normals[vi as usize]) > NORMAL_AGREEMENT) {
                    return Err(WalkMeshError::InconsistentNormal {
                        triangle: ti,
                        vertex: vi,
                    });
                }
            }
        }

        log::debug!(
            "Built walkmesh: {} vertices, {} triangles",
            vertices.len(),
            triangles.len()
        );

        Ok(Self {
            vertices,
            normals,
            triangles,
            next_vertex,
        })
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Per-vertex normals, parallel to [`vertices`](Self::vertices).
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangle vertex indices.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Third vertex of the triangle that contains the directed edge `a -> b`.
    pub fn next_vertex(&self, a: u32, b: u32) -> Option<u32> {
        self.next_vertex.get(&(a, b)).copied()
    }

    /// Far vertex of the triangle on the other side of edge `a -> b`, or
    /// `None` if `a -> b` is a boundary edge.
    pub fn opposite_vertex(&self, a: u32, b: u32) -> Option<u32> {
        self.next_vertex(b, a)
    }

    /// True when edge `a -> b` of some triangle has no neighbour.
    pub fn is_boundary_edge(&self, a: u32, b: u32) -> bool {
        self.next_vertex.contains_key(&(a, b)) && !self.next_vertex.contains_key(&(b, a))
    }

    /// Number of directed edges with no neighbouring triangle.
    pub fn boundary_edge_count(&self) -> usize {
        self.next_vertex
            .keys()
            .filter(|&&(a, b)| self.is_boundary_edge(a, b))
            .count()
    }

    /// Unnormalized face normal `cross(b - a, c - a)` of a triangle.
    pub fn face_normal(&self, indices: &[u32; 3]) -> Vec3 {
        let (a, b, c) = self.corners(indices);
        (b - a).cross(&(c - a))
    }

    /// World-space position of a walk point.
    ///
    /// # Panics
    ///
    /// Panics if the walk point references vertices outside this mesh.
    pub fn to_world_point(&self, wp: &WalkPoint) -> Vec3 {
        let (a, b, c) = self.corners(&wp.indices);
        wp.weights.x * a + wp.weights.y * b + wp.weights.z * c
    }

    /// Smoothed up-vector at a walk point: the normalized blend of the
    /// triangle's vertex normals.
    ///
    /// # Panics
    ///
    /// Panics if the walk point references vertices outside this mesh.
    pub fn to_world_smooth_normal(&self, wp: &WalkPoint) -> Vec3 {
        let [x, y, z] = wp.indices.map(|i| self.normals[i as usize]);
        crate::math::normalize_or_zero(&(wp.weights.x * x + wp.weights.y * y + wp.weights.z * z))
    }

    pub(crate) fn corners(&self, indices: &[u32; 3]) -> (&Vec3, &Vec3, &Vec3) {
        (
            &self.vertices[indices[0] as usize],
            &self.vertices[indices[1] as usize],
            &self.vertices[indices[2] as usize],
        )
    }

    /// Reject walk points that reference missing vertices or carry invalid
    /// weights.
    pub(crate) fn check_walk_point(&self, wp: &WalkPoint) -> Result<(), WalkMeshError> {
        if let Some(&index) = wp.indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            return Err(WalkMeshError::WalkPointOutOfRange {
                index,
                vertex_count: self.vertices.len(),
            });
        }
        if !wp.has_valid_weights() {
            return Err(WalkMeshError::InvalidWeights {
                weights: wp.weights.into(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for WalkMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkMesh")
            .field("vertex_count", &self.vertices.len())
            .field("triangle_count", &self.triangles.len())
            .field("edge_count", &self.next_vertex.len())
            .finish()
    }
}
