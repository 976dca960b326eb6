//! Position-on-mesh representation.

use crate::math::Vec3;

/// Tolerance below which a barycentric weight counts as zero.
///
/// Used both by the in-triangle walker when deciding which edge was hit and
/// by the edge-crossing resolver when checking that a point lies on an edge.
pub const EDGE_EPSILON: f32 = 1e-4;

/// A location on a walkmesh: a triangle plus barycentric weights.
///
/// `weights[k]` belongs to vertex `indices[k]`. A weight of zero at slot `k`
/// means the point lies on the edge opposite `indices[k]`. Points produced
/// by the walker on an edge are kept in canonical form: `weights[2] == 0`
/// and `indices[0] -> indices[1]` is the edge in the triangle's own winding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkPoint {
    /// Vertex indices of the triangle, in winding order.
    pub indices: [u32; 3],
    /// Barycentric weights matching `indices`.
    pub weights: Vec3,
}

impl WalkPoint {
    /// Create a walk point from triangle indices and weights.
    pub fn new(indices: [u32; 3], weights: Vec3) -> Self {
        Self { indices, weights }
    }

    /// Walk point sitting exactly on vertex `indices[0]`.
    pub fn at_first_vertex(indices: [u32; 3]) -> Self {
        Self::new(indices, Vec3::new(1.0, 0.0, 0.0))
    }

    /// Walk point at the centroid of the triangle.
    pub fn centroid(indices: [u32; 3]) -> Self {
        let third = 1.0 / 3.0;
        Self::new(indices, Vec3::new(third, third, third))
    }

    /// True when every weight is finite and inside `[0, 1]`.
    pub fn has_valid_weights(&self) -> bool {
        self.weights.iter().all(|w| w.is_finite() && (0.0..=1.0).contains(w))
    }

    /// True when the point is on the edge `indices[0] -> indices[1]`.
    pub fn is_on_edge(&self) -> bool {
        self.weights.z.abs() <= EDGE_EPSILON
    }

    /// The directed edge named by the first two slots.
    pub fn edge(&self) -> (u32, u32) {
        (self.indices[0], self.indices[1])
    }

    /// Cyclically rotate the triple so that slot `k` ends up in slot 2.
    ///
    /// The winding of the triangle is preserved.
    pub(crate) fn rotated_to_last(&self, k: usize) -> Self {
        let i = (k + 1) % 3;
        let j = (k + 2) % 3;
        Self::new(
            [self.indices[i], self.indices[j], self.indices[k]],
            Vec3::new(self.weights[i], self.weights[j], self.weights[k]),
        )
    }
}
