use super::{WalkMesh, WalkPoint};
use crate::error::WalkMeshError;
use crate::math::{UnitQuat, Vec3, normalize_or_zero, rotation_between_about};

/// Result of [`WalkMesh::cross_edge`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeCrossing {
    /// The edge is shared with another triangle and the point moved onto it.
    Crossed {
        /// The same world position, expressed in the neighbouring triangle.
        end: WalkPoint,
        /// Rotation taking the old face normal onto the new one.
        rotation: UnitQuat,
    },
    /// The edge is on the mesh boundary; the point stays where it was.
    Boundary,
}

impl EdgeCrossing {
    /// True when the point moved into a neighbouring triangle.
    pub fn crossed(&self) -> bool {
        matches!(self, Self::Crossed { .. })
    }

    /// Rotation to apply to surface-attached directions (identity on a
    /// boundary).
    pub fn rotation(&self) -> UnitQuat {
        match self {
            Self::Crossed { rotation, .. } => *rotation,
            Self::Boundary => UnitQuat::identity(),
        }
    }

    /// The point after the crossing, or `start` on a boundary.
    pub fn end_or(&self, start: WalkPoint) -> WalkPoint {
        match self {
            Self::Crossed { end, .. } => *end,
            Self::Boundary => start,
        }
    }
}

impl WalkMesh {
    /// Move a point sitting on edge `indices[0] -> indices[1]` into the
    /// triangle on the other side of that edge.
    ///
    /// `start.weights[2]` must be zero (within [`EDGE_EPSILON`](super::EDGE_EPSILON)), as produced
    /// by [`walk_in_triangle`](Self::walk_in_triangle) when it stops early.
    /// The returned point keeps the world position: its indices are
    /// `(indices[1], indices[0], far vertex)`.
    pub fn cross_edge(&self, start: &WalkPoint) -> Result<EdgeCrossing, WalkMeshError> {
        self.check_walk_point(start)?;
        if !start.is_on_edge() {
            return Err(WalkMeshError::NotOnEdge {
                weight: start.weights.z,
            });
        }

        let [ai, bi, _] = start.indices;
        let Some(di) = self.opposite_vertex(ai, bi) else {
            return Ok(EdgeCrossing::Boundary);
        };

        let (w0, w1) = (start.weights.x, start.weights.y);
        let sum = w0 + w1;
        let weights = if sum > 0.0 {
            Vec3::new(w1 / sum, w0 / sum, 0.0)
        } else {
            Vec3::new(0.5, 0.5, 0.0)
        };
        let end = WalkPoint::new([bi, ai, di], weights);

        let from = normalize_or_zero(&self.face_normal(&start.indices));
        let to = normalize_or_zero(&self.face_normal(&end.indices));
        let edge = self.vertices[bi as usize] - self.vertices[ai as usize];
        let rotation = rotation_between_about(&from, &to, &edge);

        log::trace!("crossed edge {ai} -> {bi} into triangle {:?}", end.indices);

        Ok(EdgeCrossing::Crossed { end, rotation })
    }
}
