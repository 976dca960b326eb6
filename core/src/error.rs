//! Error types for walkmesh construction, queries and loading.

use crate::chunk::ChunkError;

/// Errors raised while building a [`WalkMesh`](crate::walkmesh::WalkMesh) or
/// when a caller breaks the contract of a walkmesh query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WalkMeshError {
    /// Vertex positions and vertex normals have different lengths.
    #[error("mesh has {vertices} vertices but {normals} normals")]
    NormalCountMismatch {
        /// Number of vertex positions.
        vertices: usize,
        /// Number of vertex normals.
        normals: usize,
    },
    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index} (mesh has {vertex_count} vertices)")]
    VertexOutOfRange {
        /// Triangle index.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// The same oriented edge is used by two triangles.
    #[error("directed edge {a} -> {b} appears in more than one triangle")]
    DuplicateDirectedEdge {
        /// Edge start vertex.
        a: u32,
        /// Edge end vertex.
        b: u32,
    },
    /// A vertex normal disagrees with (or the triangle has no) geometric normal.
    #[error("vertex {vertex} normal disagrees with the face normal of triangle {triangle}")]
    InconsistentNormal {
        /// Triangle index.
        triangle: usize,
        /// Vertex index whose normal failed the check.
        vertex: u32,
    },
    /// A nearest-point query was made on a mesh without triangles.
    #[error("cannot place a walk point on an empty walkmesh")]
    EmptyMesh,
    /// A walk point references vertices outside the mesh.
    #[error("walk point references vertex {index} (mesh has {vertex_count} vertices)")]
    WalkPointOutOfRange {
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// A walk point has NaN, infinite or out-of-range weights.
    #[error("walk point weights {weights:?} are not valid barycentric weights")]
    InvalidWeights {
        /// The rejected weights.
        weights: [f32; 3],
    },
    /// A query position has NaN or infinite components.
    #[error("query point {point:?} is not finite")]
    NonFinitePoint {
        /// The rejected position.
        point: [f32; 3],
    },
    /// A step vector has NaN or infinite components.
    #[error("step {step:?} is not finite")]
    NonFiniteStep {
        /// The rejected step.
        step: [f32; 3],
    },
    /// Edge crossing was requested for a point that is not on an edge.
    #[error("walk point is not on an edge (third weight is {weight})")]
    NotOnEdge {
        /// The third weight, which must be zero.
        weight: f32,
    },
}

/// Errors raised while loading a packed walkmesh file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read walkmesh file: {0}")]
    Io(#[from] std::io::Error),
    /// The chunk stream is malformed.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    /// Position and normal chunks have different lengths.
    #[error("mis-matched position ({positions}) and normal ({normals}) counts")]
    PositionNormalMismatch {
        /// Number of positions.
        positions: usize,
        /// Number of normals.
        normals: usize,
    },
    /// An index record has a reversed or out-of-bounds range.
    #[error("invalid {range} range {begin}..{end} in index record {record} (limit {limit})")]
    InvalidRange {
        /// Index record number.
        record: usize,
        /// Which range was invalid: "name", "vertex" or "triangle".
        range: &'static str,
        /// Range start.
        begin: u32,
        /// Range end.
        end: u32,
        /// Length of the array the range indexes.
        limit: usize,
    },
    /// A triangle uses a vertex outside its record's vertex range.
    #[error("triangle {triangle} of record {record} uses vertices outside the record")]
    TriangleOutsideRecord {
        /// Index record number.
        record: usize,
        /// Global triangle index.
        triangle: usize,
    },
    /// A mesh name is not valid UTF-8.
    #[error("mesh name in index record {record} is not valid UTF-8")]
    InvalidName {
        /// Index record number.
        record: usize,
    },
    /// Two records share a name.
    #[error("walkmesh with duplicated name '{0}'")]
    DuplicateName(String),
    /// A record's data does not form a valid walkmesh.
    #[error("walkmesh '{name}' is invalid: {source}")]
    InvalidMesh {
        /// Mesh name.
        name: String,
        /// Underlying construction error.
        #[source]
        source: WalkMeshError,
    },
    /// Lookup by name failed.
    #[error("walkmesh with name '{0}' not found")]
    MeshNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WalkMeshError::EmptyMesh;
        assert_eq!(err.to_string(), "cannot place a walk point on an empty walkmesh");

        let err = LoadError::MeshNotFound("Floor".to_string());
        assert_eq!(err.to_string(), "walkmesh with name 'Floor' not found");

        let err = LoadError::DuplicateName("WalkMesh".to_string());
        assert_eq!(err.to_string(), "walkmesh with duplicated name 'WalkMesh'");
    }

    #[test]
    fn test_invalid_mesh_source() {
        use std::error::Error;

        let err = LoadError::InvalidMesh {
            name: "Ring".to_string(),
            source: WalkMeshError::DuplicateDirectedEdge { a: 1, b: 2 },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("Ring"));
    }
}
