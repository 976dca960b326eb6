//! Named collection of walkmeshes loaded from a packed file.
//!
//! # File layout
//!
//! A packed file is a sequence of five chunks (see [`chunk`](crate::chunk)):
//!
//! | Tag    | Element         | Contents                                  |
//! |--------|-----------------|-------------------------------------------|
//! | `p...` | `[f32; 3]`      | vertex positions of every mesh            |
//! | `n...` | `[f32; 3]`      | vertex normals, parallel to `p...`        |
//! | `tri0` | `[u32; 3]`      | triangles, indexing the global vertex list|
//! | `str0` | `u8`            | concatenated mesh names                   |
//! | `idxA` | [`IndexRecord`] | one record per mesh                       |
//!
//! Each record selects a name, a vertex range and a triangle range. Triangles
//! must only use vertices from their own record's range; they are remapped to
//! mesh-local indices on load.

use std::collections::HashMap;
use std::path::Path;

use bytemuck::{Pod, Zeroable};

use crate::chunk::{ChunkReader, ChunkWriter};
use crate::error::LoadError;
use crate::math::Vec3;
use crate::walkmesh::WalkMesh;

const POSITIONS_TAG: &[u8; 4] = b"p...";
const NORMALS_TAG: &[u8; 4] = b"n...";
const TRIANGLES_TAG: &[u8; 4] = b"tri0";
const NAMES_TAG: &[u8; 4] = b"str0";
const INDEX_TAG: &[u8; 4] = b"idxA";

/// One mesh entry of the `idxA` chunk. All ranges are half-open.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct IndexRecord {
    /// First byte of the name in `str0`.
    pub name_begin: u32,
    /// One past the last byte of the name.
    pub name_end: u32,
    /// First vertex of the mesh in `p...` and `n...`.
    pub vertex_begin: u32,
    /// One past the last vertex.
    pub vertex_end: u32,
    /// First triangle of the mesh in `tri0`.
    pub triangle_begin: u32,
    /// One past the last triangle.
    pub triangle_end: u32,
}

impl IndexRecord {
    fn check_range(
        record: usize,
        range: &'static str,
        begin: u32,
        end: u32,
        limit: usize,
    ) -> Result<std::ops::Range<usize>, LoadError> {
        if begin <= end && end as usize <= limit {
            Ok(begin as usize..end as usize)
        } else {
            Err(LoadError::InvalidRange {
                record,
                range,
                begin,
                end,
                limit,
            })
        }
    }
}

/// Global arrays of a packed file, before they are split into meshes.
struct PackedArrays {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    triangles: Vec<[u32; 3]>,
    names: Vec<u8>,
    index: Vec<IndexRecord>,
}

impl PackedArrays {
    fn read(data: &[u8]) -> Result<Self, LoadError> {
        let mut reader = ChunkReader::new(data);
        let arrays = Self {
            positions: reader.read(POSITIONS_TAG)?,
            normals: reader.read(NORMALS_TAG)?,
            triangles: reader.read(TRIANGLES_TAG)?,
            names: reader.read(NAMES_TAG)?,
            index: reader.read(INDEX_TAG)?,
        };
        if reader.remaining() > 0 {
            log::warn!(
                "Ignoring {} bytes of trailing data in walkmesh file",
                reader.remaining()
            );
        }
        Ok(arrays)
    }

    fn extract(&self, record: usize, entry: &IndexRecord) -> Result<(String, WalkMesh), LoadError> {
        let names = IndexRecord::check_range(
            record,
            "name",
            entry.name_begin,
            entry.name_end,
            self.names.len(),
        )?;
        let vertices = IndexRecord::check_range(
            record,
            "vertex",
            entry.vertex_begin,
            entry.vertex_end,
            self.positions.len(),
        )?;
        let triangles = IndexRecord::check_range(
            record,
            "triangle",
            entry.triangle_begin,
            entry.triangle_end,
            self.triangles.len(),
        )?;

        let name = std::str::from_utf8(&self.names[names])
            .map_err(|_| LoadError::InvalidName { record })?
            .to_owned();

        let local = entry.vertex_begin..entry.vertex_end;
        let mut mesh_triangles = Vec::with_capacity(triangles.len());
        for ti in triangles {
            let tri = self.triangles[ti];
            if !tri.iter().all(|i| local.contains(i)) {
                return Err(LoadError::TriangleOutsideRecord {
                    record,
                    triangle: ti,
                });
            }
            mesh_triangles.push(tri.map(|i| i - entry.vertex_begin));
        }

        let mesh = WalkMesh::new(
            self.positions[vertices.clone()].iter().copied().map(Vec3::from).collect(),
            self.normals[vertices].iter().copied().map(Vec3::from).collect(),
            mesh_triangles,
        )
        .map_err(|source| LoadError::InvalidMesh {
            name: name.clone(),
            source,
        })?;

        Ok((name, mesh))
    }
}

/// Walkmeshes by name.
#[derive(Debug, Clone, Default)]
pub struct WalkMeshes {
    meshes: HashMap<String, WalkMesh>,
}

impl WalkMeshes {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a packed walkmesh file held in memory.
    ///
    /// Every record is validated; any error discards the whole file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        crate::profile_function!();

        let arrays = PackedArrays::read(data)?;
        if arrays.positions.len() != arrays.normals.len() {
            return Err(LoadError::PositionNormalMismatch {
                positions: arrays.positions.len(),
                normals: arrays.normals.len(),
            });
        }

        let mut meshes = HashMap::with_capacity(arrays.index.len());
        for (record, entry) in arrays.index.iter().enumerate() {
            let (name, mesh) = arrays.extract(record, entry)?;
            if meshes.contains_key(&name) {
                return Err(LoadError::DuplicateName(name));
            }
            meshes.insert(name, mesh);
        }

        log::info!(
            "Loaded {} walkmeshes ({} vertices, {} triangles)",
            meshes.len(),
            arrays.positions.len(),
            arrays.triangles.len()
        );

        Ok(Self { meshes })
    }

    /// Read and decode a packed walkmesh file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        log::debug!("Loading walkmeshes from {}", path.display());
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Find a mesh by exact name.
    pub fn lookup(&self, name: &str) -> Result<&WalkMesh, LoadError> {
        self.meshes
            .get(name)
            .ok_or_else(|| LoadError::MeshNotFound(name.to_owned()))
    }

    /// Add or replace a mesh, returning the previous one with that name.
    pub fn insert(&mut self, name: impl Into<String>, mesh: WalkMesh) -> Option<WalkMesh> {
        self.meshes.insert(name.into(), mesh)
    }

    /// Mesh names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.meshes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over `(name, mesh)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WalkMesh)> {
        self.meshes.iter().map(|(name, mesh)| (name.as_str(), mesh))
    }

    /// Number of meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True when the collection holds no meshes.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Encode every mesh into the packed format, sorted by name.
    pub fn to_bytes(&self) -> Vec<u8> {
        let entries: Vec<(&str, &WalkMesh)> = self
            .names()
            .into_iter()
            .filter_map(|name| self.meshes.get(name).map(|mesh| (name, mesh)))
            .collect();
        pack_walkmeshes(&entries)
    }
}

/// Encode named meshes into a packed walkmesh file, in the given order.
///
/// # Panics
///
/// Panics if the combined vertex, triangle or name data exceeds `u32`
/// indexing.
pub fn pack_walkmeshes(meshes: &[(&str, &WalkMesh)]) -> Vec<u8> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut triangles: Vec<[u32; 3]> = Vec::new();
    let mut names: Vec<u8> = Vec::new();
    let mut index = Vec::with_capacity(meshes.len());

    let offset = |len: usize| u32::try_from(len).expect("packed walkmesh data exceeds u32 indexing");

    for (name, mesh) in meshes {
        let name_begin = offset(names.len());
        names.extend_from_slice(name.as_bytes());
        let vertex_begin = offset(positions.len());
        positions.extend(mesh.vertices().iter().map(|v| [v.x, v.y, v.z]));
        normals.extend(mesh.normals().iter().map(|n| [n.x, n.y, n.z]));
        let triangle_begin = offset(triangles.len());
        triangles.extend(mesh.triangles().iter().map(|t| t.map(|i| i + vertex_begin)));

        index.push(IndexRecord {
            name_begin,
            name_end: offset(names.len()),
            vertex_begin,
            vertex_end: offset(positions.len()),
            triangle_begin,
            triangle_end: offset(triangles.len()),
        });
    }

    let mut writer = ChunkWriter::new();
    writer
        .write(POSITIONS_TAG, &positions)
        .write(NORMALS_TAG, &normals)
        .write(TRIANGLES_TAG, &triangles)
        .write(NAMES_TAG, &names)
        .write(INDEX_TAG, &index);
    writer.finish()
}
