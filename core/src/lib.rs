//! # Walkmesh Core
//!
//! Navigation on triangulated walkable surfaces: a character's position is a
//! [`WalkPoint`] (triangle plus barycentric weights) that is moved across a
//! [`WalkMesh`] one triangle at a time, crossing shared edges and sliding
//! along boundary edges.
//!
//! - [`walkmesh`] - Mesh, walk points and the per-triangle primitives
//! - [`walkmeshes`] - Named meshes loaded from a packed chunk file
//! - [`motion`] - The multi-triangle motion loop
//! - [`player`] - An oriented walker driven by 2D input
//! - [`generators`] - Procedural grids and heightfields

pub mod chunk;
pub mod error;
pub mod generators;
pub mod math;
pub mod motion;
pub mod player;
pub mod profiling;
pub mod walkmesh;
pub mod walkmeshes;

pub use error::{LoadError, WalkMeshError};
pub use walkmesh::{EdgeCrossing, TriangleStep, WalkMesh, WalkPoint};
pub use walkmeshes::WalkMeshes;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version. Call once after the logger is installed.
pub fn init() {
    log::info!("Walkmesh Core v{} initialized", VERSION);
}
