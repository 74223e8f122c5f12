//! glint core - scene data for the glint ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: `Mesh`, `Face`, `Model`, and the triangle-indexed
//!   `Octree` that accelerates ray/mesh intersection
//! - **Materials**: the closed `Material` enum shared across faces
//! - **Resources**: OBJ model import and the texture cache, both of which
//!   degrade (warn + substitute) instead of failing the render

pub mod material;
pub mod mesh;
pub mod model;
pub mod obj;
pub mod octree;
pub mod texture;

// Re-export commonly used types
pub use material::{Albedo, Material};
pub use mesh::{Face, Mesh};
pub use model::Model;
pub use obj::{ModelError, ModelResult};
pub use octree::{NodeId, NodeKind, Octree};
pub use texture::{Texture, TextureCache, TextureError, TextureId};
