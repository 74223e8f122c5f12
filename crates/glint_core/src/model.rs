//! A model is the unit of geometry an entity instances: a list of meshes
//! plus a cached bounding box over all of them.

use std::path::Path;

use glint_math::Aabb;

use crate::mesh::Mesh;
use crate::obj;

/// One or more meshes loaded as a unit.
#[derive(Debug)]
pub struct Model {
    meshes: Vec<Mesh>,
    bounds: Option<Aabb>,
}

impl Model {
    /// Build a model from meshes, caching the union of their bounds.
    pub fn new(meshes: Vec<Mesh>) -> Self {
        let bounds = meshes
            .iter()
            .map(|mesh| mesh.bounds)
            .reduce(|a, b| a.union(&b));
        Self { meshes, bounds }
    }

    /// A model with no geometry; intersect never matches.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load a Wavefront OBJ file.
    ///
    /// Failure is not fatal: a warning is logged and the model comes back
    /// empty, so the owning entity simply never matches a ray.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match obj::load(path) {
            Ok(meshes) => {
                log::info!(
                    "loaded model {}: {} meshes, {} triangles",
                    path.display(),
                    meshes.len(),
                    meshes.iter().map(|m| m.triangle_count()).sum::<usize>()
                );
                Self::new(meshes)
            }
            Err(err) => {
                log::warn!("could not load model {}: {err}", path.display());
                Self::empty()
            }
        }
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Bounding box over all meshes; `None` for an empty model.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
