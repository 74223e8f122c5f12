//! Triangle mesh geometry and its nearest-hit intersector.
//!
//! A mesh owns vertex data, faces, and exactly one octree built over its own
//! faces at construction time. Everything is read-only once built.

use std::collections::VecDeque;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use glint_math::{intersect_triangle, nearly_equal, Aabb, Ray, NO_HIT};

use crate::material::Material;
use crate::octree::{NodeKind, Octree};

/// A triangular face: three vertex indices plus an optional material.
#[derive(Debug, Clone)]
pub struct Face {
    pub indices: [u32; 3],
    pub material: Option<Arc<Material>>,
}

impl Face {
    pub fn new(indices: [u32; 3]) -> Self {
        Self {
            indices,
            material: None,
        }
    }

    pub fn with_material(indices: [u32; 3], material: Arc<Material>) -> Self {
        Self {
            indices,
            material: Some(material),
        }
    }
}

/// A mesh: vertex positions, optional per-vertex normals and UVs, faces, and
/// the octree indexing those faces.
#[derive(Debug)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub uvs: Option<Vec<Vec2>>,
    pub faces: Vec<Face>,
    pub bounds: Aabb,
    octree: Octree,
}

impl Mesh {
    /// Build a mesh and its octree. Faces with out-of-range indices are
    /// dropped with a warning rather than poisoning intersection.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
        faces: Vec<Face>,
    ) -> Self {
        let vertex_count = positions.len() as u32;
        let faces: Vec<Face> = faces
            .into_iter()
            .filter(|face| {
                let valid = face.indices.iter().all(|&i| i < vertex_count);
                if !valid {
                    log::warn!(
                        "dropping face with invalid indices {:?} (vertex count {})",
                        face.indices,
                        vertex_count
                    );
                }
                valid
            })
            .collect();

        let bounds = Aabb::from_points(&positions);
        let triangles: Vec<[Vec3; 3]> = faces
            .iter()
            .map(|face| {
                [
                    positions[face.indices[0] as usize],
                    positions[face.indices[1] as usize],
                    positions[face.indices[2] as usize],
                ]
            })
            .collect();
        let octree = Octree::build(bounds, &triangles);

        Self {
            positions,
            normals,
            uvs,
            faces,
            bounds,
            octree,
        }
    }

    /// The three corner positions of a face.
    #[inline]
    pub fn face_vertices(&self, face_index: u32) -> [Vec3; 3] {
        let face = &self.faces[face_index as usize];
        [
            self.positions[face.indices[0] as usize],
            self.positions[face.indices[1] as usize],
            self.positions[face.indices[2] as usize],
        ]
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Nearest ray/triangle hit via nearest-first octree traversal.
    ///
    /// Returns the ray parameter and the struck face index. Candidate boxes
    /// are visited in ascending box-entry order; the first leaf producing any
    /// accepted triangle hit wins immediately. Leaf boxes can overlap in
    /// extent, so this early return is a heuristic rather than a proven
    /// nearest-hit guarantee; it is the intended behavior.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, u32)> {
        let root = self.octree.root()?;

        let mut queue = VecDeque::new();
        if self.octree.node(root).bounds.intersect(ray).is_some() {
            queue.push_back(root);
        }

        let mut nearest = NO_HIT;
        let mut nearest_face = 0u32;

        loop {
            let &front = queue.front()?;
            match &self.octree.node(front).kind {
                NodeKind::Leaf { faces } => {
                    queue.pop_front();
                    for &face_index in faces {
                        let [v0, v1, v2] = self.face_vertices(face_index);
                        if let Some(t) = intersect_triangle(ray, v0, v1, v2) {
                            // A parameter at zero is the ray's own face.
                            if !nearly_equal(t, 0.0) && t < nearest {
                                nearest = t;
                                nearest_face = face_index;
                            }
                        }
                    }
                    if nearest != NO_HIT {
                        return Some((nearest, nearest_face));
                    }
                }
                NodeKind::Branch { .. } => self.octree.expand_front(ray, &mut queue),
            }
        }
    }
}
