//! Triangle-indexed octree used to accelerate ray/mesh intersection.
//!
//! Nodes live in a flat arena and refer to each other by index, so the
//! arena's lifetime governs every node and no recursive teardown is needed.
//! Leaves hold indices into the owning mesh's face list, never geometry.

use std::collections::VecDeque;

use glam::Vec3;
use glint_math::{Aabb, Ray};

/// Triangles per leaf below which subdivision stops.
pub const DEFAULT_MIN_FACES_PER_LEAF: usize = 4;

/// Subdivision depth at which nodes become leaves regardless of count.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Index of a node in the octree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Payload of an octree node.
#[derive(Debug)]
pub enum NodeKind {
    /// Interior node. Absent slots are octants no triangle overlaps; they
    /// are never visited.
    Branch { children: [Option<NodeId>; 8] },
    /// Terminal node holding indices into the owning mesh's face list.
    Leaf { faces: Vec<u32> },
}

/// A single node. The box covers exactly this node's spatial region.
#[derive(Debug)]
pub struct Node {
    pub bounds: Aabb,
    /// Traversal bookkeeping only; the arena owns every node.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// Octree over a fixed triangle set, built once at mesh load and read-only
/// while rendering.
#[derive(Debug)]
pub struct Octree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    min_faces_per_leaf: usize,
    max_depth: u32,
}

impl Octree {
    /// Build with the default leaf size and depth limits.
    pub fn build(bounds: Aabb, triangles: &[[Vec3; 3]]) -> Self {
        Self::build_with(
            bounds,
            triangles,
            DEFAULT_MIN_FACES_PER_LEAF,
            DEFAULT_MAX_DEPTH,
        )
    }

    /// Build over `triangles` (indexed by position in the slice), recursively
    /// subdividing `bounds` until leaves are small enough or too deep.
    pub fn build_with(
        bounds: Aabb,
        triangles: &[[Vec3; 3]],
        min_faces_per_leaf: usize,
        max_depth: u32,
    ) -> Self {
        let mut octree = Self {
            nodes: Vec::new(),
            root: None,
            min_faces_per_leaf,
            max_depth,
        };

        if !triangles.is_empty() {
            let all_faces: Vec<u32> = (0..triangles.len() as u32).collect();
            let root = octree.subdivide(bounds, all_faces, 0, None, triangles);
            octree.root = Some(root);
        }

        let leaf_count = octree
            .nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf { .. }))
            .count();
        log::debug!(
            "octree: {} triangles -> {} nodes ({} leaves)",
            triangles.len(),
            octree.nodes.len(),
            leaf_count
        );

        octree
    }

    /// Root node, if any triangle was indexed.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node by id.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Total number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ordered expansion step for nearest-first traversal.
    ///
    /// Pops the queue front (a branch), ray-tests each present child, and
    /// splices the intersected children back onto the queue front ordered by
    /// ascending box-entry parameter, leaving the nearest candidate first.
    /// The queue discipline is what keeps nearest-hit search sublinear; no
    /// global sort of all leaves ever happens.
    pub fn expand_front(&self, ray: &Ray, queue: &mut VecDeque<NodeId>) {
        let Some(front) = queue.pop_front() else {
            return;
        };
        let NodeKind::Branch { children } = &self.nodes[front.index()].kind else {
            queue.push_front(front);
            return;
        };

        let mut entered: Vec<(f32, NodeId)> = children
            .iter()
            .flatten()
            .filter_map(|&child| {
                self.nodes[child.index()]
                    .bounds
                    .intersect(ray)
                    .map(|t| (t, child))
            })
            .collect();
        entered.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Pushing in reverse leaves the smallest entry parameter at front.
        for (_, child) in entered.into_iter().rev() {
            queue.push_front(child);
        }
    }

    fn subdivide(
        &mut self,
        bounds: Aabb,
        faces: Vec<u32>,
        depth: u32,
        parent: Option<NodeId>,
        triangles: &[[Vec3; 3]],
    ) -> NodeId {
        if faces.len() <= self.min_faces_per_leaf || depth == self.max_depth {
            return self.push(Node {
                bounds,
                parent,
                kind: NodeKind::Leaf { faces },
            });
        }

        let id = self.push(Node {
            bounds,
            parent,
            kind: NodeKind::Branch {
                children: [None; 8],
            },
        });

        for octant in 0..8usize {
            // Three sign bits pick the -/+ half along each axis.
            let signs = Vec3::new(
                if octant & 1 == 0 { -1.0 } else { 1.0 },
                if octant & 2 == 0 { -1.0 } else { 1.0 },
                if octant & 4 == 0 { -1.0 } else { 1.0 },
            );
            let child_bounds = Aabb::new(
                bounds.center + bounds.half_extents * signs * 0.5,
                bounds.half_extents * 0.5,
            );

            // Triangles straddling an octant boundary land in every octant
            // they overlap.
            let child_faces: Vec<u32> = faces
                .iter()
                .copied()
                .filter(|&face| {
                    let [v0, v1, v2] = triangles[face as usize];
                    child_bounds.triangle_overlaps(v0, v1, v2)
                })
                .collect();

            if child_faces.is_empty() {
                continue;
            }

            let child = self.subdivide(child_bounds, child_faces, depth + 1, Some(id), triangles);
            if let NodeKind::Branch { children } = &mut self.nodes[id.index()].kind {
                children[octant] = Some(child);
            }
        }

        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}
