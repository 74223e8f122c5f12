use glam::Vec3;

use crate::Ray;

/// Axis-aligned bounding box stored as a center point plus half-extents.
///
/// Half-extents are non-negative on every axis. Boxes are built once (at mesh
/// load) and treated as read-only while rendering.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    /// Create a new AABB from a center and half-extents.
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Create an AABB from two opposite corners.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Bounding box of a list of points.
    ///
    /// An empty list yields a degenerate box at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Vec3::ZERO, Vec3::ZERO);
        };

        let mut min = *first;
        let mut max = *first;
        for point in &points[1..] {
            min = min.min(*point);
            max = max.max(*point);
        }

        Self::from_min_max(min, max)
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Slab-method ray/box test.
    ///
    /// Returns the entry parameter, or the exit parameter when the ray starts
    /// inside the box. `None` when the slabs are disjoint on some axis or the
    /// box lies entirely behind the ray.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let min = self.min();
        let max = self.max();

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            // Raw IEEE division: a zero direction component gives infinite
            // slab bounds rather than a fault.
            let mut t0 = (min[axis] - ray.origin()[axis]) / ray.direction()[axis];
            let mut t1 = (max[axis] - ray.origin()[axis]) / ray.direction()[axis];
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        let t = if t_near > 0.0 { t_near } else { t_far };
        if t < 0.0 {
            // The whole box is behind the ray.
            return None;
        }
        Some(t)
    }

    /// Separating Axis Theorem triangle/box overlap test.
    ///
    /// Checks the triangle plane, the three cardinal axes, and all nine
    /// edge-cross-cardinal axes; only if no axis separates do the two overlap.
    pub fn triangle_overlaps(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
        // Work in box-local space with the box centered at the origin.
        let v0 = v0 - self.center;
        let v1 = v1 - self.center;
        let v2 = v2 - self.center;
        let h = self.half_extents;

        let edges = [v1 - v0, v2 - v1, v0 - v2];

        // Triangle plane against the box: project the half-extents onto the
        // plane normal and compare with the plane's distance from the center.
        let normal = edges[0].cross(edges[1]);
        let distance = normal.dot(v0);
        let extent = h.dot(normal.abs());
        if distance > extent || distance < -extent {
            return false;
        }

        // The box's cardinal axes against the triangle's own bounds.
        for axis in 0..3 {
            let min = v0[axis].min(v1[axis]).min(v2[axis]);
            let max = v0[axis].max(v1[axis]).max(v2[axis]);
            if min > h[axis] || max < -h[axis] {
                return false;
            }
        }

        // Nine cross-product axes: each triangle edge against each cardinal.
        const CARDINALS: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];
        for edge in edges {
            for cardinal in CARDINALS {
                let axis = cardinal.cross(edge);
                let p0 = axis.dot(v0);
                let p1 = axis.dot(v1);
                let p2 = axis.dot(v2);
                let min = p0.min(p1).min(p2);
                let max = p0.max(p1).max(p2);
                let radius = h.dot(axis.abs());
                if min > radius || max < -radius {
                    return false;
                }
            }
        }

        true
    }
}
