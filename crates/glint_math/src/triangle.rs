//! Ray/triangle intersection via the Möller-Trumbore algorithm.

use glam::Vec3;

use crate::{Ray, EPSILON};

/// Möller-Trumbore ray/triangle intersection.
///
/// Returns the ray parameter of the hit, or `None` when the ray is parallel
/// to the triangle plane, the barycentric coordinates fall outside the
/// triangle, or the triangle lies behind the ray origin.
pub fn intersect_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let p = ray.direction().cross(edge2);
    let determinant = edge1.dot(p);

    // A near-zero determinant means the ray is parallel to the triangle
    // plane; a zero-area triangle lands here too.
    if determinant.abs() < EPSILON {
        return None;
    }

    let inv_determinant = 1.0 / determinant;
    let s = ray.origin() - v0;

    let u = s.dot(p) * inv_determinant;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction().dot(q) * inv_determinant;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_determinant;
    if t < 0.0 {
        // The triangle is behind the ray origin.
        return None;
    }

    Some(t)
}
