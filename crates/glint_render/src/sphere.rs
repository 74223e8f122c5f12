//! Analytic sphere primitive.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use glint_core::Material;
use glint_math::Ray;

/// A sphere with a single material.
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Geometric ray/sphere test.
    ///
    /// From outside, returns the near intersection; from inside, the far
    /// one (the ray always exits). Spheres entirely behind the ray miss.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let to_center = self.center - ray.origin();
        let distance_squared = to_center.dot(to_center);
        let outside = distance_squared >= self.radius * self.radius;

        let closest_approach = to_center.dot(ray.direction());
        if outside && closest_approach < 0.0 {
            return None;
        }

        let half_chord_squared =
            self.radius * self.radius - distance_squared + closest_approach * closest_approach;
        if outside && half_chord_squared < 0.0 {
            return None;
        }

        let t = if outside {
            closest_approach - half_chord_squared.sqrt()
        } else {
            closest_approach + half_chord_squared.sqrt()
        };
        Some(t)
    }

    /// Surface normal, spherical UV, and material at a hit point.
    pub fn surface_data(&self, point: Vec3) -> (Vec3, Vec2, Arc<Material>) {
        let normal = (point - self.center) / self.radius;
        let uv = Vec2::new(
            (1.0 + normal.z.atan2(normal.x) / std::f32::consts::PI) * 0.5,
            normal.y.clamp(-1.0, 1.0).acos() / std::f32::consts::PI,
        );
        (normal, uv, self.material.clone())
    }
}
