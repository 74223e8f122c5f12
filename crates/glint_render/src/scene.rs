//! Scene objects and the scene container.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use glint_core::{Material, TextureCache};
use glint_math::Ray;

use crate::entity::{Entity, MeshHit};
use crate::light::Light;
use crate::sphere::Sphere;

/// Closed set of renderable shapes, dispatched by pattern matching.
pub enum SceneObject {
    Sphere(Sphere),
    Mesh(Entity),
}

/// A hit on a scene object: the parameter along the world ray plus, for
/// meshes, which mesh/face was struck. Never outlives one shading step.
#[derive(Debug, Clone, Copy)]
pub struct ObjectHit {
    pub t: f32,
    mesh: Option<MeshHit>,
}

impl SceneObject {
    pub fn intersect(&self, ray: &Ray) -> Option<ObjectHit> {
        match self {
            SceneObject::Sphere(sphere) => {
                sphere.intersect(ray).map(|t| ObjectHit { t, mesh: None })
            }
            SceneObject::Mesh(entity) => entity.intersect(ray).map(|(t, hit)| ObjectHit {
                t,
                mesh: Some(hit),
            }),
        }
    }

    /// Surface normal, UV, and material at a hit previously reported by
    /// [`SceneObject::intersect`] on this same object.
    pub fn surface_data(&self, point: Vec3, hit: &ObjectHit) -> (Vec3, Vec2, Arc<Material>) {
        match (self, &hit.mesh) {
            (SceneObject::Sphere(sphere), _) => sphere.surface_data(point),
            (SceneObject::Mesh(entity), Some(mesh_hit)) => entity.surface_data(point, mesh_hit),
            // A mesh hit always carries its payload; degrade quietly if not.
            (SceneObject::Mesh(_), None) => (Vec3::Y, Vec2::ZERO, Material::default_grey()),
        }
    }

    /// The material a shadow ray consults when deciding whether this object
    /// occludes: the sphere's own material, or the entity-wide override.
    pub fn shadow_material(&self) -> Option<&Arc<Material>> {
        match self {
            SceneObject::Sphere(sphere) => Some(&sphere.material),
            SceneObject::Mesh(entity) => entity.material_override(),
        }
    }
}

/// Everything a render call needs: objects, lights, and loaded textures.
/// Assembled programmatically by the caller; read-only while rendering.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
    pub textures: TextureCache,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            textures: TextureCache::new(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_object_round_trip() {
        let object = SceneObject::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Material::Reflect),
        ));
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let hit = object.intersect(&ray).expect("should hit");
        assert!((hit.t - 2.0).abs() < 1e-4);

        let (normal, _, material) = object.surface_data(ray.at(hit.t), &hit);
        assert!((normal - Vec3::Z).length() < 1e-4);
        assert!(matches!(*material, Material::Reflect));
    }

    #[test]
    fn test_shadow_material_sources() {
        let transmissive = Arc::new(Material::RefractAndReflect { ior: 1.5 });
        let sphere =
            SceneObject::Sphere(Sphere::new(Vec3::ZERO, 1.0, transmissive.clone()));
        assert!(sphere
            .shadow_material()
            .is_some_and(|m| m.is_transmissive()));

        let entity = SceneObject::Mesh(Entity::new(
            Vec3::ZERO,
            Vec3::ONE,
            Arc::new(glint_core::Model::empty()),
        ));
        assert!(entity.shadow_material().is_none());
    }
}
