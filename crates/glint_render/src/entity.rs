//! A transformable instance of a model in the scene.
//!
//! Entities carry a position/rotation/scale transform, convert world rays
//! into model-local space, delegate intersection to each mesh's octree, and
//! convert results back out. They also resolve per-hit surface data
//! (normal, UV, material).

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use glint_core::{Material, Model};
use glint_math::{Mat4Ext, Ray, NO_HIT};

/// Which mesh and face a ray struck.
///
/// Opaque payload handed back into [`Entity::surface_data`]; it lives only
/// for the one shading evaluation that follows the hit.
#[derive(Debug, Clone, Copy)]
pub struct MeshHit {
    pub mesh_index: usize,
    pub face_index: u32,
}

/// A model placed in the world with a local transform and an optional
/// material override.
pub struct Entity {
    position: Vec3,
    scale: Vec3,
    // Rotation in degrees.
    pitch: f32,
    yaw: f32,
    roll: f32,
    model: Arc<Model>,
    material_override: Option<Arc<Material>>,
    local_to_world: Mat4,
    world_to_local: Mat4,
}

impl Entity {
    pub fn new(position: Vec3, scale: Vec3, model: Arc<Model>) -> Self {
        let mut entity = Self {
            position,
            scale,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            model,
            material_override: None,
            local_to_world: Mat4::IDENTITY,
            world_to_local: Mat4::IDENTITY,
        };
        entity.update_transforms();
        entity
    }

    /// Override every face material with one entity-wide material.
    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material_override = Some(material);
        self
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_transforms();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.update_transforms();
    }

    /// Set pitch/yaw/roll in degrees.
    pub fn set_rotation(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
        self.roll = roll;
        self.update_transforms();
    }

    pub fn material_override(&self) -> Option<&Arc<Material>> {
        self.material_override.as_ref()
    }

    fn update_transforms(&mut self) {
        self.local_to_world = Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.pitch.to_radians())
            * Mat4::from_rotation_y(self.yaw.to_radians())
            * Mat4::from_rotation_z(self.roll.to_radians())
            * Mat4::from_scale(self.scale);
        self.world_to_local = self.local_to_world.inverse();
    }

    /// Nearest intersection of a world-space ray with this entity's model.
    ///
    /// Returns the parameter along the *world* ray plus the mesh/face hit.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, MeshHit)> {
        let local_ray = Ray::with_kind(
            self.world_to_local.transform_point3(ray.origin()),
            self.world_to_local.transform_vector3(ray.direction()),
            ray.kind(),
        );

        // Cheap rejection against the whole model's box before per-mesh
        // octree traversal. An empty model has no box and never matches.
        let bounds = self.model.bounds()?;
        bounds.intersect(&local_ray)?;

        let mut nearest = NO_HIT;
        let mut nearest_hit = None;
        for (mesh_index, mesh) in self.model.meshes().iter().enumerate() {
            if let Some((t, face_index)) = mesh.intersect(&local_ray) {
                if t < nearest {
                    nearest = t;
                    nearest_hit = Some(MeshHit {
                        mesh_index,
                        face_index,
                    });
                }
            }
        }
        let hit = nearest_hit?;

        // Map the local hit point back to world space and re-derive the
        // parameter along the original world ray. Scale and rotation change
        // the parameter-to-distance mapping, so the local parameter cannot
        // simply be reused or scaled.
        let world_point = self.local_to_world.transform_point3(local_ray.at(nearest));
        let world_t = (world_point - ray.origin()).dot(ray.direction());
        Some((world_t, hit))
    }

    /// Resolve the surface normal, UV, and material at a world-space hit
    /// point previously reported by [`Entity::intersect`].
    pub fn surface_data(&self, point: Vec3, hit: &MeshHit) -> (Vec3, Vec2, Arc<Material>) {
        let mesh = &self.model.meshes()[hit.mesh_index];
        let face = &mesh.faces[hit.face_index as usize];
        let local_point = self.world_to_local.transform_point3(point);

        // Entity-level override wins over the face's own material.
        let material = self
            .material_override
            .clone()
            .or_else(|| face.material.clone())
            .unwrap_or_else(Material::default_grey);

        let [v0, v1, v2] = mesh.face_vertices(hit.face_index);

        let local_normal = match &mesh.normals {
            Some(normals) => {
                let n0 = normals[face.indices[0] as usize];
                let n1 = normals[face.indices[1] as usize];
                let n2 = normals[face.indices[2] as usize];
                if material.smooth_shading() {
                    let weights = barycentric(local_point, v0, v1, v2);
                    n0 * weights.x + n1 * weights.y + n2 * weights.z
                } else {
                    (n0 + n1 + n2) / 3.0
                }
            }
            None => (v1 - v0).cross(v2 - v0),
        };
        let normal = self.local_to_world.transform_normal(local_normal);

        let uv = match &mesh.uvs {
            Some(uvs) => {
                let weights = barycentric(local_point, v0, v1, v2);
                uvs[face.indices[0] as usize] * weights.x
                    + uvs[face.indices[1] as usize] * weights.y
                    + uvs[face.indices[2] as usize] * weights.z
            }
            None => Vec2::ZERO,
        };

        (normal, uv, material)
    }
}

/// Barycentric weights of a point in a triangle via sub-triangle area
/// ratios (cross-product magnitudes).
fn barycentric(point: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    let to_v0 = v0 - point;
    let to_v1 = v1 - point;
    let to_v2 = v2 - point;

    let area = (v0 - v1).cross(v0 - v2).length();
    Vec3::new(
        to_v1.cross(to_v2).length() / area,
        to_v2.cross(to_v0).length() / area,
        to_v0.cross(to_v1).length() / area,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Albedo, Face, Mesh};

    /// Single triangle in the local z=1 plane.
    fn triangle_model() -> Arc<Model> {
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
            ],
            None,
            None,
            vec![Face::new([0, 1, 2])],
        );
        Arc::new(Model::new(vec![mesh]))
    }

    #[test]
    fn test_identity_transform_hits_in_place() {
        let entity = Entity::new(Vec3::ZERO, Vec3::ONE, triangle_model());
        let ray = Ray::new(Vec3::new(0.0, 0.0, -4.0), Vec3::Z);

        let (t, _) = entity.intersect(&ray).expect("should hit");
        assert!((t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_world_parameter_under_scale() {
        // Scaling the model by 2 moves the local z=1 plane to world z=2.
        // Reusing the local parameter would report 3.5; the correct world
        // parameter is 7.
        let mut entity = Entity::new(Vec3::ZERO, Vec3::ONE, triangle_model());
        entity.set_scale(Vec3::splat(2.0));

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let (t, _) = entity.intersect(&ray).expect("should hit");
        assert!((t - 7.0).abs() < 1e-4, "got {t}");
    }

    #[test]
    fn test_world_parameter_under_rotation() {
        // Yaw the triangle 90 degrees: the local z=1 plane faces world +x.
        let mut entity = Entity::new(Vec3::ZERO, Vec3::ONE, triangle_model());
        entity.set_rotation(0.0, 90.0, 0.0);

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::X);
        let (t, _) = entity.intersect(&ray).expect("should hit");
        assert!((t - 4.0).abs() < 1e-3, "got {t}");
    }

    #[test]
    fn test_translation_offsets_hit() {
        let mut entity = Entity::new(Vec3::ZERO, Vec3::ONE, triangle_model());
        entity.set_position(Vec3::new(0.0, 0.0, 10.0));

        let ray = Ray::new(Vec3::new(0.0, 0.0, -4.0), Vec3::Z);
        let (t, _) = entity.intersect(&ray).expect("should hit");
        assert!((t - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_model_never_matches() {
        let entity = Entity::new(Vec3::ZERO, Vec3::ONE, Arc::new(Model::empty()));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -4.0), Vec3::Z);
        assert!(entity.intersect(&ray).is_none());
    }

    #[test]
    fn test_flat_geometric_normal() {
        let entity = Entity::new(Vec3::ZERO, Vec3::ONE, triangle_model());
        let ray = Ray::new(Vec3::new(0.0, 0.0, -4.0), Vec3::Z);
        let (t, hit) = entity.intersect(&ray).expect("should hit");

        let (normal, uv, _) = entity.surface_data(ray.at(t), &hit);
        // Edge cross product for this winding points along +z.
        assert!((normal - Vec3::Z).length() < 1e-4);
        assert_eq!(uv, Vec2::ZERO);
    }

    #[test]
    fn test_normal_under_non_uniform_scale() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 0.5),
            ],
            None,
            None,
            vec![Face::new([0, 1, 2])],
        );
        let mut entity = Entity::new(Vec3::ZERO, Vec3::ONE, Arc::new(Model::new(vec![mesh])));
        entity.set_scale(Vec3::new(3.0, 1.0, 1.0));

        let hit = MeshHit {
            mesh_index: 0,
            face_index: 0,
        };
        let (normal, _, _) = entity.surface_data(Vec3::ZERO, &hit);

        // The transformed normal must be perpendicular to the transformed
        // triangle edges, which plain vector transformation would not give.
        let world_edge1 = Vec3::new(3.0, 0.0, 1.0);
        let world_edge2 = Vec3::new(0.0, 1.0, 0.5);
        assert!(normal.dot(world_edge1).abs() < 1e-4);
        assert!(normal.dot(world_edge2).abs() < 1e-4);
        assert!((normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_smooth_normals_interpolate() {
        let smooth_material = Arc::new(Material::Phong {
            albedo: Albedo::Color(Vec3::ONE),
            diffuse: 1.0,
            specular: 0.0,
            shininess: 1.0,
            smooth: true,
        });
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            Some(vec![
                Vec3::new(-1.0, 0.0, -1.0).normalize(),
                Vec3::new(1.0, 0.0, -1.0).normalize(),
                Vec3::new(0.0, 1.0, -1.0).normalize(),
            ]),
            None,
            vec![Face::new([0, 1, 2])],
        );
        let entity = Entity::new(Vec3::ZERO, Vec3::ONE, Arc::new(Model::new(vec![mesh])))
            .with_material(smooth_material);

        let hit = MeshHit {
            mesh_index: 0,
            face_index: 0,
        };

        // At a corner the interpolated normal matches that vertex normal.
        let (normal, _, _) = entity.surface_data(Vec3::new(-1.0, -1.0, 0.0), &hit);
        let expected = Vec3::new(-1.0, 0.0, -1.0).normalize();
        assert!((normal - expected).length() < 1e-3);
    }

    #[test]
    fn test_material_override_precedence() {
        let face_material = Arc::new(Material::Reflect);
        let override_material = Arc::new(Material::RefractAndReflect { ior: 1.5 });

        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            None,
            None,
            vec![Face::with_material([0, 1, 2], face_material.clone())],
        );
        let model = Arc::new(Model::new(vec![mesh]));
        let hit = MeshHit {
            mesh_index: 0,
            face_index: 0,
        };

        // Without an override the face material applies.
        let plain = Entity::new(Vec3::ZERO, Vec3::ONE, model.clone());
        let (_, _, material) = plain.surface_data(Vec3::ZERO, &hit);
        assert_eq!(*material, *face_material);

        // With one, the entity material wins.
        let overridden =
            Entity::new(Vec3::ZERO, Vec3::ONE, model).with_material(override_material.clone());
        let (_, _, material) = overridden.surface_data(Vec3::ZERO, &hit);
        assert_eq!(*material, *override_material);
    }

    #[test]
    fn test_uv_interpolation() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
            ],
            None,
            Some(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
            ]),
            vec![Face::new([0, 1, 2])],
        );
        let entity = Entity::new(Vec3::ZERO, Vec3::ONE, Arc::new(Model::new(vec![mesh])));
        let hit = MeshHit {
            mesh_index: 0,
            face_index: 0,
        };

        // Vertex 1 maps exactly to its UV.
        let (_, uv, _) = entity.surface_data(Vec3::new(2.0, 0.0, 0.0), &hit);
        assert!((uv - Vec2::new(1.0, 0.0)).length() < 1e-4);

        // The edge midpoint between vertices 1 and 2 averages their UVs.
        let (_, uv, _) = entity.surface_data(Vec3::new(1.0, 1.0, 0.0), &hit);
        assert!((uv - Vec2::new(0.5, 0.5)).length() < 1e-4);
    }
}
