//! Recursive shading pipeline.
//!
//! `render` maps pixels to primary rays, `trace` resolves the nearest hit
//! across all scene objects, and `shade` evaluates the material response,
//! recursing for reflection and refraction up to a fixed depth. Everything
//! runs synchronously on the calling stack; the scene is read-only here.

use glam::Vec3;
use glint_core::{Albedo, Material};
use glint_math::{Ray, RayKind, EPSILON, NO_HIT};

use crate::camera::Camera;
use crate::image::Framebuffer;
use crate::scene::{ObjectHit, Scene, SceneObject};

/// Default bounce depth for reflection/refraction recursion.
pub const MAX_DEPTH: u32 = 4;

/// Scale applied to the color coming back from a mirror bounce.
const REFLECTION_ATTENUATION: f32 = 0.8;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Color returned when a ray escapes the scene.
    pub background: Vec3,
    /// Maximum reflection/refraction recursion depth.
    pub max_depth: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Vec3::ZERO,
            max_depth: MAX_DEPTH,
        }
    }
}

/// Render the scene into a framebuffer of the given size.
///
/// Pixels map to camera space with `tan(fov/2)` scaling and the image
/// aspect ratio; the camera-to-world matrix then places the point the
/// primary ray passes through.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    width: u32,
    height: u32,
) -> Framebuffer {
    let scale = (camera.fov().to_radians() * 0.5).tan();
    let aspect = width as f32 / height as f32;

    log::debug!(
        "render {}x{}: {} objects, {} lights, depth {}",
        width,
        height,
        scene.objects.len(),
        scene.lights.len(),
        config.max_depth
    );

    let mut framebuffer = Framebuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let px = (1.0 - 2.0 * (x as f32 + 0.5) / width as f32) * scale * aspect;
            let py = (1.0 - 2.0 * (y as f32 + 0.5) / height as f32) * scale;
            let through = camera.to_world(Vec3::new(px, py, 1.0));

            let ray = Ray::new(camera.origin(), through - camera.origin());
            framebuffer.set(x, y, shade(&ray, scene, config, 0));
        }
    }
    framebuffer
}

/// Nearest hit along the ray across every scene object.
///
/// Accepts a candidate only when its parameter clears the self-intersection
/// epsilon, beats the best so far, and stays under `upper_bound` (the light
/// distance for bounded shadow rays). Shadow rays skip transmissive
/// occluders: transparent objects cast no shadow.
pub fn trace<'a>(
    ray: &Ray,
    objects: &'a [SceneObject],
    upper_bound: f32,
) -> Option<(&'a SceneObject, ObjectHit)> {
    let mut nearest_t = NO_HIT;
    let mut nearest = None;

    for object in objects {
        if ray.kind() == RayKind::Shadow
            && object
                .shadow_material()
                .is_some_and(|material| material.is_transmissive())
        {
            continue;
        }

        if let Some(hit) = object.intersect(ray) {
            if hit.t > EPSILON && hit.t < nearest_t && hit.t < upper_bound {
                nearest_t = hit.t;
                nearest = Some((object, hit));
            }
        }
    }

    nearest
}

/// Color seen along a ray.
pub fn shade(ray: &Ray, scene: &Scene, config: &RenderConfig, depth: u32) -> Vec3 {
    if depth > config.max_depth {
        return config.background;
    }

    let Some((object, hit)) = trace(ray, &scene.objects, NO_HIT) else {
        return config.background;
    };

    let point = ray.at(hit.t);
    let (normal, uv, material) = object.surface_data(point, &hit);

    match &*material {
        Material::Phong {
            albedo,
            diffuse,
            specular,
            shininess,
            ..
        } => {
            let albedo = match albedo {
                Albedo::Color(color) => *color,
                Albedo::Texture(id) => scene.textures.sample(*id, uv.x, uv.y),
            };

            let mut color = Vec3::ZERO;
            for light in &scene.lights {
                let sample = light.illumination(point);

                let shadow_ray = Ray::shadow(point, -sample.direction);
                if trace(&shadow_ray, &scene.objects, sample.t_max).is_some() {
                    continue;
                }

                let lambert = normal.dot(-sample.direction).max(0.0);
                color += *diffuse * albedo * sample.radiance * lambert;

                let bounced = reflect(sample.direction, normal);
                color += *specular
                    * sample.radiance
                    * bounced.dot(-ray.direction()).max(0.0).powf(*shininess);
            }
            color
        }

        Material::Reflect => {
            let mirrored = Ray::new(point, reflect(ray.direction(), normal));
            shade(&mirrored, scene, config, depth + 1) * REFLECTION_ATTENUATION
        }

        Material::RefractAndReflect { ior } => {
            let cos_incident = ray.direction().dot(normal);
            let reflectance = fresnel(cos_incident, *ior);

            let reflected = Ray::new(point, reflect(ray.direction(), normal));
            let reflect_color = shade(&reflected, scene, config, depth + 1);

            // Below total internal reflection there is a transmitted ray.
            let refract_color = if reflectance < 1.0 {
                let refracted = Ray::new(point, refract(ray.direction(), normal, *ior));
                shade(&refracted, scene, config, depth + 1)
            } else {
                Vec3::ZERO
            };

            reflect_color * reflectance + refract_color * (1.0 - reflectance)
        }
    }
}

/// Fresnel reflectance for an interface between air and a medium of the
/// given index of refraction.
///
/// `cos_incident` is the raw dot of the ray direction with the surface
/// normal; its sign tells inside from outside. Returns 1.0 exactly at and
/// beyond total internal reflection.
pub fn fresnel(cos_incident: f32, ior: f32) -> f32 {
    let cos_i = cos_incident.clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (1.0, ior);
    if cos_i > 0.0 {
        // Leaving the medium rather than entering it.
        std::mem::swap(&mut eta_i, &mut eta_t);
    }

    // Snell's law for the transmitted sine.
    let sin_t = eta_i / eta_t * (1.0 - cos_i * cos_i).max(0.0).sqrt();
    if sin_t >= 1.0 {
        return 1.0;
    }

    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
    let cos_i = cos_i.abs();
    let parallel = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let perpendicular = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    (parallel * parallel + perpendicular * perpendicular) / 2.0
}

/// Mirror a direction about a normal.
#[inline]
fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Bend a direction through a surface by Snell's law, swapping media and
/// flipping the normal when the ray starts inside. Callers check for total
/// internal reflection first (via [`fresnel`]).
fn refract(incident: Vec3, normal: Vec3, ior: f32) -> Vec3 {
    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (1.0, ior);
    let mut n = normal;
    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        std::mem::swap(&mut eta_i, &mut eta_t);
        n = -normal;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return Vec3::ZERO;
    }
    eta * incident + (eta * cos_i - k.sqrt()) * n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::Light;
    use crate::sphere::Sphere;
    use std::sync::Arc;

    fn white_phong() -> Arc<Material> {
        Arc::new(Material::Phong {
            albedo: Albedo::Color(Vec3::ONE),
            diffuse: 1.0,
            specular: 0.0,
            shininess: 1.0,
            smooth: false,
        })
    }

    #[test]
    fn test_fresnel_normal_incidence() {
        // ((n2 - n1) / (n2 + n1))^2 = 0.04 for glass against air, from
        // either side.
        assert!((fresnel(-1.0, 1.5) - 0.04).abs() < 1e-5);
        assert!((fresnel(1.0, 1.5) - 0.04).abs() < 1e-5);
    }

    #[test]
    fn test_fresnel_total_internal_reflection() {
        // Exiting glass at 45 degrees is past the ~41.8 degree critical
        // angle: everything reflects.
        let cos_45 = std::f32::consts::FRAC_1_SQRT_2;
        assert_eq!(fresnel(cos_45, 1.5), 1.0);
    }

    #[test]
    fn test_fresnel_grazing_approaches_one() {
        assert!(fresnel(-0.01, 1.5) > 0.9);
    }

    #[test]
    fn test_reflect_head_on() {
        let normal = Vec3::Y;
        let incident = -normal;
        assert!((reflect(incident, normal) - normal).length() < 1e-6);
    }

    #[test]
    fn test_reflect_forty_five_degrees() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let reflected = reflect(incident, Vec3::Y);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((reflected - expected).length() < 1e-5);
    }

    #[test]
    fn test_refract_straight_through_at_matched_index() {
        let direction = Vec3::new(0.0, -1.0, 0.0);
        let refracted = refract(direction, Vec3::Y, 1.0);
        assert!((refracted - direction).length() < 1e-5);
    }

    #[test]
    fn test_refract_bends_toward_normal_entering_glass() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let refracted = refract(incident, Vec3::Y, 1.5).normalize();

        // sin(theta_t) = sin(45 deg) / 1.5
        let expected_sin = (0.5f32).sqrt() / 1.5;
        assert!((refracted.x - expected_sin).abs() < 1e-4);
        assert!(refracted.y < 0.0);
    }

    #[test]
    fn test_lit_sphere_brightness_follows_cosine() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::Sphere(Sphere::new(
            Vec3::ZERO,
            1.0,
            white_phong(),
        )));
        // Light traveling +z illuminates the -z hemisphere.
        scene.add_light(Light::directional(Vec3::Z, Vec3::ONE, 1.0));
        let config = RenderConfig::default();

        // Head-on point: full brightness.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let color = shade(&ray, &scene, &config, 0);
        assert!((color.x - 1.0).abs() < 1e-3, "head-on should be ~1, got {color}");

        // Off-center: brightness equals the cosine of the normal/light angle.
        let x = 0.6f32;
        let ray = Ray::new(Vec3::new(x, 0.0, -5.0), Vec3::Z);
        let color = shade(&ray, &scene, &config, 0);
        let expected = (1.0 - x * x).sqrt();
        assert!(
            (color.x - expected).abs() < 2e-2,
            "expected ~{expected}, got {}",
            color.x
        );

        // The far side faces away from the light entirely.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let color = shade(&ray, &scene, &config, 0);
        assert_eq!(color, Vec3::ZERO);
    }

    #[test]
    fn test_occluder_casts_shadow() {
        let target = SceneObject::Sphere(Sphere::new(Vec3::ZERO, 1.0, white_phong()));
        let blocker = SceneObject::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            white_phong(),
        ));

        // Aim at the light-facing point of the target from off axis so the
        // blocker only sits on the shadow path, not the primary ray.
        let origin = Vec3::new(-10.0, 0.0, -10.0);
        let ray = Ray::new(origin, Vec3::new(0.0, 0.0, -1.0) - origin);
        let light = Light::point(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE, 500.0);
        let config = RenderConfig::default();

        let mut lit_scene = Scene::new();
        lit_scene.add_object(SceneObject::Sphere(Sphere::new(
            Vec3::ZERO,
            1.0,
            white_phong(),
        )));
        lit_scene.add_light(light.clone());
        let lit = shade(&ray, &lit_scene, &config, 0);
        assert!(lit.length() > 0.0, "without the blocker the point is lit");

        let mut shadowed_scene = Scene::new();
        shadowed_scene.add_object(target);
        shadowed_scene.add_object(blocker);
        shadowed_scene.add_light(light);
        let shadowed = shade(&ray, &shadowed_scene, &config, 0);
        assert_eq!(
            shadowed, config.background,
            "occluded point only shows the background terms"
        );
    }

    #[test]
    fn test_transmissive_occluder_casts_no_shadow() {
        let glass = Arc::new(Material::RefractAndReflect { ior: 1.5 });

        let mut scene = Scene::new();
        scene.add_object(SceneObject::Sphere(Sphere::new(
            Vec3::ZERO,
            1.0,
            white_phong(),
        )));
        scene.add_object(SceneObject::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            glass,
        )));
        scene.add_light(Light::point(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE, 500.0));
        let config = RenderConfig::default();

        let origin = Vec3::new(-10.0, 0.0, -10.0);
        let ray = Ray::new(origin, Vec3::new(0.0, 0.0, -1.0) - origin);
        let color = shade(&ray, &scene, &config, 0);
        assert!(
            color.length() > 0.0,
            "a transparent blocker must not shadow the target"
        );
    }

    #[test]
    fn test_nested_transmissive_sphere_terminates() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::Sphere(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::RefractAndReflect { ior: 1.5 }),
        )));
        let config = RenderConfig {
            background: Vec3::new(0.2, 0.4, 0.6),
            max_depth: 4,
        };

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let color = shade(&ray, &scene, &config, 0);
        assert!(color.is_finite(), "recursion must terminate finitely");
    }

    #[test]
    fn test_facing_mirrors_terminate_at_depth_cap() {
        let mirror = Arc::new(Material::Reflect);
        let mut scene = Scene::new();
        scene.add_object(SceneObject::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, 5.0),
            1.0,
            mirror.clone(),
        )));
        scene.add_object(SceneObject::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            mirror,
        )));
        let config = RenderConfig {
            background: Vec3::ONE,
            max_depth: 4,
        };

        let ray = Ray::new(Vec3::new(0.0, 0.0, -8.0), Vec3::Z);
        let color = shade(&ray, &scene, &config, 0);
        assert!(color.is_finite());
        // Each bounce attenuates, so the cap leaves strictly less than the
        // background energy.
        assert!(color.x < 1.0);
    }

    #[test]
    fn test_depth_cap_returns_background() {
        let scene = Scene::new();
        let config = RenderConfig {
            background: Vec3::new(0.1, 0.2, 0.3),
            max_depth: 2,
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(shade(&ray, &scene, &config, 3), config.background);
    }

    #[test]
    fn test_trace_bounded_by_upper_bound() {
        let objects = vec![SceneObject::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, 5.0),
            1.0,
            white_phong(),
        ))];
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert!(trace(&ray, &objects, NO_HIT).is_some());
        // The sphere starts 4 units out; a tighter bound excludes it.
        assert!(trace(&ray, &objects, 3.0).is_none());
    }

    #[test]
    fn test_render_small_image() {
        let mut scene = Scene::new();
        // The default camera looks along world -z.
        scene.add_object(SceneObject::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            white_phong(),
        )));
        scene.add_light(Light::directional(-Vec3::Z, Vec3::ONE, 1.0));

        let camera = Camera::default_view();
        let config = RenderConfig {
            background: Vec3::new(0.0, 0.0, 0.5),
            max_depth: 4,
        };
        let framebuffer = render(&camera, &scene, &config, 9, 9);

        // Center pixel hits the lit sphere; the corner sees background.
        let center = framebuffer.get(4, 4);
        let corner = framebuffer.get(0, 0);
        assert!(center.x > 0.5, "center should be lit, got {center}");
        assert_eq!(corner, config.background);
    }
}
