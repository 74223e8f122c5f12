//! Demo renderer: assembles a scene programmatically, renders it, and
//! writes `out.ppm`. Pass an OBJ path as the first argument to drop a mesh
//! into the scene.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use glint_core::{Albedo, Material, Model};
use glint_math::Vec3;
use glint_render::{render, Camera, Entity, Light, RenderConfig, Scene, SceneObject, Sphere};

const WIDTH: u32 = 960;
const HEIGHT: u32 = 540;

fn main() -> Result<()> {
    env_logger::init();

    let mut scene = build_scene();

    // Optional mesh argument; a bad path degrades to an empty model and the
    // render simply goes on without it.
    if let Some(path) = std::env::args().nth(1) {
        let model = Arc::new(Model::load(&path));
        let mut entity = Entity::new(Vec3::new(0.0, -1.0, -2.0), Vec3::splat(1.0), model)
            .with_material(phong(Vec3::new(0.9, 0.7, 0.2), 0.8, 0.4, 32.0));
        entity.set_rotation(0.0, 30.0, 0.0);
        scene.add_object(SceneObject::Mesh(entity));
    }

    let camera = Camera::new(Vec3::new(0.0, 0.5, 6.0), 0.0, 0.0, 60.0);
    let config = RenderConfig {
        background: Vec3::new(0.05, 0.07, 0.12),
        max_depth: 4,
    };

    let started = Instant::now();
    let framebuffer = render(&camera, &scene, &config, WIDTH, HEIGHT);
    log::info!(
        "rendered {}x{} in {:.2?}",
        framebuffer.width(),
        framebuffer.height(),
        started.elapsed()
    );

    framebuffer.write_ppm("out.ppm")?;
    log::info!("wrote out.ppm");
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    // Ground: a huge matte sphere just below the action.
    scene.add_object(SceneObject::Sphere(Sphere::new(
        Vec3::new(0.0, -1001.0, 0.0),
        1000.0,
        phong(Vec3::new(0.55, 0.55, 0.5), 0.9, 0.05, 8.0),
    )));

    scene.add_object(SceneObject::Sphere(Sphere::new(
        Vec3::new(-2.5, 0.0, 0.0),
        1.0,
        phong(Vec3::new(0.8, 0.2, 0.2), 0.8, 0.5, 32.0),
    )));
    scene.add_object(SceneObject::Sphere(Sphere::new(
        Vec3::ZERO,
        1.0,
        Arc::new(Material::Reflect),
    )));
    scene.add_object(SceneObject::Sphere(Sphere::new(
        Vec3::new(2.5, 0.0, 0.0),
        1.0,
        Arc::new(Material::RefractAndReflect { ior: 1.5 }),
    )));

    scene.add_light(Light::directional(
        Vec3::new(-0.5, -1.0, -0.5),
        Vec3::ONE,
        1.2,
    ));
    scene.add_light(Light::point(
        Vec3::new(3.0, 4.0, 3.0),
        Vec3::new(1.0, 0.9, 0.8),
        400.0,
    ));

    scene
}

fn phong(color: Vec3, diffuse: f32, specular: f32, shininess: f32) -> Arc<Material> {
    Arc::new(Material::Phong {
        albedo: Albedo::Color(color),
        diffuse,
        specular,
        shininess,
        smooth: false,
    })
}
