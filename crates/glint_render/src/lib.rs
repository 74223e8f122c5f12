//! glint render - Whitted-style CPU ray tracing for the glint workspace.
//!
//! The pipeline per pixel: the camera maps the pixel into world space, a
//! primary [`Ray`] is traced over every [`SceneObject`] for its nearest hit,
//! and [`shade`] evaluates the hit material, casting shadow rays per light
//! and recursing for reflection and refraction up to a fixed depth.
//!
//! Rendering is single-threaded and synchronous: every traversal step and
//! shading recursion finishes on the calling stack before the next pixel
//! starts. Scene data is read-only once assembled.

pub mod camera;
pub mod entity;
pub mod image;
pub mod light;
pub mod renderer;
pub mod scene;
pub mod sphere;

pub use camera::Camera;
pub use entity::{Entity, MeshHit};
pub use image::Framebuffer;
pub use light::{Light, LightSample};
pub use renderer::{fresnel, render, shade, trace, RenderConfig, MAX_DEPTH};
pub use scene::{ObjectHit, Scene, SceneObject};
pub use sphere::Sphere;

// The math crate's Ray is the one public type callers need constantly.
pub use glint_math::{Ray, RayKind};
