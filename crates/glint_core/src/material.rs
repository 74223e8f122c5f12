//! Surface material definitions.
//!
//! Materials form a closed set dispatched by pattern matching. They are
//! shared by `Arc` across faces and entities and are never copied into hit
//! payloads.

use std::sync::{Arc, OnceLock};

use glam::Vec3;

use crate::texture::TextureId;

/// Where a Phong surface gets its base color from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Albedo {
    /// Constant color in linear RGB.
    Color(Vec3),
    /// Sample a loaded texture at the hit UV.
    Texture(TextureId),
}

/// How a surface responds to light.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Phong-shaded surface: diffuse and specular terms per light.
    Phong {
        albedo: Albedo,
        diffuse: f32,
        specular: f32,
        shininess: f32,
        /// Interpolate vertex normals instead of flat-averaging them.
        smooth: bool,
    },
    /// Perfect mirror.
    Reflect,
    /// Transmissive surface that both reflects and refracts, mixed by the
    /// Fresnel equations.
    RefractAndReflect { ior: f32 },
}

impl Material {
    /// A grey Phong material used when neither the entity nor the face
    /// specifies one.
    pub fn default_grey() -> Arc<Material> {
        static GREY: OnceLock<Arc<Material>> = OnceLock::new();
        GREY.get_or_init(|| {
            Arc::new(Material::Phong {
                albedo: Albedo::Color(Vec3::splat(0.5)),
                diffuse: 1.0,
                specular: 0.0,
                shininess: 1.0,
                smooth: false,
            })
        })
        .clone()
    }

    /// True for surfaces shadow rays should pass through.
    pub fn is_transmissive(&self) -> bool {
        matches!(self, Material::RefractAndReflect { .. })
    }

    /// True when the material asks for barycentric normal interpolation.
    pub fn smooth_shading(&self) -> bool {
        matches!(self, Material::Phong { smooth: true, .. })
    }
}
