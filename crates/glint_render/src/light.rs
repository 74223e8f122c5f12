//! Scene lights.

use glam::Vec3;
use glint_math::NO_HIT;

/// Everything the shader needs to know about one light at one surface point.
#[derive(Debug, Clone, Copy)]
pub struct LightSample {
    /// Unit direction light travels, from the light toward the surface.
    pub direction: Vec3,
    /// Attenuated radiance arriving at the surface.
    pub radiance: Vec3,
    /// Upper bound for the shadow ray: the distance back to the light for
    /// point lights, unbounded for directional ones.
    pub t_max: f32,
}

/// A light source.
#[derive(Debug, Clone)]
pub enum Light {
    /// Parallel rays from infinitely far away; no falloff.
    Directional {
        direction: Vec3,
        color: Vec3,
        intensity: f32,
    },
    /// Point source with inverse-square falloff.
    Point {
        position: Vec3,
        color: Vec3,
        intensity: f32,
    },
}

impl Light {
    /// Directional light; the direction is normalized.
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Light::Directional {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    pub fn point(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Light::Point {
            position,
            color,
            intensity,
        }
    }

    /// Direction, attenuated radiance, and shadow-ray bound at `point`.
    pub fn illumination(&self, point: Vec3) -> LightSample {
        match self {
            Light::Directional {
                direction,
                color,
                intensity,
            } => LightSample {
                direction: *direction,
                radiance: *color * *intensity,
                t_max: NO_HIT,
            },
            Light::Point {
                position,
                color,
                intensity,
            } => {
                let to_point = point - *position;
                let distance_squared = to_point.length_squared();
                let distance = distance_squared.sqrt();
                LightSample {
                    direction: to_point / distance,
                    radiance: *color * *intensity
                        / (4.0 * std::f32::consts::PI * distance_squared),
                    t_max: distance,
                }
            }
        }
    }
}
