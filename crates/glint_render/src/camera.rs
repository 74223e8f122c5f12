//! Camera for primary ray generation.

use glam::{Mat4, Vec3};

/// A pinhole camera positioned by origin, yaw, and pitch.
///
/// The camera-to-world matrix is the inverse of the look-at view matrix and
/// is computed once at construction, ahead of the per-pixel loop.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    // Degrees.
    yaw: f32,
    pitch: f32,
    fov: f32,
    camera_to_world: Mat4,
}

impl Camera {
    /// Create a camera. Yaw, pitch, and vertical field of view in degrees.
    pub fn new(origin: Vec3, yaw: f32, pitch: f32, fov: f32) -> Self {
        let mut camera = Self {
            origin,
            yaw,
            pitch,
            fov,
            camera_to_world: Mat4::IDENTITY,
        };
        camera.update_matrix();
        camera
    }

    /// Default camera: origin, axis-aligned, 90 degree field of view.
    pub fn default_view() -> Self {
        Self::new(Vec3::ZERO, 0.0, 0.0, 90.0)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Front-facing vector from yaw and pitch.
    pub fn front(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            yaw.cos() * pitch.cos(),
        )
        .normalize()
    }

    /// Map a camera-space point into world space.
    pub fn to_world(&self, point: Vec3) -> Vec3 {
        self.camera_to_world.transform_point3(point)
    }

    fn update_matrix(&mut self) {
        let view = Mat4::look_at_rh(self.origin, self.origin + self.front(), Vec3::Y);
        self.camera_to_world = view.inverse();
    }
}
