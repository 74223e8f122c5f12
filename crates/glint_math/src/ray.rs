use glam::Vec3;

/// What a ray is being cast for.
///
/// Shadow rays are allowed to pass through transmissive surfaces, so the
/// scene-wide trace consults this tag when deciding which occluders count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayKind {
    Primary,
    Shadow,
}

/// A ray with an origin and a unit-length direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    kind: RayKind,
}

impl Ray {
    /// Create a primary ray. The direction is normalized.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_kind(origin, direction, RayKind::Primary)
    }

    /// Create a shadow ray. The direction is normalized.
    #[inline]
    pub fn shadow(origin: Vec3, direction: Vec3) -> Self {
        Self::with_kind(origin, direction, RayKind::Shadow)
    }

    /// Create a ray with an explicit kind. The direction is normalized.
    #[inline]
    pub fn with_kind(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            kind,
        }
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the ray's unit direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the ray's kind tag.
    #[inline]
    pub fn kind(&self) -> RayKind {
        self.kind
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}
