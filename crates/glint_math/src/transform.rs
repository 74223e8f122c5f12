// Transform utilities for Mat4
//
// Extends glam::Mat4 with the normal transform the renderer needs.
// Note: glam::Mat4 already provides transform_point3() and transform_vector3().

use glam::{Mat4, Vec3};

/// Extension trait for Mat4 surface-normal transforms.
pub trait Mat4Ext {
    /// Transform a surface normal by the inverse-transpose of this matrix
    /// and re-normalize, so non-uniform scale does not skew the normal.
    fn transform_normal(&self, normal: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.inverse()
            .transpose()
            .transform_vector3(normal)
            .normalize()
    }
}
