//! This module contains the math utils that mainly comes from `cgmath`, plus a few
//! glm-flavored helpers that post-multiply an existing transform.

pub use cgmath::*;

pub mod prelude {
    pub use cgmath::prelude::*;
    pub use cgmath::{Deg, Matrix4, Point3, Rad, Vector2, Vector3, Vector4};
}

/// Builds a rotation matrix from `angle` around `axis` and post-multiplies it onto `m`,
/// the same composition order as `glm::rotate`. The axis is normalized first.
pub fn rotate<A: Into<Rad<f32>>>(m: Matrix4<f32>, angle: A, axis: Vector3<f32>) -> Matrix4<f32> {
    m * Matrix4::from_axis_angle(axis.normalize(), angle)
}

/// Post-multiplies a non-uniform scale onto `m`.
pub fn scale(m: Matrix4<f32>, v: Vector3<f32>) -> Matrix4<f32> {
    m * Matrix4::from_nonuniform_scale(v.x, v.y, v.z)
}

/// Post-multiplies a translation onto `m`.
pub fn translate(m: Matrix4<f32>, v: Vector3<f32>) -> Matrix4<f32> {
    m * Matrix4::from_translation(v)
}
