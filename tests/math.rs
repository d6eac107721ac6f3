extern crate shaderlab;
#[macro_use]
extern crate approx;

use shaderlab::math;
use shaderlab::prelude::*;

#[test]
fn rotate() {
    let m = math::rotate(Matrix4::identity(), Deg(90.0), Vector3::unit_z());
    let p = m * Vector4::new(1.0, 0.0, 0.0, 1.0);
    assert!(ulps_eq!(p, Vector4::new(0.0, 1.0, 0.0, 1.0)));

    // The axis does not need to be normalized.
    let n = math::rotate(Matrix4::identity(), Deg(90.0), Vector3::new(0.0, 0.0, 5.0));
    assert!(ulps_eq!(m, n));
}

#[test]
fn initial_transform() {
    let m = math::rotate(Matrix4::identity(), Deg(90.0), Vector3::unit_z());
    let m = math::scale(m, Vector3::new(0.5, 0.5, 0.5));

    let p = m * Vector4::new(0.5, 0.5, 0.0, 1.0);
    assert!(relative_eq!(p, Vector4::new(-0.25, 0.25, 0.0, 1.0), epsilon = 1e-6));
}

#[test]
fn translate() {
    let m = math::translate(Matrix4::identity(), Vector3::new(1.0, 1.0, 0.0));
    let p = m * Vector4::new(1.0, 0.0, 0.0, 1.0);
    assert_eq!(p, Vector4::new(2.0, 1.0, 0.0, 1.0));

    // Directions are not affected.
    let d = m * Vector4::new(1.0, 0.0, 0.0, 0.0);
    assert_eq!(d, Vector4::new(1.0, 0.0, 0.0, 0.0));
}

#[test]
fn accumulated_rotation() {
    let axis = Vector3::new(0.3, 0.7, 1.0);
    let mut m = Matrix4::identity();
    for _ in 0..360 {
        m = math::rotate(m, Deg(1.0), axis);
    }

    assert!(relative_eq!(m, Matrix4::identity(), epsilon = 1e-4));
}

#[test]
fn column_major() {
    let m = math::translate(Matrix4::identity(), Vector3::new(1.0, 2.0, 3.0));
    let columns: [[f32; 4]; 4] = m.into();
    assert_eq!(columns[3], [1.0, 2.0, 3.0, 1.0]);

    match UniformVariable::from(m) {
        UniformVariable::Matrix4f(v) => assert_eq!(v, columns),
        other => panic!("unexpected {:?}", other),
    }
}
