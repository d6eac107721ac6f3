//! Matrix-math smoke checks, printed to stdout. No window involved.

use shaderlab::math;
use shaderlab::prelude::*;

fn print(label: &str, v: Vector4<f32>) {
    println!("{:<28} ({:.3}, {:.3}, {:.3}, {:.3})", label, v.x, v.y, v.z, v.w);
}

fn main() {
    let point = Vector4::new(1.0, 0.0, 0.0, 1.0);

    let m = math::translate(Matrix4::identity(), Vector3::new(1.0, 1.0, 0.0));
    print("translate (1, 1, 0)", m * point);

    let m = math::rotate(Matrix4::identity(), Deg(90.0), Vector3::unit_z());
    print("rotate 90 about z", m * point);

    let m = math::scale(Matrix4::identity(), Vector3::new(0.5, 0.5, 0.5));
    print("scale 0.5", m * point);

    let m = math::rotate(Matrix4::identity(), Deg(90.0), Vector3::unit_z());
    let m = math::scale(m, Vector3::new(0.5, 0.5, 0.5));
    print("rotate 90 about z, scale 0.5", m * point);
}
