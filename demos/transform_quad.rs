//! Two colored quads in one mesh, spun around a tilted axis through the `transform`
//! uniform.

use shaderlab::math;
use shaderlab::prelude::*;

const VS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/vertex_core.glsl");
const FS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/fragment_core.glsl");

#[rustfmt::skip]
const VERTICES: [f32; 48] = [
    // position         color
     0.5,  0.5, 0.0,    1.0, 1.0, 0.5,
    -0.5,  0.5, 0.0,    0.5, 1.0, 0.75,
    -0.5, -0.5, 0.0,    0.6, 1.0, 0.2,
     0.5, -0.5, 0.0,    1.0, 0.2, 1.0,

     0.8,  0.8, 0.0,    0.3, 0.4, 0.2,
    -0.2,  0.8, 0.0,    0.2, 0.8, 0.15,
    -0.2, -0.2, 0.0,    0.3, 0.4, 0.6,
     0.8, -0.2, 0.0,    1.0, 0.2, 1.0,
];

#[rustfmt::skip]
const INDICES: [u32; 12] = [
    0, 1, 2,
    2, 3, 0,
    4, 5, 6,
    6, 7, 4,
];

fn run(app: &mut Application) -> Result<()> {
    let shader = ShaderProgram::from_files(app.video(), VS, FS)?;

    let params = MeshParams {
        layout: VertexLayout::build()
            .with(0, VertexFormat::Float, 3, false)
            .with(1, VertexFormat::Float, 3, false)
            .finish(),
        num_verts: 8,
        num_idxes: INDICES.len(),
        ..Default::default()
    };

    let quads = Mesh::new(app.video(), params, MeshData::new(&VERTICES, &INDICES))?;

    let mut transform = math::rotate(Matrix4::identity(), Deg(90.0), Vector3::unit_z());
    transform = math::scale(transform, Vector3::new(0.5, 0.5, 0.5));

    shader.activate()?;
    shader.set_mat4("transform", transform)?;

    let axis = Vector3::new(0.3, 0.7, 1.0);
    app.run(|app| {
        let angle = Deg(app.elapsed().as_secs_f32() / 20.0);
        transform = math::rotate(transform, angle, axis);

        shader.activate()?;
        shader.set_mat4("transform", transform)?;
        quads.draw(MeshIndex::All)?;
        Ok(())
    })
}

fn main() {
    env_logger::init();

    let mut app = match Application::new(Settings::default()) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("Failed to create window: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&mut app) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
