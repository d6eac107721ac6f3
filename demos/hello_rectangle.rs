//! A rectangle made of two triangles that share a diagonal, drawn from four
//! vertices and an index buffer.

use shaderlab::prelude::*;

const VS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/hello_vertex.glsl");
const FS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/hello_fragment.glsl");

#[rustfmt::skip]
const VERTICES: [f32; 12] = [
     0.5,  0.5, 0.0, // top right
    -0.5,  0.5, 0.0, // top left
    -0.5, -0.5, 0.0, // bottom left
     0.5, -0.5, 0.0, // bottom right
];

const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

fn run(app: &mut Application) -> Result<()> {
    let shader = ShaderProgram::from_files(app.video(), VS, FS)?;

    let params = MeshParams {
        layout: VertexLayout::build()
            .with(0, VertexFormat::Float, 3, false)
            .finish(),
        num_verts: 4,
        num_idxes: INDICES.len(),
        ..Default::default()
    };

    let quad = Mesh::new(app.video(), params, MeshData::new(&VERTICES, &INDICES))?;

    app.run(|_| {
        shader.activate()?;
        quad.draw(MeshIndex::All)?;
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
