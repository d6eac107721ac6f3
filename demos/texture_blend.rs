//! A quad sampling two textures and blending them. An image that fails to load is
//! logged and its unit is left unbound.

use log::error;
use shaderlab::prelude::*;

const VS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/texture_vertex.glsl");
const FS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/texture_fragment.glsl");

const CONTAINER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/container.jpg");
const FACE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/awesomeface.png");

#[rustfmt::skip]
const VERTICES: [f32; 32] = [
    // position         color           uv
     0.5,  0.5, 0.0,    1.0, 0.0, 0.0,  1.0, 1.0,
    -0.5,  0.5, 0.0,    0.0, 1.0, 0.0,  0.0, 1.0,
    -0.5, -0.5, 0.0,    0.0, 0.0, 1.0,  0.0, 0.0,
     0.5, -0.5, 0.0,    1.0, 1.0, 0.0,  1.0, 0.0,
];

const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

fn texture(video: &VideoSystem, path: &str) -> Option<Texture> {
    match Texture::from_file(video, path, TextureWrap::Repeat, TextureFilter::Linear) {
        Ok(texture) => Some(texture),
        Err(err) => {
            error!("{}", err);
            None
        }
    }
}

fn run(app: &mut Application) -> Result<()> {
    let shader = ShaderProgram::from_files(app.video(), VS, FS)?;

    let params = MeshParams {
        layout: VertexLayout::build()
            .with(0, VertexFormat::Float, 3, false)
            .with(1, VertexFormat::Float, 3, false)
            .with(2, VertexFormat::Float, 2, false)
            .finish(),
        num_verts: 4,
        num_idxes: INDICES.len(),
        ..Default::default()
    };

    let quad = Mesh::new(app.video(), params, MeshData::new(&VERTICES, &INDICES))?;

    let textures = [texture(app.video(), CONTAINER), texture(app.video(), FACE)];

    shader.activate()?;
    shader.set_int("texture1", 0)?;
    shader.set_int("texture2", 1)?;

    app.run(|_| {
        for (unit, v) in textures.iter().enumerate() {
            if let Some(texture) = v {
                texture.bind(unit)?;
            }
        }

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
