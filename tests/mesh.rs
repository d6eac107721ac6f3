extern crate shaderlab;

use shaderlab::prelude::*;
use shaderlab::video::assets::mesh::triangles;

const VS: &str = "#version 330 core\nlayout(location=0) in vec3 p; void main(){gl_Position=vec4(p,1);}";

const FS: &str = "#version 330 core\nout vec4 color; void main(){color=vec4(1.0,0.5,0.2,1.0);}";

#[rustfmt::skip]
const QUAD: [f32; 12] = [
     0.5,  0.5, 0.0,
    -0.5,  0.5, 0.0,
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

fn position() -> VertexLayout {
    VertexLayout::build()
        .with(0, VertexFormat::Float, 3, false)
        .finish()
}

fn quad_params() -> MeshParams {
    MeshParams {
        layout: position(),
        num_verts: 4,
        num_idxes: 6,
        ..Default::default()
    }
}

#[test]
fn exercise_layouts() {
    let layout = position();
    assert_eq!(layout.stride(), 12);
    assert_eq!(layout.offset(0), Some(0));

    let layout = VertexLayout::build()
        .with(0, VertexFormat::Float, 3, false)
        .with(1, VertexFormat::Float, 3, false)
        .finish();
    assert_eq!(layout.stride(), 24);
    assert_eq!(layout.offset(1), Some(12));

    let layout = VertexLayout::build()
        .with(0, VertexFormat::Float, 3, false)
        .with(1, VertexFormat::Float, 3, false)
        .with(2, VertexFormat::Float, 2, false)
        .finish();
    assert_eq!(layout.stride(), 32);
    assert_eq!(layout.offset(1), Some(12));
    assert_eq!(layout.offset(2), Some(24));

    let offsets: Vec<_> = layout.iter().map(|(_, offset)| offset).collect();
    assert_eq!(offsets, vec![0, 12, 24]);
}

#[test]
fn unit_quad_end_to_end() {
    let video = VideoSystem::headless();
    let shader = ShaderProgram::new(&video, VS, FS).unwrap();

    shader.activate().unwrap();
    assert!(shader.is_active());

    let data = MeshData::new(&QUAD, &QUAD_INDICES);
    let decoded = triangles(&data.indices(IndexFormat::U32));
    assert_eq!(decoded, vec![[0, 1, 2], [2, 3, 0]]);

    // Both triangles share the diagonal from vertex 0 to vertex 2.
    for v in &decoded {
        assert!(v.contains(&0) && v.contains(&2));
    }

    let quad = Mesh::new(&video, quad_params(), data).unwrap();
    assert_eq!(quad.draw(MeshIndex::All).unwrap(), 2);
    assert_eq!(quad.draw(MeshIndex::Ptr(3, 3)).unwrap(), 1);
}

#[test]
fn draw_needs_an_active_program() {
    let video = VideoSystem::headless();
    let quad = Mesh::new(&video, quad_params(), MeshData::new(&QUAD, &QUAD_INDICES)).unwrap();

    match quad.draw(MeshIndex::All) {
        Err(Error::NoActiveShader) => {}
        other => panic!("unexpected {:?}", other),
    }

    let shader = ShaderProgram::new(&video, VS, FS).unwrap();
    shader.activate().unwrap();
    assert_eq!(quad.draw(MeshIndex::All).unwrap(), 2);

    drop(shader);
    assert!(quad.draw(MeshIndex::All).is_err());
}

#[test]
fn two_quads() {
    #[rustfmt::skip]
    let vertices: [f32; 48] = [
         0.5,  0.5, 0.0,  1.0, 1.0, 0.5,
        -0.5,  0.5, 0.0,  0.5, 1.0, 0.75,
        -0.5, -0.5, 0.0,  0.6, 1.0, 0.2,
         0.5, -0.5, 0.0,  1.0, 0.2, 1.0,
         0.8,  0.8, 0.0,  0.3, 0.4, 0.2,
        -0.2,  0.8, 0.0,  0.2, 0.8, 0.15,
        -0.2, -0.2, 0.0,  0.3, 0.4, 0.6,
         0.8, -0.2, 0.0,  1.0, 0.2, 1.0,
    ];

    let indices: [u32; 12] = [0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4];

    let params = MeshParams {
        layout: VertexLayout::build()
            .with(0, VertexFormat::Float, 3, false)
            .with(1, VertexFormat::Float, 3, false)
            .finish(),
        num_verts: 8,
        num_idxes: 12,
        ..Default::default()
    };

    assert_eq!(params.vertex_buffer_len(), 8 * 24);
    assert_eq!(params.index_buffer_len(), 12 * 4);

    let video = VideoSystem::headless();
    let shader = ShaderProgram::new(&video, VS, FS).unwrap();
    shader.activate().unwrap();

    let quads = Mesh::new(&video, params, MeshData::new(&vertices, &indices)).unwrap();
    assert_eq!(quads.draw(MeshIndex::All).unwrap(), 4);
}

#[test]
fn mismatched_buffers() {
    let video = VideoSystem::headless();

    let data = MeshData::new(&QUAD[..9], &QUAD_INDICES);
    match Mesh::new(&video, quad_params(), data) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    let data = MeshData::new(&QUAD, &QUAD_INDICES[..3]);
    assert!(Mesh::new(&video, quad_params(), data).is_err());

    let params = MeshParams {
        layout: VertexLayout::default(),
        ..quad_params()
    };

    match Mesh::new(&video, params, MeshData::new(&QUAD, &QUAD_INDICES)) {
        Err(Error::LayoutInvalid(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn index_ranges() {
    let video = VideoSystem::headless();
    let shader = ShaderProgram::new(&video, VS, FS).unwrap();
    shader.activate().unwrap();

    let quad = Mesh::new(&video, quad_params(), MeshData::new(&QUAD, &QUAD_INDICES)).unwrap();
    assert!(quad.draw(MeshIndex::Ptr(4, 3)).is_err());
    match quad.draw(MeshIndex::Ptr(usize::MAX, 1)) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    // An index past the last vertex is only caught when drawn.
    let indices = [0, 1, 2, 2, 4, 0];
    let broken = Mesh::new(&video, quad_params(), MeshData::new(&QUAD, &indices)).unwrap();
    assert!(broken.draw(MeshIndex::Ptr(0, 3)).is_ok());
    match broken.draw(MeshIndex::All) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn u16_indices() {
    let video = VideoSystem::headless();
    let shader = ShaderProgram::new(&video, VS, FS).unwrap();
    shader.activate().unwrap();

    let params = MeshParams {
        index_format: IndexFormat::U16,
        ..quad_params()
    };

    let data = MeshData::with_u16_indices(&QUAD, &[0, 1, 2, 2, 3, 0]);
    assert_eq!(data.indices(IndexFormat::U16), QUAD_INDICES.to_vec());

    let quad = Mesh::new(&video, params, data).unwrap();
    assert_eq!(quad.draw(MeshIndex::All).unwrap(), 2);
}
