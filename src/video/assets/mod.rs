pub mod mesh;
pub mod shader;
pub mod texture;
pub mod texture_loader;

pub mod prelude {
    pub use super::shader::{
        ShaderDiagnostic, ShaderHandle, ShaderReport, ShaderStage, ShaderStatus,
        UniformVariable, UniformVariableType,
    };

    pub use super::texture::{
        TextureData, TextureFilter, TextureFormat, TextureHandle, TextureParams, TextureWrap,
    };

    pub use super::mesh::{
        IndexFormat, MeshData, MeshHandle, MeshHint, MeshIndex, MeshParams, MeshPrimitive,
        VertexAttribute, VertexFormat, VertexLayout, VertexLayoutBuilder,
    };
}
