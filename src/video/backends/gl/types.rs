use gl;
use gl::types::*;

use super::super::super::assets::prelude::*;

impl From<MeshHint> for GLenum {
    fn from(hint: MeshHint) -> Self {
        match hint {
            MeshHint::Immutable => gl::STATIC_DRAW,
            MeshHint::Stream => gl::STREAM_DRAW,
            MeshHint::Dynamic => gl::DYNAMIC_DRAW,
        }
    }
}

impl From<VertexFormat> for GLenum {
    fn from(format: VertexFormat) -> Self {
        match format {
            VertexFormat::Byte => gl::BYTE,
            VertexFormat::UByte => gl::UNSIGNED_BYTE,
            VertexFormat::Short => gl::SHORT,
            VertexFormat::UShort => gl::UNSIGNED_SHORT,
            VertexFormat::Float => gl::FLOAT,
        }
    }
}

impl From<MeshPrimitive> for GLenum {
    fn from(primitive: MeshPrimitive) -> Self {
        match primitive {
            MeshPrimitive::Points => gl::POINTS,
            MeshPrimitive::Lines => gl::LINES,
            MeshPrimitive::LineStrip => gl::LINE_STRIP,
            MeshPrimitive::Triangles => gl::TRIANGLES,
            MeshPrimitive::TriangleStrip => gl::TRIANGLE_STRIP,
        }
    }
}

impl From<IndexFormat> for GLenum {
    fn from(format: IndexFormat) -> Self {
        match format {
            IndexFormat::U16 => gl::UNSIGNED_SHORT,
            IndexFormat::U32 => gl::UNSIGNED_INT,
        }
    }
}

impl From<TextureWrap> for GLenum {
    fn from(wrap: TextureWrap) -> Self {
        match wrap {
            TextureWrap::Repeat => gl::REPEAT,
            TextureWrap::Mirror => gl::MIRRORED_REPEAT,
            TextureWrap::Clamp => gl::CLAMP_TO_EDGE,
        }
    }
}

/// Returns `(internal_format, format, pixel_type)` of `format`.
pub fn texture_format(format: TextureFormat) -> (GLenum, GLenum, GLenum) {
    match format {
        TextureFormat::RGB8 => (gl::RGB8, gl::RGB, gl::UNSIGNED_BYTE),
        TextureFormat::RGBA8 => (gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
    }
}

/// Maps the type reported by `glGetActiveUniform` to a uniform variable type.
/// Samplers are set through their texture unit, an integer.
pub fn uniform_variable_type(tp: GLenum) -> Option<UniformVariableType> {
    match tp {
        gl::BOOL => Some(UniformVariableType::Bool),
        gl::INT | gl::SAMPLER_2D | gl::SAMPLER_3D | gl::SAMPLER_CUBE => {
            Some(UniformVariableType::I32)
        }
        gl::FLOAT => Some(UniformVariableType::F32),
        gl::FLOAT_MAT4 => Some(UniformVariableType::Matrix4f),
        _ => None,
    }
}
