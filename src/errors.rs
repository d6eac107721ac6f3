use crate::video::assets::prelude::{
    MeshHandle, ShaderHandle, TextureHandle, UniformVariableType,
};

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Window: {}", _0)]
    Window(String),
    #[fail(display = "Backend: {}", _0)]
    Backend(String),
    #[fail(display = "OpenGL implementation doesn\'t support {}.", _0)]
    Requirement(String),
    #[fail(display = "{} is invalid.", _0)]
    ShaderHandleInvalid(ShaderHandle),
    #[fail(display = "{} is invalid.", _0)]
    MeshHandleInvalid(MeshHandle),
    #[fail(display = "{} is invalid.", _0)]
    TextureHandleInvalid(TextureHandle),
    #[fail(display = "Failed to create shader, errors: \n{}", _0)]
    ShaderCreationFailure(String),
    #[fail(
        display = "The uniform {} needs a {:?} instead of {:?}.",
        name, expected, found
    )]
    UniformTypeMismatch {
        name: String,
        expected: UniformVariableType,
        found: UniformVariableType,
    },
    #[fail(display = "Trying to draw without an active shader program.")]
    NoActiveShader,
    #[fail(display = "Invalid vertex layout: {}", _0)]
    LayoutInvalid(String),
    #[fail(display = "Out of bounds: {}", _0)]
    OutOfBounds(String),
    #[fail(display = "Asset: {}", _0)]
    Asset(String),
    #[fail(display = "Settings: {}", _0)]
    Settings(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<::std::io::Error> for Error {
    fn from(err: ::std::io::Error) -> Error {
        Error::Asset(format!("{}", err))
    }
}

impl From<::image::ImageError> for Error {
    fn from(err: ::image::ImageError) -> Error {
        Error::Asset(format!("{}", err))
    }
}

impl From<::serde_json::Error> for Error {
    fn from(err: ::serde_json::Error) -> Error {
        Error::Settings(format!("{}", err))
    }
}
