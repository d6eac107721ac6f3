//! A thin rendering layer over OpenGL, built around an explicit rendering context.
//!
//! # Rendering context
//!
//! `VideoSystem` owns the backend and the only piece of process-wide mutable state
//! in a rasterizer: which program is currently active. Programs, meshes and textures
//! are created against a `VideoSystem` and keep it alive through a shared reference,
//! so a resource can always release its object when dropped.
//!
//! Everything here is single-threaded. The OpenGL context belongs to the thread that
//! made it current, and so does every resource created from it.
//!
//! # Shader programs
//!
//! A `ShaderProgram` is built from a vertex stage and a fragment stage. Each stage is
//! compiled into an intermediate object, both are attached and linked, and the stage
//! objects are released right after the link attempt, successful or not.
//!
//! Compile and link failures are not fatal. The lenient constructors log them and
//! return a program in the `ShaderStatus::Failed` state, with the diagnostics attached
//! for callers that want to inspect them. The strict constructors turn the same
//! failures into `Error::ShaderCreationFailure`.
//!
//! ```rust,ignore
//! let video = VideoSystem::headless();
//! let shader = ShaderProgram::new(&video, VS, FS)?;
//! shader.activate()?;
//! assert!(shader.set_int("texture1", 0)?);
//! ```

pub mod assets;
pub mod backends;

mod mesh;
mod shader;
mod system;
mod texture;

pub use self::mesh::Mesh;
pub use self::shader::ShaderProgram;
pub use self::system::VideoSystem;
pub use self::texture::Texture;

/// Maximum number of generic vertex attribute locations, the minimum OpenGL 3.3
/// guarantees.
pub const MAX_VERTEX_ATTRIBUTES: usize = 16;

/// Upper bound of a single compile or link diagnostic, in bytes.
pub const MAX_INFO_LOG_LEN: usize = 512;

/// Number of texture units the frontend allows to bind.
pub const MAX_TEXTURE_UNITS: usize = 16;

pub mod prelude {
    pub use super::assets::prelude::*;
    pub use super::{Mesh, ShaderProgram, Texture, VideoSystem};
}
