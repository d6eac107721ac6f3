//! # What is This?
//!
//! `shaderlab` is a handful of small, sequential OpenGL exercises factored around
//! one reusable piece: a `ShaderProgram` that compiles a vertex and a fragment
//! stage, links them, and exposes named uniforms.
//!
//! The rendering context is an explicit object (`VideoSystem`) instead of hidden
//! global state. Every GPU resource (programs, meshes, textures) is a move-only
//! handle that releases its object when dropped.
//!
//! Two backends implement the rendering context. The `gl` backend talks to a real
//! OpenGL 3.3 core context created by the `window` module; the headless backend is
//! a deterministic software stand-in that the tests run against.
//!
//! ```rust,ignore
//! use shaderlab::prelude::*;
//!
//! let video = VideoSystem::headless();
//! let shader = ShaderProgram::compile(&video, VS, FS);
//! shader.activate()?;
//! shader.set_mat4("transform", Matrix4::from_scale(0.5))?;
//! ```

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

#[macro_use]
pub mod utils;

pub mod application;
pub mod errors;
pub mod math;
pub mod settings;
pub mod video;
pub mod window;

pub mod prelude {
    pub use crate::application::Application;
    pub use crate::errors::{Error, Result};
    pub use crate::math::prelude::*;
    pub use crate::settings::{Settings, VideoParams, WindowParams};
    pub use crate::video::prelude::*;
    pub use crate::window::prelude::*;
}
