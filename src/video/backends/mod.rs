//! The backend of renderer, which should be responsible for only one thing:
//! talking to a low-level graphics API on behalf of the `VideoSystem`.

pub mod headless;
mod utils;

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

use crate::errors::*;
use crate::math::Vector2;

use super::assets::prelude::*;

pub trait Visitor {
    /// Compiles both stages, links them into a new program and releases the stage
    /// objects whatever the outcome. Compile and link failures are part of the
    /// returned report; `Err` is reserved for the backend itself misbehaving.
    unsafe fn create_shader(
        &mut self,
        handle: ShaderHandle,
        vs: &str,
        fs: &str,
    ) -> Result<ShaderReport>;

    unsafe fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()>;

    /// Makes `handle` the single active program of the context.
    unsafe fn bind_shader(&mut self, handle: ShaderHandle) -> Result<()>;

    fn active_shader(&self) -> Option<ShaderHandle>;

    /// Writes `variable` into the uniform `name` of `handle`, leaving the active
    /// program as it was. Returns false if the program has no such uniform.
    unsafe fn set_uniform(
        &mut self,
        handle: ShaderHandle,
        name: &str,
        variable: UniformVariable,
    ) -> Result<bool>;

    /// Reads back the current value of the uniform `name` of `handle`.
    unsafe fn uniform(
        &mut self,
        handle: ShaderHandle,
        name: &str,
        tp: UniformVariableType,
    ) -> Result<Option<UniformVariable>>;

    /// The number of per-stage shader objects that are currently alive.
    fn live_stage_objects(&self) -> usize;

    unsafe fn create_mesh(
        &mut self,
        handle: MeshHandle,
        params: MeshParams,
        data: MeshData,
    ) -> Result<()>;

    unsafe fn delete_mesh(&mut self, handle: MeshHandle) -> Result<()>;

    /// Submits the mesh with the active program, returns the number of assembled
    /// primitives.
    unsafe fn draw(&mut self, mesh: MeshHandle, index: MeshIndex) -> Result<u32>;

    unsafe fn create_texture(
        &mut self,
        handle: TextureHandle,
        params: TextureParams,
        data: TextureData,
    ) -> Result<()>;

    unsafe fn delete_texture(&mut self, handle: TextureHandle) -> Result<()>;

    unsafe fn bind_texture(&mut self, unit: usize, handle: TextureHandle) -> Result<()>;

    unsafe fn clear(&mut self, color: [f32; 4]) -> Result<()>;

    unsafe fn update_viewport(&mut self, position: Vector2<i32>, size: Vector2<u32>)
        -> Result<()>;

    /// Blocks until all execution is complete.
    unsafe fn flush(&mut self) -> Result<()>;
}

#[cfg(not(target_arch = "wasm32"))]
pub fn new() -> Result<Box<dyn Visitor>> {
    let visitor = unsafe { self::gl::visitor::GLVisitor::new()? };
    Ok(Box::new(visitor))
}

pub fn new_headless() -> Box<dyn Visitor> {
    Box::new(self::headless::HeadlessVisitor::new())
}
