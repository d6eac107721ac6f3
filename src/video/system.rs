use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::errors::*;
use crate::math::Vector2;
use crate::utils::prelude::HandlePool;

use super::assets::prelude::*;
use super::backends::{self, Visitor};

/// The rendering context. Every resource is created against one `VideoSystem` and
/// keeps it alive, so cloning is cheap and only clones the reference.
#[derive(Clone)]
pub struct VideoSystem {
    state: Rc<VideoState>,
}

struct VideoState {
    visitor: RefCell<Box<dyn Visitor>>,
    shaders: RefCell<HandlePool<ShaderHandle>>,
    meshes: RefCell<HandlePool<MeshHandle>>,
    textures: RefCell<HandlePool<TextureHandle>>,
}

impl VideoState {
    fn new(visitor: Box<dyn Visitor>) -> Self {
        VideoState {
            visitor: RefCell::new(visitor),
            shaders: RefCell::new(HandlePool::new()),
            meshes: RefCell::new(HandlePool::new()),
            textures: RefCell::new(HandlePool::new()),
        }
    }
}

impl fmt::Debug for VideoSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VideoSystem")
            .field("active_shader", &self.active_shader())
            .field("live_stage_objects", &self.live_stage_objects())
            .finish()
    }
}

impl VideoSystem {
    /// Create a new `VideoSystem` over the OpenGL context that is current on this
    /// thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Result<Self> {
        let visitor = backends::new()?;
        Ok(VideoSystem {
            state: Rc::new(VideoState::new(visitor)),
        })
    }

    /// Create a headless `VideoSystem`.
    pub fn headless() -> Self {
        VideoSystem {
            state: Rc::new(VideoState::new(backends::new_headless())),
        }
    }

    /// Clears the default framebuffer with `color`.
    pub fn clear(&self, color: [f32; 4]) -> Result<()> {
        unsafe { self.state.visitor.borrow_mut().clear(color) }
    }

    /// Maps normalized device coordinates onto the given area of the window.
    pub fn update_viewport(&self, position: Vector2<i32>, size: Vector2<u32>) -> Result<()> {
        unsafe {
            self.state
                .visitor
                .borrow_mut()
                .update_viewport(position, size)
        }
    }

    /// Blocks until every submitted command has been executed.
    pub fn flush(&self) -> Result<()> {
        unsafe { self.state.visitor.borrow_mut().flush() }
    }

    /// The program that draw calls currently use.
    pub fn active_shader(&self) -> Option<ShaderHandle> {
        self.state.visitor.borrow().active_shader()
    }

    /// The number of per-stage shader objects that are alive. Stage objects only
    /// live while a program is being built, so this is zero between constructions.
    pub fn live_stage_objects(&self) -> usize {
        self.state.visitor.borrow().live_stage_objects()
    }
}

impl VideoSystem {
    pub(crate) fn create_shader(&self, vs: &str, fs: &str) -> Result<(ShaderHandle, ShaderReport)> {
        let handle = self.state.shaders.borrow_mut().create();

        match unsafe { self.state.visitor.borrow_mut().create_shader(handle, vs, fs) } {
            Ok(report) => {
                debug!("[VideoSystem] creates {} ({:?}).", handle, report.status);
                Ok((handle, report))
            }
            Err(err) => {
                self.state.shaders.borrow_mut().free(handle);
                Err(err)
            }
        }
    }

    pub(crate) fn delete_shader(&self, handle: ShaderHandle) -> Result<()> {
        if !self.state.shaders.borrow_mut().free(handle) {
            return Err(Error::ShaderHandleInvalid(handle));
        }

        debug!("[VideoSystem] deletes {}.", handle);
        unsafe { self.state.visitor.borrow_mut().delete_shader(handle) }
    }

    pub(crate) fn bind_shader(&self, handle: ShaderHandle) -> Result<()> {
        unsafe { self.state.visitor.borrow_mut().bind_shader(handle) }
    }

    pub(crate) fn set_uniform(
        &self,
        handle: ShaderHandle,
        name: &str,
        variable: UniformVariable,
    ) -> Result<bool> {
        unsafe {
            self.state
                .visitor
                .borrow_mut()
                .set_uniform(handle, name, variable)
        }
    }

    pub(crate) fn uniform(
        &self,
        handle: ShaderHandle,
        name: &str,
        tp: UniformVariableType,
    ) -> Result<Option<UniformVariable>> {
        unsafe { self.state.visitor.borrow_mut().uniform(handle, name, tp) }
    }
}

impl VideoSystem {
    pub(crate) fn create_mesh(&self, params: MeshParams, data: MeshData) -> Result<MeshHandle> {
        params.validate(&data)?;

        let handle = self.state.meshes.borrow_mut().create();
        if let Err(err) = unsafe {
            self.state
                .visitor
                .borrow_mut()
                .create_mesh(handle, params, data)
        } {
            self.state.meshes.borrow_mut().free(handle);
            return Err(err);
        }

        Ok(handle)
    }

    pub(crate) fn delete_mesh(&self, handle: MeshHandle) -> Result<()> {
        if !self.state.meshes.borrow_mut().free(handle) {
            return Err(Error::MeshHandleInvalid(handle));
        }

        unsafe { self.state.visitor.borrow_mut().delete_mesh(handle) }
    }

    pub(crate) fn draw(&self, handle: MeshHandle, index: MeshIndex) -> Result<u32> {
        unsafe { self.state.visitor.borrow_mut().draw(handle, index) }
    }
}

impl VideoSystem {
    pub(crate) fn create_texture(
        &self,
        params: TextureParams,
        data: TextureData,
    ) -> Result<TextureHandle> {
        params.validate(&data)?;

        let handle = self.state.textures.borrow_mut().create();
        if let Err(err) = unsafe {
            self.state
                .visitor
                .borrow_mut()
                .create_texture(handle, params, data)
        } {
            self.state.textures.borrow_mut().free(handle);
            return Err(err);
        }

        Ok(handle)
    }

    pub(crate) fn delete_texture(&self, handle: TextureHandle) -> Result<()> {
        if !self.state.textures.borrow_mut().free(handle) {
            return Err(Error::TextureHandleInvalid(handle));
        }

        unsafe { self.state.visitor.borrow_mut().delete_texture(handle) }
    }

    pub(crate) fn bind_texture(&self, unit: usize, handle: TextureHandle) -> Result<()> {
        unsafe { self.state.visitor.borrow_mut().bind_texture(unit, handle) }
    }
}
