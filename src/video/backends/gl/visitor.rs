use std::collections::HashMap;
use std::convert::TryFrom;
use std::ffi::CString;

use gl;
use gl::types::*;
use smallvec::SmallVec;

use crate::errors::*;
use crate::math::Vector2;

use super::super::super::assets::prelude::*;
use super::super::utils::{check_uniform_type, DataVec};
use super::super::Visitor;
use super::capabilities::Capabilities;
use super::types;

#[derive(Debug, Clone)]
struct GLShaderData {
    id: GLuint,
    /// Active uniforms of a linked program, resolved once after the link.
    uniforms: HashMap<String, (GLint, Option<UniformVariableType>)>,
}

#[derive(Debug, Clone)]
struct GLMeshData {
    vao: GLuint,
    vbo: GLuint,
    ibo: GLuint,
    params: MeshParams,
}

#[derive(Debug, Clone)]
struct GLTextureData {
    id: GLuint,
    params: TextureParams,
}

struct GLMutableState {
    view: (Vector2<i32>, Vector2<u32>),
    binded_shader: Option<ShaderHandle>,
    binded_vao: Option<MeshHandle>,
    binded_texture_index: usize,
    binded_textures: SmallVec<[Option<TextureHandle>; 8]>,
}

pub struct GLVisitor {
    state: GLMutableState,
    capabilities: Capabilities,
    shaders: DataVec<ShaderHandle, GLShaderData>,
    meshes: DataVec<MeshHandle, GLMeshData>,
    textures: DataVec<TextureHandle, GLTextureData>,
    stage_objects: usize,
}

impl GLVisitor {
    /// Creates a visitor over the OpenGL context that is current on this thread.
    /// The function pointers must have been loaded already.
    pub unsafe fn new() -> Result<Self> {
        let capabilities = Capabilities::parse()?;
        info!("GLVisitor {:#?}", capabilities);
        capabilities.check()?;

        let state = GLMutableState {
            view: (Vector2::new(0, 0), Vector2::new(0, 0)),
            binded_shader: None,
            binded_vao: None,
            binded_texture_index: 0,
            binded_textures: SmallVec::new(),
        };

        // Decoded RGB rows are tightly packed.
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        check()?;

        Ok(GLVisitor {
            state,
            capabilities,
            shaders: DataVec::new(),
            meshes: DataVec::new(),
            textures: DataVec::new(),
            stage_objects: 0,
        })
    }
}

impl Visitor for GLVisitor {
    unsafe fn create_shader(
        &mut self,
        handle: ShaderHandle,
        vs: &str,
        fs: &str,
    ) -> Result<ShaderReport> {
        let mut diagnostics = Vec::new();

        let (vs, vs_log) = self.compile(gl::VERTEX_SHADER, vs)?;
        if let Some(log) = vs_log {
            diagnostics.push(ShaderDiagnostic::compile(ShaderStage::Vertex, log));
        }

        let (fs, fs_log) = match self.compile(gl::FRAGMENT_SHADER, fs) {
            Ok(v) => v,
            Err(err) => {
                gl::DeleteShader(vs);
                self.stage_objects -= 1;
                return Err(err);
            }
        };

        if let Some(log) = fs_log {
            diagnostics.push(ShaderDiagnostic::compile(ShaderStage::Fragment, log));
        }

        let id = gl::CreateProgram();
        gl::AttachShader(id, vs);
        gl::AttachShader(id, fs);

        if diagnostics.is_empty() {
            if let Some(log) = Self::link(id) {
                diagnostics.push(ShaderDiagnostic::link(log));
            }
        }

        gl::DetachShader(id, vs);
        gl::DeleteShader(vs);
        gl::DetachShader(id, fs);
        gl::DeleteShader(fs);
        self.stage_objects -= 2;

        let uniforms = check().and_then(|_| {
            if diagnostics.is_empty() {
                Self::active_uniforms(id)
            } else {
                Ok(HashMap::new())
            }
        });

        let uniforms = match uniforms {
            Ok(v) => v,
            Err(err) => {
                gl::DeleteProgram(id);
                return Err(err);
            }
        };

        self.shaders.create(handle, GLShaderData { id, uniforms });
        Ok(ShaderReport::from_diagnostics(diagnostics))
    }

    unsafe fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        let shader = self
            .shaders
            .free(handle)
            .ok_or_else(|| Error::ShaderHandleInvalid(handle))?;

        if self.state.binded_shader == Some(handle) {
            gl::UseProgram(0);
            self.state.binded_shader = None;
        }

        gl::DeleteProgram(shader.id);
        check()
    }

    unsafe fn bind_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        if self.state.binded_shader == Some(handle) {
            return Ok(());
        }

        let shader = self
            .shaders
            .get(handle)
            .ok_or_else(|| Error::ShaderHandleInvalid(handle))?;

        gl::UseProgram(shader.id);
        check()?;

        self.state.binded_shader = Some(handle);
        Ok(())
    }

    fn active_shader(&self) -> Option<ShaderHandle> {
        self.state.binded_shader
    }

    unsafe fn set_uniform(
        &mut self,
        handle: ShaderHandle,
        name: &str,
        variable: UniformVariable,
    ) -> Result<bool> {
        let shader = self
            .shaders
            .get(handle)
            .ok_or_else(|| Error::ShaderHandleInvalid(handle))?;

        let (location, declared) = match shader.uniforms.get(name) {
            Some(&v) => v,
            None => return Ok(false),
        };

        check_uniform_type(name, declared, variable.variable_type())?;

        // glUniform* writes into the current program, so switch to `handle` for the
        // duration of the write and put the previous one back.
        let previous = self.state.binded_shader;
        if previous != Some(handle) {
            gl::UseProgram(shader.id);
        }

        let result = Self::bind_uniform_variable(location, &variable);

        if previous != Some(handle) {
            let id = previous
                .and_then(|v| self.shaders.get(v))
                .map(|v| v.id)
                .unwrap_or(0);
            gl::UseProgram(id);
        }

        result?;
        check()?;
        Ok(true)
    }

    unsafe fn uniform(
        &mut self,
        handle: ShaderHandle,
        name: &str,
        tp: UniformVariableType,
    ) -> Result<Option<UniformVariable>> {
        let shader = self
            .shaders
            .get(handle)
            .ok_or_else(|| Error::ShaderHandleInvalid(handle))?;

        let (location, declared) = match shader.uniforms.get(name) {
            Some(&v) => v,
            None => return Ok(None),
        };

        check_uniform_type(name, declared, tp)?;

        let variable = match tp {
            UniformVariableType::Bool | UniformVariableType::I32 => {
                let mut v: GLint = 0;
                gl::GetUniformiv(shader.id, location, &mut v);
                if tp == UniformVariableType::Bool {
                    UniformVariable::Bool(v != 0)
                } else {
                    UniformVariable::I32(v)
                }
            }
            UniformVariableType::F32 => {
                let mut v: GLfloat = 0.0;
                gl::GetUniformfv(shader.id, location, &mut v);
                UniformVariable::F32(v)
            }
            UniformVariableType::Matrix4f => {
                let mut v = [[0.0f32; 4]; 4];
                gl::GetUniformfv(shader.id, location, v.as_mut_ptr() as *mut GLfloat);
                UniformVariable::Matrix4f(v)
            }
        };

        check()?;
        Ok(Some(variable))
    }

    fn live_stage_objects(&self) -> usize {
        self.stage_objects
    }

    unsafe fn create_mesh(
        &mut self,
        handle: MeshHandle,
        params: MeshParams,
        data: MeshData,
    ) -> Result<()> {
        params.validate(&data)?;

        let stride = GLsizei::try_from(params.layout.stride()).map_err(|_| {
            Error::LayoutInvalid(format!("stride {} is too large.", params.layout.stride()))
        })?;

        let mut vao = 0;
        gl::GenVertexArrays(1, &mut vao);
        gl::BindVertexArray(vao);

        let mut buffers: [GLuint; 2] = [0; 2];
        gl::GenBuffers(2, buffers.as_mut_ptr());
        let (vbo, ibo) = (buffers[0], buffers[1]);

        let uploaded = Self::upload_buffer(gl::ARRAY_BUFFER, vbo, params.hint, &data.vptr)
            .and_then(|_| {
                Self::upload_buffer(gl::ELEMENT_ARRAY_BUFFER, ibo, params.hint, &data.iptr)
            });

        for (element, offset) in params.layout.iter() {
            let location = GLuint::from(element.location);
            gl::EnableVertexAttribArray(location);
            gl::VertexAttribPointer(
                location,
                GLint::from(element.size),
                element.format.into(),
                element.normalized as u8,
                stride,
                offset as usize as *const ::std::os::raw::c_void,
            );
        }

        gl::BindVertexArray(0);
        self.state.binded_vao = None;

        if let Err(err) = uploaded.and_then(|_| check()) {
            gl::DeleteBuffers(2, buffers.as_ptr());
            gl::DeleteVertexArrays(1, &vao);
            return Err(err);
        }

        debug!(
            "[GLVisitor] creates {} with {} vertices and {} indices.",
            handle, params.num_verts, params.num_idxes
        );

        self.meshes.create(
            handle,
            GLMeshData {
                vao,
                vbo,
                ibo,
                params,
            },
        );

        Ok(())
    }

    unsafe fn delete_mesh(&mut self, handle: MeshHandle) -> Result<()> {
        let mesh = self
            .meshes
            .free(handle)
            .ok_or_else(|| Error::MeshHandleInvalid(handle))?;

        if self.state.binded_vao == Some(handle) {
            gl::BindVertexArray(0);
            self.state.binded_vao = None;
        }

        gl::DeleteVertexArrays(1, &mesh.vao);
        gl::DeleteBuffers(1, &mesh.vbo);
        gl::DeleteBuffers(1, &mesh.ibo);
        check()
    }

    unsafe fn draw(&mut self, handle: MeshHandle, index: MeshIndex) -> Result<u32> {
        if self.state.binded_shader.is_none() {
            return Err(Error::NoActiveShader);
        }

        let mesh = self
            .meshes
            .get(handle)
            .ok_or_else(|| Error::MeshHandleInvalid(handle))?;

        let (from, len) = match index {
            MeshIndex::Ptr(from, len) => {
                if from.checked_add(len).map_or(true, |end| end > mesh.params.num_idxes) {
                    return Err(Error::OutOfBounds(format!(
                        "MeshIndex::Ptr({}, {}) exceeds {} indices.",
                        from, len, mesh.params.num_idxes
                    )));
                }

                (from * mesh.params.index_format.stride(), len)
            }
            MeshIndex::All => (0, mesh.params.num_idxes),
        };

        if self.state.binded_vao != Some(handle) {
            gl::BindVertexArray(mesh.vao);
            self.state.binded_vao = Some(handle);
        }

        gl::DrawElements(
            mesh.params.primitive.into(),
            len as GLsizei,
            mesh.params.index_format.into(),
            from as *const ::std::os::raw::c_void,
        );

        check()?;
        Ok(mesh.params.primitive.assemble(len as u32))
    }

    unsafe fn create_texture(
        &mut self,
        handle: TextureHandle,
        params: TextureParams,
        data: TextureData,
    ) -> Result<()> {
        params.validate(&data)?;

        let mut id = 0;
        gl::GenTextures(1, &mut id);

        let uploaded = Self::bind_texture_unit(&mut self.state, Some(handle), 0, id)
            .and_then(|_| Self::bind_texture_params(params.wrap, params.filter, params.mipmap))
            .and_then(|_| {
                let (internal_format, format, pixel_type) = types::texture_format(params.format);
                gl::TexImage2D(
                    gl::TEXTURE_2D,
                    0,
                    internal_format as GLint,
                    params.dimensions.x as GLsizei,
                    params.dimensions.y as GLsizei,
                    0,
                    format,
                    pixel_type,
                    data.bytes.as_ptr() as *const ::std::os::raw::c_void,
                );

                if params.mipmap {
                    gl::GenerateMipmap(gl::TEXTURE_2D);
                }

                check()
            });

        if let Err(err) = uploaded {
            // Unit 0 must not keep naming a texture that was never stored.
            gl::BindTexture(gl::TEXTURE_2D, 0);
            if let Some(v) = self.state.binded_textures.get_mut(0) {
                *v = None;
            }
            gl::DeleteTextures(1, &id);
            return Err(err);
        }

        debug!(
            "[GLVisitor] creates {} ({}x{} {:?}).",
            handle, params.dimensions.x, params.dimensions.y, params.format
        );

        self.textures.create(handle, GLTextureData { id, params });
        Ok(())
    }

    unsafe fn delete_texture(&mut self, handle: TextureHandle) -> Result<()> {
        let texture = self
            .textures
            .free(handle)
            .ok_or_else(|| Error::TextureHandleInvalid(handle))?;

        for v in self.state.binded_textures.iter_mut() {
            if *v == Some(handle) {
                *v = None;
            }
        }

        gl::DeleteTextures(1, &texture.id);
        check()
    }

    unsafe fn bind_texture(&mut self, unit: usize, handle: TextureHandle) -> Result<()> {
        let max = self.capabilities.max_combined_texture_image_units as usize;
        if unit >= max {
            return Err(Error::OutOfBounds(format!(
                "texture unit {} exceeds the {} available units.",
                unit, max
            )));
        }

        let texture = self
            .textures
            .get(handle)
            .ok_or_else(|| Error::TextureHandleInvalid(handle))?;

        trace!(
            "[GLVisitor] binds {} ({:?}) to unit {}.",
            handle,
            texture.params.format,
            unit
        );

        Self::bind_texture_unit(&mut self.state, Some(handle), unit, texture.id)
    }

    unsafe fn clear(&mut self, color: [f32; 4]) -> Result<()> {
        gl::ClearColor(color[0], color[1], color[2], color[3]);
        gl::Clear(gl::COLOR_BUFFER_BIT);
        check()
    }

    /// Set the viewport relative to the bottom-left corner of the window, in pixels.
    unsafe fn update_viewport(
        &mut self,
        position: Vector2<i32>,
        size: Vector2<u32>,
    ) -> Result<()> {
        if self.state.view != (position, size) {
            gl::Viewport(position.x, position.y, size.x as i32, size.y as i32);
            self.state.view = (position, size);
            check()?;
        }

        Ok(())
    }

    unsafe fn flush(&mut self) -> Result<()> {
        gl::Finish();
        check()
    }
}

impl GLVisitor {
    /// Creates a stage object and compiles `src` into it. The object is returned
    /// even if the compilation fails, together with the info log.
    unsafe fn compile(&mut self, stage: GLenum, src: &str) -> Result<(GLuint, Option<String>)> {
        let shader = gl::CreateShader(stage);
        if shader == 0 {
            check()?;
            return Err(Error::Backend("[GL] Failed to create shader object.".into()));
        }

        self.stage_objects += 1;

        let c_str = match CString::new(src.as_bytes()) {
            Ok(v) => v,
            Err(_) => {
                return Ok((shader, Some("source contains an interior nul byte.".into())));
            }
        };

        gl::ShaderSource(shader, 1, &c_str.as_ptr(), ::std::ptr::null());
        gl::CompileShader(shader);

        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

        if status != GLint::from(gl::TRUE) {
            let mut len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            let mut written = 0;
            gl::GetShaderInfoLog(
                shader,
                buf.len() as GLsizei,
                &mut written,
                buf.as_mut_ptr() as *mut GLchar,
            );

            buf.truncate(written as usize);
            Ok((shader, Some(String::from_utf8_lossy(&buf).into_owned())))
        } else {
            Ok((shader, None))
        }
    }

    /// Links `program`, returning the info log on failure.
    unsafe fn link(program: GLuint) -> Option<String> {
        gl::LinkProgram(program);

        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

        if status != GLint::from(gl::TRUE) {
            let mut len: GLint = 0;
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            let mut written = 0;
            gl::GetProgramInfoLog(
                program,
                buf.len() as GLsizei,
                &mut written,
                buf.as_mut_ptr() as *mut GLchar,
            );

            buf.truncate(written as usize);
            Some(String::from_utf8_lossy(&buf).into_owned())
        } else {
            None
        }
    }

    /// Resolves the location and type of every active uniform of `program`.
    unsafe fn active_uniforms(
        program: GLuint,
    ) -> Result<HashMap<String, (GLint, Option<UniformVariableType>)>> {
        let mut count = 0;
        gl::GetProgramiv(program, gl::ACTIVE_UNIFORMS, &mut count);
        let mut max_len = 0;
        gl::GetProgramiv(program, gl::ACTIVE_UNIFORM_MAX_LENGTH, &mut max_len);

        let mut uniforms = HashMap::new();
        for i in 0..count {
            let mut buf = vec![0u8; max_len.max(1) as usize];
            let mut written = 0;
            let mut size = 0;
            let mut tp = 0;
            gl::GetActiveUniform(
                program,
                i as GLuint,
                buf.len() as GLsizei,
                &mut written,
                &mut size,
                &mut tp,
                buf.as_mut_ptr() as *mut GLchar,
            );

            buf.truncate(written as usize);
            let mut name = String::from_utf8_lossy(&buf).into_owned();
            let array = size > 1 || name.ends_with("[0]");
            if name.ends_with("[0]") {
                let len = name.len() - 3;
                name.truncate(len);
            }

            let c_name = CString::new(name.as_bytes())
                .map_err(|_| Error::Backend(format!("[GL] Uniform name {:?} is malformed.", name)))?;
            let location = gl::GetUniformLocation(program, c_name.as_ptr());

            // Members of uniform blocks have no location.
            if location < 0 {
                continue;
            }

            let tp = if array {
                None
            } else {
                types::uniform_variable_type(tp)
            };

            uniforms.insert(name, (location, tp));
        }

        check()?;
        Ok(uniforms)
    }

    unsafe fn bind_uniform_variable(location: GLint, variable: &UniformVariable) -> Result<()> {
        match *variable {
            UniformVariable::Bool(v) => gl::Uniform1i(location, v as GLint),
            UniformVariable::I32(v) => gl::Uniform1i(location, v),
            UniformVariable::F32(v) => gl::Uniform1f(location, v),
            UniformVariable::Matrix4f(v) => {
                gl::UniformMatrix4fv(location, 1, gl::FALSE, v.as_ptr() as *const GLfloat)
            }
        }

        check()
    }

    unsafe fn bind_texture_unit(
        state: &mut GLMutableState,
        handle: Option<TextureHandle>,
        unit: usize,
        id: GLuint,
    ) -> Result<()> {
        if state.binded_texture_index != unit {
            state.binded_texture_index = unit;
            gl::ActiveTexture(gl::TEXTURE0 + unit as GLuint);
        }

        if state.binded_textures.len() <= unit {
            state.binded_textures.resize(unit + 1, None);
        }

        if state.binded_textures[unit] != handle {
            state.binded_textures[unit] = handle;
            gl::BindTexture(gl::TEXTURE_2D, id);
        }

        check()
    }

    unsafe fn upload_buffer(tp: GLenum, id: GLuint, hint: MeshHint, data: &[u8]) -> Result<()> {
        gl::BindBuffer(tp, id);

        let value = if data.is_empty() {
            ::std::ptr::null()
        } else {
            data.as_ptr() as *const ::std::os::raw::c_void
        };

        gl::BufferData(tp, data.len() as GLsizeiptr, value, hint.into());
        check()
    }

    unsafe fn bind_texture_params(
        wrap: TextureWrap,
        filter: TextureFilter,
        mipmap: bool,
    ) -> Result<()> {
        let wrap: GLenum = wrap.into();
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap as GLint);

        let (min_filter, mag_filter) = match (filter, mipmap) {
            (TextureFilter::Nearest, false) => (gl::NEAREST, gl::NEAREST),
            (TextureFilter::Nearest, true) => (gl::NEAREST_MIPMAP_NEAREST, gl::NEAREST),
            (TextureFilter::Linear, false) => (gl::LINEAR, gl::LINEAR),
            (TextureFilter::Linear, true) => (gl::LINEAR_MIPMAP_LINEAR, gl::LINEAR),
        };

        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min_filter as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag_filter as GLint);
        check()
    }
}

unsafe fn check() -> Result<()> {
    let msg = match gl::GetError() {
        gl::NO_ERROR => return Ok(()),
        gl::INVALID_ENUM => "An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "A numeric argument is out of range.",
        gl::INVALID_OPERATION => "The specified operation is not allowed in the current state.",
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        }
        gl::OUT_OF_MEMORY => "There is not enough memory left to execute the command.",
        _ => "Oops, Unknown OpenGL error.",
    };

    Err(Error::Backend(format!("[GL] {}", msg)))
}
