//! A software backend without any GPU behind it. It validates shader sources with a
//! small GLSL front-end, keeps uniform values, index buffers and texture bindings in
//! memory and assembles primitives on draw, so every frontend rule can be exercised
//! without a display.

mod source;

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::errors::*;
use crate::math::Vector2;
use crate::video::MAX_TEXTURE_UNITS;

use super::super::assets::prelude::*;
use super::utils::{check_uniform_type, DataVec};
use super::Visitor;

#[derive(Debug)]
struct HeadlessShaderData {
    /// Declared uniforms of a linked program. Empty if the program failed.
    uniforms: HashMap<String, Option<UniformVariableType>>,
    values: HashMap<String, UniformVariable>,
}

#[derive(Debug)]
struct HeadlessMeshData {
    params: MeshParams,
    indices: Vec<u32>,
}

#[derive(Debug)]
struct HeadlessTextureData {
    params: TextureParams,
}

pub struct HeadlessVisitor {
    shaders: DataVec<ShaderHandle, HeadlessShaderData>,
    meshes: DataVec<MeshHandle, HeadlessMeshData>,
    textures: DataVec<TextureHandle, HeadlessTextureData>,
    binded_shader: Option<ShaderHandle>,
    binded_textures: SmallVec<[Option<TextureHandle>; 8]>,
    stage_objects: usize,
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        HeadlessVisitor {
            shaders: DataVec::new(),
            meshes: DataVec::new(),
            textures: DataVec::new(),
            binded_shader: None,
            binded_textures: SmallVec::new(),
            stage_objects: 0,
        }
    }
}

impl Default for HeadlessVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for HeadlessVisitor {
    unsafe fn create_shader(
        &mut self,
        handle: ShaderHandle,
        vs: &str,
        fs: &str,
    ) -> Result<ShaderReport> {
        self.stage_objects += 2;

        let mut diagnostics = Vec::new();
        let vs = source::compile(vs).map_err(|log| {
            diagnostics.push(ShaderDiagnostic::compile(ShaderStage::Vertex, log));
        });

        let fs = source::compile(fs).map_err(|log| {
            diagnostics.push(ShaderDiagnostic::compile(ShaderStage::Fragment, log));
        });

        let mut uniforms = HashMap::new();
        let mut values = HashMap::new();
        if let (Ok(vs), Ok(fs)) = (vs, fs) {
            match source::link(&vs, &fs) {
                Ok(decls) => {
                    for v in decls {
                        if let (Some(tp), Some(init)) = (v.tp, v.init) {
                            if init.variable_type() == tp {
                                values.insert(v.name.clone(), init);
                            }
                        }

                        uniforms.insert(v.name, v.tp);
                    }
                }
                Err(log) => diagnostics.push(ShaderDiagnostic::link(log)),
            }
        }

        // Stage objects are released once the link attempt is over.
        self.stage_objects -= 2;

        let report = ShaderReport::from_diagnostics(diagnostics);
        self.shaders.create(
            handle,
            HeadlessShaderData { uniforms, values },
        );

        Ok(report)
    }

    unsafe fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        self.shaders
            .free(handle)
            .ok_or_else(|| Error::ShaderHandleInvalid(handle))?;

        if self.binded_shader == Some(handle) {
            self.binded_shader = None;
        }

        Ok(())
    }

    unsafe fn bind_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        if self.shaders.get(handle).is_none() {
            return Err(Error::ShaderHandleInvalid(handle));
        }

        self.binded_shader = Some(handle);
        Ok(())
    }

    fn active_shader(&self) -> Option<ShaderHandle> {
        self.binded_shader
    }

    unsafe fn set_uniform(
        &mut self,
        handle: ShaderHandle,
        name: &str,
        variable: UniformVariable,
    ) -> Result<bool> {
        let shader = self
            .shaders
            .get_mut(handle)
            .ok_or_else(|| Error::ShaderHandleInvalid(handle))?;

        let declared = match shader.uniforms.get(name) {
            Some(&v) => v,
            None => return Ok(false),
        };

        check_uniform_type(name, declared, variable.variable_type())?;
        shader.values.insert(name.to_owned(), variable);
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

        let declared = match shader.uniforms.get(name) {
            Some(&v) => v,
            None => return Ok(None),
        };

        check_uniform_type(name, declared, tp)?;
        let value = shader.values.get(name).cloned().unwrap_or(zero(tp));
        Ok(Some(value))
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

        let indices = data.indices(params.index_format);
        self.meshes
            .create(handle, HeadlessMeshData { params, indices });
        Ok(())
    }

    unsafe fn delete_mesh(&mut self, handle: MeshHandle) -> Result<()> {
        self.meshes
            .free(handle)
            .ok_or_else(|| Error::MeshHandleInvalid(handle))?;
        Ok(())
    }

    unsafe fn draw(&mut self, handle: MeshHandle, index: MeshIndex) -> Result<u32> {
        if self.binded_shader.is_none() {
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

                (from, len)
            }
            MeshIndex::All => (0, mesh.params.num_idxes),
        };

        for &v in &mesh.indices[from..from + len] {
            if v as usize >= mesh.params.num_verts {
                return Err(Error::OutOfBounds(format!(
                    "index {} refers past the {} vertices of {}.",
                    v, mesh.params.num_verts, handle
                )));
            }
        }

        Ok(mesh.params.primitive.assemble(len as u32))
    }

    unsafe fn create_texture(
        &mut self,
        handle: TextureHandle,
        params: TextureParams,
        data: TextureData,
    ) -> Result<()> {
        params.validate(&data)?;
        self.textures.create(handle, HeadlessTextureData { params });
        Ok(())
    }

    unsafe fn delete_texture(&mut self, handle: TextureHandle) -> Result<()> {
        self.textures
            .free(handle)
            .ok_or_else(|| Error::TextureHandleInvalid(handle))?;

        for v in self.binded_textures.iter_mut() {
            if *v == Some(handle) {
                *v = None;
            }
        }

        Ok(())
    }

    unsafe fn bind_texture(&mut self, unit: usize, handle: TextureHandle) -> Result<()> {
        if unit >= MAX_TEXTURE_UNITS {
            return Err(Error::OutOfBounds(format!(
                "texture unit {} exceeds the {} available units.",
                unit, MAX_TEXTURE_UNITS
            )));
        }

        let texture = self
            .textures
            .get(handle)
            .ok_or_else(|| Error::TextureHandleInvalid(handle))?;

        trace!(
            "[HeadlessVisitor] binds {} ({}x{}) to unit {}.",
            handle,
            texture.params.dimensions.x,
            texture.params.dimensions.y,
            unit
        );

        if self.binded_textures.len() <= unit {
            self.binded_textures.resize(unit + 1, None);
        }

        self.binded_textures[unit] = Some(handle);
        Ok(())
    }

    unsafe fn clear(&mut self, _: [f32; 4]) -> Result<()> {
        Ok(())
    }

    unsafe fn update_viewport(&mut self, _: Vector2<i32>, _: Vector2<u32>) -> Result<()> {
        Ok(())
    }

    unsafe fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Uniforms start out zeroed when a program links.
fn zero(tp: UniformVariableType) -> UniformVariable {
    match tp {
        UniformVariableType::Bool => UniformVariable::Bool(false),
        UniformVariableType::I32 => UniformVariable::I32(0),
        UniformVariableType::F32 => UniformVariable::F32(0.0),
        UniformVariableType::Matrix4f => UniformVariable::Matrix4f([[0.0; 4]; 4]),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::prelude::HandleLike;

    const VS: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 transform;
void main() { gl_Position = transform * vec4(aPos, 1.0); }";

    const FS: &str = "#version 330 core
out vec4 FragColor;
uniform bool flag;
void main() { FragColor = vec4(1.0); }";

    fn quad(visitor: &mut HeadlessVisitor, handle: MeshHandle, idxes: &[u32]) -> Result<()> {
        let params = MeshParams {
            layout: VertexLayout::build()
                .with(0, VertexFormat::Float, 3, false)
                .finish(),
            num_verts: 4,
            num_idxes: idxes.len(),
            ..Default::default()
        };

        unsafe { visitor.create_mesh(handle, params, MeshData::new(&[0.0; 12], idxes)) }
    }

    #[test]
    fn uniforms() {
        let mut visitor = HeadlessVisitor::new();
        let handle = ShaderHandle::new(0, 1);

        unsafe {
            let report = visitor.create_shader(handle, VS, FS).unwrap();
            assert_eq!(report.status, ShaderStatus::Linked);
            assert_eq!(visitor.live_stage_objects(), 0);

            assert_eq!(
                visitor
                    .uniform(handle, "flag", UniformVariableType::Bool)
                    .unwrap(),
                Some(UniformVariable::Bool(false))
            );

            assert!(visitor.set_uniform(handle, "flag", true.into()).unwrap());
            assert!(!visitor.set_uniform(handle, "missing", 1.into()).unwrap());
            assert!(visitor.set_uniform(handle, "flag", 1.into()).is_err());

            assert_eq!(
                visitor
                    .uniform(handle, "flag", UniformVariableType::Bool)
                    .unwrap(),
                Some(UniformVariable::Bool(true))
            );

            assert_eq!(visitor.active_shader(), None);
        }
    }

    #[test]
    fn failed_shader() {
        let mut visitor = HeadlessVisitor::new();
        let handle = ShaderHandle::new(0, 1);

        unsafe {
            let report = visitor.create_shader(handle, "", FS).unwrap();
            assert_eq!(report.status, ShaderStatus::Failed);
            assert_eq!(report.diagnostics.len(), 1);
            assert_eq!(report.diagnostics[0].stage, Some(ShaderStage::Vertex));
            assert_eq!(visitor.live_stage_objects(), 0);
            assert!(!visitor.set_uniform(handle, "flag", true.into()).unwrap());

            visitor.delete_shader(handle).unwrap();
            assert!(visitor.delete_shader(handle).is_err());
        }
    }

    #[test]
    fn draw() {
        let mut visitor = HeadlessVisitor::new();
        let shader = ShaderHandle::new(0, 1);
        let mesh = MeshHandle::new(0, 1);

        quad(&mut visitor, mesh, &[0, 1, 2, 2, 3, 0]).unwrap();

        unsafe {
            assert!(visitor.draw(mesh, MeshIndex::All).is_err());

            visitor.create_shader(shader, VS, FS).unwrap();
            visitor.bind_shader(shader).unwrap();
            assert_eq!(visitor.draw(mesh, MeshIndex::All).unwrap(), 2);
            assert_eq!(visitor.draw(mesh, MeshIndex::Ptr(3, 3)).unwrap(), 1);
            assert!(visitor.draw(mesh, MeshIndex::Ptr(3, 6)).is_err());

            visitor.delete_shader(shader).unwrap();
            assert_eq!(visitor.active_shader(), None);
        }

        let broken = MeshHandle::new(1, 1);
        quad(&mut visitor, broken, &[0, 1, 4]).unwrap();

        unsafe {
            visitor.create_shader(shader, VS, FS).unwrap();
            visitor.bind_shader(shader).unwrap();
            assert!(visitor.draw(broken, MeshIndex::All).is_err());
        }
    }

    #[test]
    fn textures() {
        let mut visitor = HeadlessVisitor::new();
        let handle = TextureHandle::new(0, 1);
        let params = TextureParams {
            format: TextureFormat::RGB8,
            dimensions: Vector2::new(2, 2),
            ..Default::default()
        };

        unsafe {
            assert!(visitor
                .create_texture(handle, params, TextureData { bytes: vec![0; 11] })
                .is_err());

            visitor
                .create_texture(handle, params, TextureData { bytes: vec![0; 12] })
                .unwrap();

            visitor.bind_texture(1, handle).unwrap();
            assert_eq!(visitor.binded_textures[1], Some(handle));
            assert!(visitor.bind_texture(MAX_TEXTURE_UNITS, handle).is_err());

            visitor.delete_texture(handle).unwrap();
            assert_eq!(visitor.binded_textures[1], None);
            assert!(visitor.bind_texture(0, handle).is_err());
        }
    }
}
