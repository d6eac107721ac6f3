use std::fs;
use std::path::Path;

use crate::errors::*;
use crate::math::Matrix4;

use super::assets::prelude::*;
use super::system::VideoSystem;

/// A linked program built from a vertex stage and a fragment stage.
///
/// The program object is owned by this value and deleted when it drops. A program
/// whose construction failed still exists, with `ShaderStatus::Failed` and no
/// active uniforms, until it is dropped as well.
#[derive(Debug)]
pub struct ShaderProgram {
    video: VideoSystem,
    handle: ShaderHandle,
    report: ShaderReport,
}

impl ShaderProgram {
    /// Builds a program from two source texts. Compile and link failures are
    /// logged and kept as diagnostics; the returned program is then `Failed`.
    /// `Err` means the backend itself could not create the objects.
    pub fn compile(video: &VideoSystem, vs: &str, fs: &str) -> Result<Self> {
        let (handle, report) = video.create_shader(vs, fs)?;
        for v in &report.diagnostics {
            error!("{}", v);
        }

        Ok(ShaderProgram {
            video: video.clone(),
            handle,
            report,
        })
    }

    /// Builds a program from two source texts, failing with
    /// `Error::ShaderCreationFailure` unless both stages compile and link.
    pub fn new(video: &VideoSystem, vs: &str, fs: &str) -> Result<Self> {
        let program = Self::compile(video, vs, fs)?;
        if program.is_linked() {
            return Ok(program);
        }

        let msg = program
            .report
            .diagnostics
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        Err(Error::ShaderCreationFailure(msg))
    }

    /// Lenient construction from files. A file that can not be read is logged and
    /// compiled as an empty source, which then fails with a diagnostic.
    pub fn from_files<P1, P2>(video: &VideoSystem, vs: P1, fs: P2) -> Result<Self>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
    {
        let read = |path: &Path| {
            Self::load_source(path).unwrap_or_else(|err| {
                error!("{}", err);
                String::new()
            })
        };

        let vs = read(vs.as_ref());
        let fs = read(fs.as_ref());
        Self::compile(video, &vs, &fs)
    }

    /// Strict construction from files.
    pub fn load<P1, P2>(video: &VideoSystem, vs: P1, fs: P2) -> Result<Self>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
    {
        let vs = Self::load_source(vs)?;
        let fs = Self::load_source(fs)?;
        Self::new(video, &vs, &fs)
    }

    /// Reads a source text verbatim.
    pub fn load_source<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|err| {
            Error::Asset(format!(
                "Failed to read shader source {}: {}",
                path.display(),
                err
            ))
        })
    }

    #[inline]
    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    #[inline]
    pub fn status(&self) -> ShaderStatus {
        self.report.status
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.report.status == ShaderStatus::Linked
    }

    /// Compile and link messages gathered during construction.
    #[inline]
    pub fn diagnostics(&self) -> &[ShaderDiagnostic] {
        &self.report.diagnostics
    }

    /// Makes this the active program of its `VideoSystem`. Activating a failed
    /// program leaves the active slot untouched.
    pub fn activate(&self) -> Result<()> {
        if !self.is_linked() {
            warn!(
                "[ShaderProgram] {} failed to build and can not be activated.",
                self.handle
            );
            return Ok(());
        }

        self.video.bind_shader(self.handle)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.video.active_shader() == Some(self.handle)
    }

    /// Writes `variable` into the uniform `name` of this program, whether it is
    /// active or not. Returns false, and changes nothing, if there is no active
    /// uniform with that name.
    pub fn set_uniform<T>(&self, name: &str, variable: T) -> Result<bool>
    where
        T: Into<UniformVariable>,
    {
        let found = self.video.set_uniform(self.handle, name, variable.into())?;
        if !found {
            warn!(
                "[ShaderProgram] {} has no active uniform named {:?}.",
                self.handle, name
            );
        }

        Ok(found)
    }

    #[inline]
    pub fn set_mat4(&self, name: &str, v: Matrix4<f32>) -> Result<bool> {
        self.set_uniform(name, v)
    }

    #[inline]
    pub fn set_bool(&self, name: &str, v: bool) -> Result<bool> {
        self.set_uniform(name, v)
    }

    #[inline]
    pub fn set_int(&self, name: &str, v: i32) -> Result<bool> {
        self.set_uniform(name, v)
    }

    #[inline]
    pub fn set_float(&self, name: &str, v: f32) -> Result<bool> {
        self.set_uniform(name, v)
    }

    /// Reads back the current value of the uniform `name`, `None` if there is no
    /// such uniform.
    pub fn uniform(&self, name: &str, tp: UniformVariableType) -> Result<Option<UniformVariable>> {
        self.video.uniform(self.handle, name, tp)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if let Err(err) = self.video.delete_shader(self.handle) {
            warn!("[ShaderProgram] failed to delete {}: {}", self.handle, err);
        }
    }
}
