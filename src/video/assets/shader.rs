//! Plain data describing shader programs: stages, link status, diagnostics and
//! uniform variables.

use std::fmt;

use crate::math::Matrix4;
use crate::video::MAX_INFO_LOG_LEN;

impl_handle!(ShaderHandle);

/// One programmable step of the rasterization pipeline.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// The terminal state of program construction.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ShaderStatus {
    /// Both stages compiled and the program linked.
    Linked,
    /// A stage failed to compile or the link failed. The program object still
    /// exists but has no usable uniforms.
    Failed,
}

/// A human-readable message fetched from a failing compile or link step.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ShaderDiagnostic {
    /// The failing stage, or `None` for link failures.
    pub stage: Option<ShaderStage>,
    pub log: String,
}

impl ShaderDiagnostic {
    pub fn compile<T: Into<String>>(stage: ShaderStage, log: T) -> Self {
        ShaderDiagnostic {
            stage: Some(stage),
            log: truncate_log(log.into()),
        }
    }

    pub fn link<T: Into<String>>(log: T) -> Self {
        ShaderDiagnostic {
            stage: None,
            log: truncate_log(log.into()),
        }
    }
}

impl fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.stage {
            Some(stage) => write!(f, "Error compiling {} shader: {}", stage, self.log),
            None => write!(f, "Error linking shader program: {}", self.log),
        }
    }
}

/// Cuts `log` down to `MAX_INFO_LOG_LEN` bytes without splitting a character.
fn truncate_log(mut log: String) -> String {
    if log.len() > MAX_INFO_LOG_LEN {
        let mut end = MAX_INFO_LOG_LEN;
        while !log.is_char_boundary(end) {
            end -= 1;
        }

        log.truncate(end);
    }

    log
}

/// What a backend hands back after building a program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ShaderReport {
    pub status: ShaderStatus,
    pub diagnostics: Vec<ShaderDiagnostic>,
}

impl ShaderReport {
    pub fn from_diagnostics(diagnostics: Vec<ShaderDiagnostic>) -> Self {
        let status = if diagnostics.is_empty() {
            ShaderStatus::Linked
        } else {
            ShaderStatus::Failed
        };

        ShaderReport {
            status,
            diagnostics,
        }
    }
}

/// Uniform variable type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniformVariableType {
    Bool,
    I32,
    F32,
    Matrix4f,
}

/// Uniform variable for program object. Matrices are stored column-major, the same
/// way `cgmath` and GLSL lay them out, and are uploaded without transposition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformVariable {
    Bool(bool),
    I32(i32),
    F32(f32),
    Matrix4f([[f32; 4]; 4]),
}

impl UniformVariable {
    pub fn variable_type(&self) -> UniformVariableType {
        match *self {
            UniformVariable::Bool(_) => UniformVariableType::Bool,
            UniformVariable::I32(_) => UniformVariableType::I32,
            UniformVariable::F32(_) => UniformVariableType::F32,
            UniformVariable::Matrix4f(_) => UniformVariableType::Matrix4f,
        }
    }
}

impl From<bool> for UniformVariable {
    fn from(v: bool) -> Self {
        UniformVariable::Bool(v)
    }
}

impl From<i32> for UniformVariable {
    fn from(v: i32) -> Self {
        UniformVariable::I32(v)
    }
}

impl From<f32> for UniformVariable {
    fn from(v: f32) -> Self {
        UniformVariable::F32(v)
    }
}

impl From<Matrix4<f32>> for UniformVariable {
    fn from(v: Matrix4<f32>) -> Self {
        UniformVariable::Matrix4f(v.into())
    }
}

impl From<[[f32; 4]; 4]> for UniformVariable {
    fn from(v: [[f32; 4]; 4]) -> Self {
        UniformVariable::Matrix4f(v)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn report_status() {
        let report = ShaderReport::from_diagnostics(Vec::new());
        assert_eq!(report.status, ShaderStatus::Linked);

        let report =
            ShaderReport::from_diagnostics(vec![ShaderDiagnostic::link("missing main")]);
        assert_eq!(report.status, ShaderStatus::Failed);
    }

    #[test]
    fn truncated_diagnostic() {
        let log: String = ::std::iter::repeat('é').take(MAX_INFO_LOG_LEN).collect();
        let diagnostic = ShaderDiagnostic::compile(ShaderStage::Vertex, log);
        assert!(diagnostic.log.len() <= MAX_INFO_LOG_LEN);
        assert_eq!(diagnostic.log.chars().count(), MAX_INFO_LOG_LEN / 2);
    }

    #[test]
    fn matrix_is_column_major() {
        let m = Matrix4::from_translation(crate::math::Vector3::new(1.0, 2.0, 3.0));
        match UniformVariable::from(m) {
            UniformVariable::Matrix4f(v) => assert_eq!(v[3], [1.0, 2.0, 3.0, 1.0]),
            _ => unreachable!(),
        }
    }
}
