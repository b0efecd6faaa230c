use std::{ffi::CString, fmt, num::NonZeroU32, path::Path};

use eyre::WrapErr;
use num_derive::FromPrimitive;

use crate::{api::OpenGLError, thread_guard::ThreadGuard};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromPrimitive)]
#[repr(u32)]
pub enum ShaderStage {
    Vertex = gl::VERTEX_SHADER,
    Fragment = gl::FRAGMENT_SHADER,
    Geometry = gl::GEOMETRY_SHADER,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
        }
    }
}

pub struct Shader {
    stage: ShaderStage,
    id: ThreadGuard<NonZeroU32>,
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("stage", &self.stage)
            .field("id", &self.id.get().map(|id| id.get()))
            .finish()
    }
}

impl Shader {
    /// Create and compile a shader from source. Compile failures carry the driver info log.
    pub fn new(stage: ShaderStage, source: &str) -> Result<Self, OpenGLError> {
        let source = CString::new(source).map_err(|_| OpenGLError::NulByte)?;
        let id = unsafe {
            NonZeroU32::new(gl::CreateShader(stage as _))
                .ok_or(OpenGLError::Creation("shader"))?
        };
        let this = Self {
            stage,
            id: ThreadGuard::new(id),
        };
        unsafe {
            gl::ShaderSource(this.id(), 1, &source.as_ptr(), std::ptr::null());
        }
        this.compile()?;
        Ok(this)
    }

    #[tracing::instrument]
    pub fn load(stage: ShaderStage, path: &Path) -> eyre::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {} shader {}", stage.name(), path.display()))?;
        Self::new(stage, &source)
            .with_context(|| format!("Cannot compile shader {}", path.display()))
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub(crate) fn id(&self) -> u32 {
        (*self.id).get()
    }

    fn compile(&self) -> Result<(), OpenGLError> {
        let success = unsafe {
            gl::CompileShader(self.id());
            let mut status = 0;
            gl::GetShaderiv(self.id(), gl::COMPILE_STATUS, &mut status);
            status as gl::types::GLboolean == gl::TRUE
        };
        if success {
            return Ok(());
        }
        let info_log = unsafe {
            let mut len = 0;
            gl::GetShaderiv(self.id(), gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            let mut written = 0;
            gl::GetShaderInfoLog(self.id(), buf.len() as _, &mut written, buf.as_mut_ptr().cast());
            buf.truncate(written.max(0) as usize);
            String::from_utf8_lossy(&buf).trim_end().to_string()
        };
        Err(OpenGLError::Compile {
            stage: self.stage.name(),
            info_log,
        })
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        match self.id.get() {
            Some(id) => unsafe { gl::DeleteShader(id.get()) },
            None => tracing::warn!("Shader dropped outside of the GL thread, leaking it"),
        }
    }
}
