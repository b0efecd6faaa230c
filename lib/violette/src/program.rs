use std::{ffi::CString, fmt, num::NonZeroU32, path::Path};

use eyre::WrapErr;
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::{
    api::OpenGLError,
    shader::{Shader, ShaderStage},
    thread_guard::ThreadGuard,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(i32);

/// Value that can be written into a uniform of the currently bound program.
pub trait AsUniform {
    fn write(&self, location: UniformLocation);
}

impl AsUniform for f32 {
    fn write(&self, location: UniformLocation) {
        unsafe { gl::Uniform1f(location.0, *self) }
    }
}

impl AsUniform for i32 {
    fn write(&self, location: UniformLocation) {
        unsafe { gl::Uniform1i(location.0, *self) }
    }
}

impl AsUniform for u32 {
    fn write(&self, location: UniformLocation) {
        unsafe { gl::Uniform1ui(location.0, *self) }
    }
}

impl AsUniform for bool {
    fn write(&self, location: UniformLocation) {
        unsafe { gl::Uniform1i(location.0, *self as i32) }
    }
}

impl AsUniform for Vec2 {
    fn write(&self, location: UniformLocation) {
        unsafe { gl::Uniform2fv(location.0, 1, self.as_ref().as_ptr()) }
    }
}

impl AsUniform for Vec3 {
    fn write(&self, location: UniformLocation) {
        unsafe { gl::Uniform3fv(location.0, 1, self.as_ref().as_ptr()) }
    }
}

impl AsUniform for Vec4 {
    fn write(&self, location: UniformLocation) {
        unsafe { gl::Uniform4fv(location.0, 1, self.as_ref().as_ptr()) }
    }
}

impl AsUniform for Mat4 {
    fn write(&self, location: UniformLocation) {
        unsafe { gl::UniformMatrix4fv(location.0, 1, gl::FALSE, self.as_ref().as_ptr()) }
    }
}

pub struct Program {
    id: ThreadGuard<NonZeroU32>,
    shaders: Vec<Shader>,
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Program")
            .field(&self.id.get().map(|id| id.get()))
            .finish()
    }
}

impl Program {
    pub fn new() -> Result<Self, OpenGLError> {
        let id = unsafe {
            NonZeroU32::new(gl::CreateProgram()).ok_or(OpenGLError::Creation("program"))?
        };
        Ok(Self {
            id: ThreadGuard::new(id),
            shaders: vec![],
        })
    }

    fn raw(&self) -> u32 {
        (*self.id).get()
    }

    pub fn with_shader(mut self, shader: Shader) -> Self {
        unsafe { gl::AttachShader(self.raw(), shader.id()) }
        self.shaders.push(shader);
        self
    }

    /// Link the attached shaders. Shaders are detached and released once linked.
    pub fn link(mut self) -> Result<Self, OpenGLError> {
        let success = unsafe {
            gl::LinkProgram(self.raw());
            let mut status = 0;
            gl::GetProgramiv(self.raw(), gl::LINK_STATUS, &mut status);
            status as gl::types::GLboolean == gl::TRUE
        };
        if !success {
            let info_log = unsafe {
                let mut len = 0;
                gl::GetProgramiv(self.raw(), gl::INFO_LOG_LENGTH, &mut len);
                let mut buf = vec![0u8; len.max(1) as usize];
                let mut written = 0;
                gl::GetProgramInfoLog(
                    self.raw(),
                    buf.len() as _,
                    &mut written,
                    buf.as_mut_ptr().cast(),
                );
                buf.truncate(written.max(0) as usize);
                String::from_utf8_lossy(&buf).trim_end().to_string()
            };
            return Err(OpenGLError::Link(info_log));
        }
        for shader in self.shaders.drain(..) {
            unsafe { gl::DetachShader((*self.id).get(), shader.id()) }
        }
        Ok(self)
    }

    pub fn from_sources(vertex: &str, fragment: &str) -> Result<Self, OpenGLError> {
        Self::new()?
            .with_shader(Shader::new(ShaderStage::Vertex, vertex)?)
            .with_shader(Shader::new(ShaderStage::Fragment, fragment)?)
            .link()
    }

    #[tracing::instrument]
    pub fn load(vertex: impl AsRef<Path> + fmt::Debug, fragment: impl AsRef<Path> + fmt::Debug) -> eyre::Result<Self> {
        let vertex = Shader::load(ShaderStage::Vertex, vertex.as_ref())?;
        let fragment = Shader::load(ShaderStage::Fragment, fragment.as_ref())?;
        let program = Self::new()?
            .with_shader(vertex)
            .with_shader(fragment)
            .link()
            .context("Cannot link shader program")?;
        Ok(program)
    }

    pub fn bind(&self) {
        unsafe { gl::UseProgram(self.raw()) }
    }

    pub fn unbind(&self) {
        unsafe { gl::UseProgram(0) }
    }

    pub fn uniform(&self, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(self.raw(), name.as_ptr()) };
        (location >= 0).then_some(UniformLocation(location))
    }

    /// Binds the program and writes the value to the given location.
    pub fn set_uniform(&self, location: UniformLocation, value: impl AsUniform) {
        self.bind();
        value.write(location);
    }

    /// Set a uniform by name. Uniforms optimised away by the driver are silently skipped.
    pub fn set(&self, name: &str, value: impl AsUniform) {
        match self.uniform(name) {
            Some(location) => self.set_uniform(location, value),
            None => tracing::trace!(message = "Skipping inactive uniform", name),
        }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        match self.id.get() {
            Some(id) => unsafe { gl::DeleteProgram(id.get()) },
            None => tracing::warn!("Program dropped outside of the GL thread, leaking it"),
        }
    }
}
