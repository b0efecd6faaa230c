use std::ffi::{c_void, CStr};

pub use bytemuck;
pub use gl;

use crate::api::{GlErrorKind, OpenGLError};

pub mod api;
pub mod buffer;
pub mod debug;
pub mod framebuffer;
pub mod program;
pub mod shader;
pub mod texture;
pub mod thread_guard;
pub mod vertex;

/// Load OpenGL function pointers. Must be called once the context is current, before any other
/// function of this crate.
pub fn load_with(loader: impl FnMut(&'static str) -> *const c_void) {
    gl::load_with(loader);
}

pub fn get_string(name: gl::types::GLenum) -> Result<String, OpenGLError> {
    let ptr = unsafe { gl::GetString(name) };
    OpenGLError::guard()?;
    if ptr.is_null() {
        return Err(GlErrorKind::UnknownError.into());
    }
    let value = unsafe { CStr::from_ptr(ptr.cast()) };
    Ok(value.to_string_lossy().to_string())
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Cull {
    Front,
    Back,
    FrontAndBack,
}

pub fn culling(mode: Option<Cull>) {
    unsafe {
        match mode {
            None => gl::Disable(gl::CULL_FACE),
            Some(cull) => {
                gl::Enable(gl::CULL_FACE);
                gl::CullFace(match cull {
                    Cull::Front => gl::FRONT,
                    Cull::Back => gl::BACK,
                    Cull::FrontAndBack => gl::FRONT_AND_BACK,
                });
            }
        }
    }
}
