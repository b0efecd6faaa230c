use bitflags::bitflags;
use glam::{UVec2, Vec3, Vec4};

use crate::{
    api::OpenGLError, buffer::ElementBuffer, program::Program, vertex::DrawMode,
    vertex::VertexArray,
};

bitflags! {
    pub struct ClearBuffer: u32 {
        const COLOR = gl::COLOR_BUFFER_BIT;
        const DEPTH = gl::DEPTH_BUFFER_BIT;
        const STENCIL = gl::STENCIL_BUFFER_BIT;
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DepthTestFunction {
    Less,
    LessEqual,
    Always,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Blend {
    /// Classic `src_alpha, 1 - src_alpha` transparency.
    Alpha,
    /// `one, one`; glow sprites.
    Additive,
}

/// Handle to the default framebuffer of the current context.
#[derive(Debug, Copy, Clone)]
pub struct Framebuffer {
    _priv: (),
}

impl Framebuffer {
    pub const fn backbuffer() -> Self {
        Self { _priv: () }
    }

    pub fn clear_color(&self, color: Vec3) {
        self.clear_color_alpha(color.extend(1.0));
    }

    pub fn clear_color_alpha(&self, color: Vec4) {
        unsafe { gl::ClearColor(color.x, color.y, color.z, color.w) }
    }

    pub fn clear_depth(&self, depth: f64) {
        unsafe { gl::ClearDepth(depth) }
    }

    pub fn do_clear(&self, buffers: ClearBuffer) {
        unsafe { gl::Clear(buffers.bits()) }
    }

    pub fn viewport(&self, x: i32, y: i32, size: UVec2) {
        unsafe { gl::Viewport(x, y, size.x as _, size.y as _) }
    }

    pub fn enable_depth_test(&self, func: DepthTestFunction) {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::DepthFunc(match func {
                DepthTestFunction::Less => gl::LESS,
                DepthTestFunction::LessEqual => gl::LEQUAL,
                DepthTestFunction::Always => gl::ALWAYS,
            });
        }
    }

    pub fn disable_depth_test(&self) {
        unsafe { gl::Disable(gl::DEPTH_TEST) }
    }

    pub fn set_depth_write(&self, enabled: bool) {
        unsafe { gl::DepthMask(if enabled { gl::TRUE } else { gl::FALSE }) }
    }

    pub fn enable_blend(&self, blend: Blend) {
        unsafe {
            gl::Enable(gl::BLEND);
            match blend {
                Blend::Alpha => gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA),
                Blend::Additive => gl::BlendFunc(gl::ONE, gl::ONE),
            }
        }
    }

    pub fn disable_blend(&self) {
        unsafe { gl::Disable(gl::BLEND) }
    }

    pub fn draw_arrays(
        &self,
        program: &Program,
        vao: &VertexArray,
        mode: DrawMode,
        count: usize,
    ) -> Result<(), OpenGLError> {
        program.bind();
        vao.bind();
        unsafe { gl::DrawArrays(mode.gl_mode(), 0, count as _) }
        vao.unbind();
        OpenGLError::guard()
    }

    pub fn draw_elements(
        &self,
        program: &Program,
        vao: &VertexArray,
        indices: &ElementBuffer<u32>,
        mode: DrawMode,
    ) -> Result<(), OpenGLError> {
        program.bind();
        vao.bind();
        unsafe {
            gl::DrawElements(
                mode.gl_mode(),
                indices.len() as _,
                gl::UNSIGNED_INT,
                std::ptr::null(),
            );
        }
        vao.unbind();
        OpenGLError::guard()
    }
}

#[cfg(test)]
mod tests {
    use super::ClearBuffer;

    #[test]
    fn clear_bits_match_gl() {
        assert_eq!(
            (ClearBuffer::COLOR | ClearBuffer::DEPTH).bits(),
            gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT
        );
    }
}
