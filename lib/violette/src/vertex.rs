use std::{cell::Cell, marker::PhantomData, num::NonZeroU32};

use bytemuck::Pod;
use glam::{Vec2, Vec3, Vec4};

pub use once_cell::sync::Lazy;

use crate::{
    api::OpenGLError,
    buffer::{ArrayBuffer, ElementBuffer},
    thread_guard::ThreadGuard,
};

/// Scalar or vector type usable as a single vertex attribute.
pub trait AsVertexType {
    const COMPONENTS: usize;
    const GL_TYPE: u32;
}

macro_rules! vertex_type {
    ($($ty:ty => ($n:expr, $gl:expr)),* $(,)?) => {
        $(impl AsVertexType for $ty {
            const COMPONENTS: usize = $n;
            const GL_TYPE: u32 = $gl;
        })*
    };
}

vertex_type! {
    f32 => (1, gl::FLOAT),
    [f32; 2] => (2, gl::FLOAT),
    [f32; 3] => (3, gl::FLOAT),
    [f32; 4] => (4, gl::FLOAT),
    Vec2 => (2, gl::FLOAT),
    Vec3 => (3, gl::FLOAT),
    Vec4 => (4, gl::FLOAT),
    u32 => (1, gl::UNSIGNED_INT),
    i32 => (1, gl::INT),
    [u8; 4] => (4, gl::UNSIGNED_BYTE),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexDesc {
    pub offset: usize,
    pub components: usize,
    pub gl_type: u32,
    pub normalized: bool,
}

impl VertexDesc {
    pub fn from_gl_type<T: AsVertexType>(offset: usize) -> Self {
        Self {
            offset,
            components: T::COMPONENTS,
            gl_type: T::GL_TYPE,
            normalized: false,
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }

    /// Integer attributes that are not normalized are read as integers in the shader.
    pub fn is_integer(&self) -> bool {
        !self.normalized && matches!(self.gl_type, gl::UNSIGNED_INT | gl::INT)
    }
}

/// Layout of a vertex struct, usually implemented through `#[derive(VertexAttributes)]`.
pub trait VertexAttributes: Pod {
    fn attributes() -> &'static [VertexDesc];
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleFan,
}

impl DrawMode {
    pub(crate) fn gl_mode(self) -> u32 {
        match self {
            Self::Points => gl::POINTS,
            Self::Lines => gl::LINES,
            Self::LineStrip => gl::LINE_STRIP,
            Self::Triangles => gl::TRIANGLES,
            Self::TriangleFan => gl::TRIANGLE_FAN,
        }
    }
}

#[derive(Debug)]
struct VertexArrayImpl {
    id: NonZeroU32,
    next_location: Cell<u32>,
}

#[derive(Debug)]
pub struct VertexArray {
    __non_send: PhantomData<*mut ()>,
    inner: ThreadGuard<VertexArrayImpl>,
}

// Safety: the GL name is only reachable through the thread guard.
unsafe impl Send for VertexArray {}
unsafe impl Sync for VertexArray {}

impl VertexArray {
    pub fn new() -> Result<Self, OpenGLError> {
        let id = unsafe {
            let mut id = 0;
            gl::GenVertexArrays(1, &mut id);
            NonZeroU32::new(id).ok_or(OpenGLError::Creation("vertex array"))?
        };
        Ok(Self {
            __non_send: PhantomData,
            inner: ThreadGuard::new(VertexArrayImpl {
                id,
                next_location: Cell::new(0),
            }),
        })
    }

    pub fn id(&self) -> NonZeroU32 {
        self.inner.id
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id().get()) }
    }

    pub fn unbind(&self) {
        unsafe { gl::BindVertexArray(0) }
    }

    /// Attach a vertex buffer, enabling one attribute location per field of `V` starting after
    /// the attributes of previously attached buffers.
    pub fn with_vertex_buffer<V: VertexAttributes>(
        self,
        buffer: &ArrayBuffer<V>,
    ) -> Result<Self, OpenGLError> {
        self.bind();
        buffer.bind();
        let stride = std::mem::size_of::<V>() as i32;
        for desc in V::attributes() {
            let location = self.inner.next_location.get();
            tracing::trace!(message = "Vertex attribute", location, ?desc);
            unsafe {
                gl::EnableVertexAttribArray(location);
                if desc.is_integer() {
                    gl::VertexAttribIPointer(
                        location,
                        desc.components as _,
                        desc.gl_type,
                        stride,
                        desc.offset as *const _,
                    );
                } else {
                    gl::VertexAttribPointer(
                        location,
                        desc.components as _,
                        desc.gl_type,
                        if desc.normalized { gl::TRUE } else { gl::FALSE },
                        stride,
                        desc.offset as *const _,
                    );
                }
            }
            OpenGLError::guard()?;
            self.inner.next_location.set(location + 1);
        }
        self.unbind();
        buffer.unbind();
        Ok(self)
    }

    pub fn with_element_buffer(self, buffer: &ElementBuffer<u32>) -> Result<Self, OpenGLError> {
        self.bind();
        buffer.bind();
        OpenGLError::guard()?;
        // The element binding is VAO state, so only the VAO gets unbound.
        self.unbind();
        Ok(self)
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        match self.inner.get() {
            Some(inner) => unsafe { gl::DeleteVertexArrays(1, &inner.id.get()) },
            None => tracing::warn!("Vertex array dropped outside of the GL thread, leaking it"),
        }
    }
}
