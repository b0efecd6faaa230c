use std::{cell::Cell, marker::PhantomData, num::NonZeroU32};

use bytemuck::Pod;

use crate::{api::OpenGLError, thread_guard::ThreadGuard};

pub type ArrayBuffer<T> = Buffer<T, { gl::ARRAY_BUFFER }>;
pub type ElementBuffer<T> = Buffer<T, { gl::ELEMENT_ARRAY_BUFFER }>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    Static,
    Dynamic,
    Stream,
}

impl BufferUsage {
    fn gl_usage(self) -> u32 {
        match self {
            Self::Static => gl::STATIC_DRAW,
            Self::Dynamic => gl::DYNAMIC_DRAW,
            Self::Stream => gl::STREAM_DRAW,
        }
    }
}

#[derive(Debug)]
struct BufferImpl {
    id: NonZeroU32,
    len: Cell<usize>,
}

/// Typed OpenGL buffer object bound to a fixed target.
#[derive(Debug)]
pub struct Buffer<T, const K: u32> {
    __type: PhantomData<T>,
    inner: ThreadGuard<BufferImpl>,
}

impl<T: Pod, const K: u32> Buffer<T, K> {
    pub fn new() -> Result<Self, OpenGLError> {
        let id = unsafe {
            let mut id = 0;
            gl::GenBuffers(1, &mut id);
            NonZeroU32::new(id).ok_or(OpenGLError::Creation("buffer"))?
        };
        Ok(Self {
            __type: PhantomData,
            inner: ThreadGuard::new(BufferImpl {
                id,
                len: Cell::new(0),
            }),
        })
    }

    pub fn with_data(data: &[T]) -> Result<Self, OpenGLError> {
        let this = Self::new()?;
        this.set_data(data, BufferUsage::Static)?;
        Ok(this)
    }

    pub fn set_data(&self, data: &[T], usage: BufferUsage) -> Result<(), OpenGLError> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.bind();
        unsafe {
            gl::BufferData(
                K,
                bytes.len() as _,
                bytes.as_ptr().cast(),
                usage.gl_usage(),
            );
        }
        OpenGLError::guard()?;
        self.inner.len.set(data.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const K: u32> Buffer<T, K> {
    pub fn id(&self) -> NonZeroU32 {
        self.inner.id
    }

    pub fn bind(&self) {
        tracing::trace!(message = "Bind buffer", id = self.id().get(), target = K);
        unsafe { gl::BindBuffer(K, self.id().get()) }
    }

    pub fn unbind(&self) {
        tracing::trace!(message = "Unbind buffer", id = self.id().get(), target = K);
        unsafe { gl::BindBuffer(K, 0) }
    }
}

impl<T, const K: u32> Drop for Buffer<T, K> {
    fn drop(&mut self) {
        match self.inner.get() {
            Some(inner) => unsafe { gl::DeleteBuffers(1, &inner.id.get()) },
            None => tracing::warn!("Buffer dropped outside of the GL thread, leaking it"),
        }
    }
}
