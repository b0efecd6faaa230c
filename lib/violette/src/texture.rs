use std::{cell::Cell, fmt, num::NonZeroU32};

use image::RgbaImage;

use crate::{api::OpenGLError, thread_guard::ThreadGuard};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl TextureWrap {
    fn gl_value(self) -> i32 {
        (match self {
            Self::Repeat => gl::REPEAT,
            Self::ClampToEdge => gl::CLAMP_TO_EDGE,
            Self::MirroredRepeat => gl::MIRRORED_REPEAT,
        }) as i32
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SampleMode {
    Nearest,
    Linear,
    /// Trilinear; only meaningful as a minifying filter once mipmaps exist.
    LinearMipmapLinear,
}

impl SampleMode {
    fn gl_value(self) -> i32 {
        (match self {
            Self::Nearest => gl::NEAREST,
            Self::Linear => gl::LINEAR,
            Self::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
        }) as i32
    }
}

/// 2D RGBA8 texture.
pub struct Texture {
    id: ThreadGuard<NonZeroU32>,
    size: Cell<(u32, u32)>,
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id.get().map(|id| id.get()))
            .field("size", &self.size.get())
            .finish()
    }
}

impl Texture {
    /// Allocate an uninitialized texture.
    pub fn new(width: u32, height: u32) -> Result<Self, OpenGLError> {
        let id = unsafe {
            let mut id = 0;
            gl::GenTextures(1, &mut id);
            NonZeroU32::new(id).ok_or(OpenGLError::Creation("texture"))?
        };
        let this = Self {
            id: ThreadGuard::new(id),
            size: Cell::new((width, height)),
        };
        this.upload(width, height, gl::RGBA, std::ptr::null())?;
        Ok(this)
    }

    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self, OpenGLError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(OpenGLError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let this = Self::new(width, height)?;
        this.upload(width, height, gl::RGBA, data.as_ptr().cast())?;
        Ok(this)
    }

    pub fn from_image(image: &RgbaImage) -> Result<Self, OpenGLError> {
        Self::from_rgba8(image.width(), image.height(), image.as_raw())
    }

    fn raw(&self) -> u32 {
        (*self.id).get()
    }

    fn upload(
        &self,
        width: u32,
        height: u32,
        format: u32,
        data: *const std::ffi::c_void,
    ) -> Result<(), OpenGLError> {
        self.bind();
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as _,
                width as _,
                height as _,
                0,
                format,
                gl::UNSIGNED_BYTE,
                data,
            );
        }
        self.size.set((width, height));
        OpenGLError::guard()
    }

    /// Replace the whole image with tightly packed BGRA bytes.
    pub fn update_bgra(&self, data: &[u8]) -> Result<(), OpenGLError> {
        let (width, height) = self.size();
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(OpenGLError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        self.bind();
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexSubImage2D(
                gl::TEXTURE_2D,
                0,
                0,
                0,
                width as _,
                height as _,
                gl::BGRA,
                gl::UNSIGNED_BYTE,
                data.as_ptr().cast(),
            );
        }
        OpenGLError::guard()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size.get()
    }

    pub fn bind(&self) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, self.raw()) }
    }

    pub fn unbind(&self) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, 0) }
    }

    pub fn bind_unit(&self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) }
        self.bind();
    }

    pub fn set_wrap(&self, wrap: TextureWrap) -> Result<(), OpenGLError> {
        self.bind();
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap.gl_value());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap.gl_value());
        }
        OpenGLError::guard()
    }

    pub fn set_filter(&self, min: SampleMode, mag: SampleMode) -> Result<(), OpenGLError> {
        self.bind();
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min.gl_value());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag.gl_value());
        }
        OpenGLError::guard()
    }

    pub fn generate_mipmaps(&self) -> Result<(), OpenGLError> {
        self.bind();
        unsafe { gl::GenerateMipmap(gl::TEXTURE_2D) }
        OpenGLError::guard()
    }

    /// Read back the base level as RGBA8.
    pub fn download_rgba(&self) -> Result<Vec<u8>, OpenGLError> {
        let (width, height) = self.size();
        let mut data = vec![0u8; width as usize * height as usize * 4];
        self.bind();
        unsafe {
            gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
            gl::GetTexImage(
                gl::TEXTURE_2D,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                data.as_mut_ptr().cast(),
            );
        }
        OpenGLError::guard()?;
        Ok(data)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        match self.id.get() {
            Some(id) => unsafe { gl::DeleteTextures(1, &id.get()) },
            None => tracing::warn!("Texture dropped outside of the GL thread, leaking it"),
        }
    }
}
