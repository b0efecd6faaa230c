use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Error, FromPrimitive)]
#[repr(u32)]
pub enum GlErrorKind {
    #[error("Provided enum value is not valid")]
    InvalidEnum = gl::INVALID_ENUM,
    #[error("Provided value is not valid")]
    InvalidValue = gl::INVALID_VALUE,
    #[error("Invalid OpenGL operation")]
    InvalidOperation = gl::INVALID_OPERATION,
    #[error("Stack Overflow")]
    StackOverflow = gl::STACK_OVERFLOW,
    #[error("Stack Underflow")]
    StackUnderflow = gl::STACK_UNDERFLOW,
    #[error("Out of memory")]
    OutOfMemory = gl::OUT_OF_MEMORY,
    #[error("Invalid OpenGL operation on the framebuffer")]
    InvalidFramebufferOperation = gl::INVALID_FRAMEBUFFER_OPERATION,
    #[error("Context lost")]
    ContextLost = gl::CONTEXT_LOST,
    #[error("Unknown OpenGL error")]
    UnknownError,
}

impl GlErrorKind {
    pub fn from_code(code: gl::types::GLenum) -> Option<Self> {
        if code == gl::NO_ERROR {
            None
        } else {
            Some(Self::from_u32(code).unwrap_or(Self::UnknownError))
        }
    }

    pub fn current_error() -> Option<Self> {
        Self::from_code(unsafe { gl::GetError() })
    }
}

#[derive(Debug, Clone, Error)]
pub enum OpenGLError {
    #[error("OpenGL error: {0}")]
    Gl(#[from] GlErrorKind),
    #[error("Cannot compile {stage} shader:\n{info_log}")]
    Compile {
        stage: &'static str,
        info_log: String,
    },
    #[error("Cannot link program:\n{0}")]
    Link(String),
    #[error("Cannot create OpenGL {0} object")]
    Creation(&'static str),
    #[error("String passed to OpenGL contains a NUL byte")]
    NulByte,
    #[error("Data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

impl OpenGLError {
    pub fn current() -> Option<Self> {
        GlErrorKind::current_error().map(Self::from)
    }

    /// Returns the pending OpenGL error, if any, as an `Err`.
    pub fn guard() -> Result<(), Self> {
        match Self::current() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_error_codes() {
        assert_eq!(GlErrorKind::from_code(gl::NO_ERROR), None);
        assert_eq!(
            GlErrorKind::from_code(gl::INVALID_VALUE),
            Some(GlErrorKind::InvalidValue)
        );
        assert_eq!(
            GlErrorKind::from_code(gl::CONTEXT_LOST),
            Some(GlErrorKind::ContextLost)
        );
        assert_eq!(
            GlErrorKind::from_code(0xdead),
            Some(GlErrorKind::UnknownError)
        );
    }

    #[test]
    fn compile_error_carries_info_log() {
        let err = OpenGLError::Compile {
            stage: "fragment",
            info_log: "0:3(1): error: syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot compile fragment shader:\n0:3(1): error: syntax error"
        );
    }
}
