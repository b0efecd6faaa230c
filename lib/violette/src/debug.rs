use std::ffi::{c_void, CStr};

use gl::types::{GLchar, GLenum, GLsizei, GLuint};

extern "system" fn gl_debug_callback(
    source: GLenum,
    kind: GLenum,
    id: GLuint,
    severity: GLenum,
    length: GLsizei,
    message: *const GLchar,
    _user_data: *mut c_void,
) {
    if message.is_null() {
        return;
    }
    let message = if length < 0 {
        unsafe { CStr::from_ptr(message) }.to_string_lossy().to_string()
    } else {
        let bytes = unsafe { std::slice::from_raw_parts(message.cast::<u8>(), length as usize) };
        String::from_utf8_lossy(bytes).to_string()
    };
    match severity {
        gl::DEBUG_SEVERITY_HIGH => {
            tracing::error!(target: "gl", id, source, kind, "{}", message)
        }
        gl::DEBUG_SEVERITY_MEDIUM => {
            tracing::warn!(target: "gl", id, source, kind, "{}", message)
        }
        gl::DEBUG_SEVERITY_LOW => tracing::info!(target: "gl", id, source, kind, "{}", message),
        _ => tracing::trace!(target: "gl", id, source, kind, "{}", message),
    }
}

/// Forward driver debug messages to `tracing`. Returns `false` when the context has no debug
/// output support (needs GL 4.3 or `KHR_debug`).
pub fn hook_gl_to_tracing() -> bool {
    if !gl::DebugMessageCallback::is_loaded() {
        tracing::debug!(target: "gl", "Debug output unavailable");
        return false;
    }
    unsafe {
        gl::Enable(gl::DEBUG_OUTPUT);
        gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
        gl::DebugMessageCallback(Some(gl_debug_callback), std::ptr::null());
    }
    true
}
