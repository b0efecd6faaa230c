use rose_platform::PhysicalSize;
use violette::{api::OpenGLError, program::Program};

use crate::tests::IntegrationTest;

const VERTEX: &str = "#version 330 core
layout(location = 0) in vec2 aPosition;
void main() { gl_Position = vec4(aPosition, 0.0, 1.0); }
";

const FRAGMENT: &str = "#version 330 core
out vec4 FragColor;
uniform vec4 uColor;
void main() { FragColor = uColor; }
";

fn test_compile_error(_: PhysicalSize<f32>) {
    let err = Program::from_sources(VERTEX, "#version 330 core\nvoid main() { oops }").unwrap_err();
    match err {
        OpenGLError::Compile { stage, info_log } => {
            assert_eq!(stage, "fragment");
            assert!(!info_log.is_empty());
        }
        other => panic!("Expected a compile error, got {other}"),
    }
}

fn test_uniform_lookup(_: PhysicalSize<f32>) {
    let program = Program::from_sources(VERTEX, FRAGMENT).unwrap();
    assert!(program.uniform("uColor").is_some());
    assert!(program.uniform("uMissing").is_none());
}

fn test_default_phong_shaders_link(_: PhysicalSize<f32>) {
    Program::from_sources(rose_core::assets::PHONG_VERT, rose_core::assets::PHONG_FRAG).unwrap();
}

inventory::submit!(IntegrationTest {
    name: "Shader compile error",
    test_fn: test_compile_error,
});

inventory::submit!(IntegrationTest {
    name: "Uniform lookup",
    test_fn: test_uniform_lookup,
});

inventory::submit!(IntegrationTest {
    name: "Default Phong shaders link",
    test_fn: test_default_phong_shaders_link,
});
