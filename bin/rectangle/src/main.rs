use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{vec2, vec3, Vec3};

use rose_core::{
    geometry::{Corner, MeshBuilder},
    mesh::Mesh,
};
use rose_platform::{Application, LogicalSize, PhysicalSize, RenderContext, WindowBuilder};
use violette::{
    framebuffer::{ClearBuffer, Framebuffer},
    program::{Program, UniformLocation},
};
use violette_derive::VertexAttributes;

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec3,
}

struct RectangleApp {
    program: Program,
    u_color: Option<UniformLocation>,
    mesh: Mesh<Vertex>,
}

impl Application for RectangleApp {
    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(800, 600))
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let program = Program::load(
            "assets/shaders/rectangle.vert.glsl",
            "assets/shaders/rectangle.frag.glsl",
        )
        .context("Cannot load rectangle shaders")?;
        let data = MeshBuilder::new(|c: Corner| Vertex {
            position: c.position,
        })
        .quad(vec2(0.5, 0.5));
        let mesh = Mesh::new(&data)?;
        let frame = Framebuffer::backbuffer();
        frame.clear_color(vec3(0.1, 0.12, 0.15));
        frame.viewport(0, 0, glam::uvec2(size.width as _, size.height as _));
        Ok(Self {
            u_color: program.uniform("uColor"),
            program,
            mesh,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        Framebuffer::backbuffer().viewport(0, 0, glam::uvec2(size.width, size.height));
        Ok(())
    }

    fn render(&mut self, _ctx: RenderContext) -> Result<()> {
        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR);
        if let Some(loc) = self.u_color {
            self.program.set_uniform(loc, vec3(0.9, 0.4, 0.2));
        }
        self.mesh.draw(&self.program, &frame)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<RectangleApp>("OpenGL Rectangle")
}
