use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{uvec2, vec2, vec3, Mat4, Vec2, Vec3};

use input::Input;
use rose_core::{
    assets,
    camera::Projection,
    geometry::{Corner, MeshBuilder},
    mesh::Mesh,
};
use rose_platform::{
    events::{VirtualKeyCode, WindowEvent},
    Application, LogicalSize, PhysicalSize, RenderContext, TickContext, WindowBuilder,
};
use violette::{
    framebuffer::{ClearBuffer, DepthTestFunction, Framebuffer},
    program::Program,
    texture::Texture,
};
use violette_derive::VertexAttributes;

const SPIN_SPEED: f32 = 60.;
const TURN_SPEED: f32 = 120.;

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec3,
    uv: Vec2,
}

struct TexturedCube {
    program: Program,
    texture: Texture,
    mesh: Mesh<Vertex>,
    projection: Projection,
    view: Mat4,
    angle: f32,
    input: Input,
}

impl Application for TexturedCube {
    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(960, 600))
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let program = Program::load(
            "assets/shaders/textured_cube.vert.glsl",
            "assets/shaders/textured_cube.frag.glsl",
        )
        .context("Cannot load cube shaders")?;
        let texture = assets::load_texture_or_checker(assets::texture_path("texture.png"))?;
        let data = MeshBuilder::new(|c: Corner| Vertex {
            position: c.position,
            uv: c.uv,
        })
        .cube();
        let mesh = Mesh::new(&data)?;

        let mut projection = Projection {
            fovy: 60f32.to_radians(),
            zrange: 0.1..100.,
            ..Default::default()
        };
        projection.update(vec2(size.width, size.height));

        let frame = Framebuffer::backbuffer();
        frame.clear_color(vec3(0.1, 0.12, 0.15));
        frame.enable_depth_test(DepthTestFunction::Less);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));
        program.set("uTexture", 0i32);
        Ok(Self {
            program,
            texture,
            mesh,
            projection,
            view: Mat4::look_at_rh(vec3(2., 2., 3.), Vec3::ZERO, Vec3::Y),
            angle: 0.,
            input: Input::default(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        self.projection
            .update(vec2(size.width as _, size.height as _));
        Framebuffer::backbuffer().viewport(0, 0, uvec2(size.width, size.height));
        Ok(())
    }

    fn interact(&mut self, event: &WindowEvent) -> Result<()> {
        self.input.apply_event(event);
        Ok(())
    }

    fn tick(&mut self, ctx: TickContext) -> Result<()> {
        let dt = ctx.dt.as_secs_f32();
        let turn = self
            .input
            .keyboard
            .axis(VirtualKeyCode::Left, VirtualKeyCode::Right);
        self.angle += (SPIN_SPEED + turn * TURN_SPEED).to_radians() * dt;
        self.input.begin_frame();
        Ok(())
    }

    fn render(&mut self, _ctx: RenderContext) -> Result<()> {
        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR | ClearBuffer::DEPTH);
        let model = Mat4::from_rotation_x(0.25 * self.angle) * Mat4::from_rotation_y(self.angle);
        self.texture.bind_unit(0);
        self.program.set("uModel", model);
        self.program.set("uView", self.view);
        self.program.set("uProj", self.projection.matrix());
        self.mesh.draw(&self.program, &frame)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<TexturedCube>("Textured Cube")
}
