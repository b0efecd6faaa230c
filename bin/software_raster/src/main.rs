use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{uvec2, vec2, Vec2};

use input::Input;
use rose_core::{
    assets,
    geometry::{Corner, MeshBuilder},
    mesh::Mesh,
    raster::{Exercise, RasterDemo, ViewControls},
};
use rose_platform::{
    events::{VirtualKeyCode, WindowEvent},
    Application, LogicalSize, PhysicalSize, RenderContext, TickContext, WindowBuilder,
};
use violette::{
    framebuffer::{ClearBuffer, Framebuffer},
    program::Program,
    texture::{SampleMode, Texture, TextureWrap},
};
use violette_derive::VertexAttributes;

const WIDTH: usize = 800;
const HEIGHT: usize = 600;
const EXERCISE_KEYS: [VirtualKeyCode; 4] = [
    VirtualKeyCode::Key1,
    VirtualKeyCode::Key2,
    VirtualKeyCode::Key3,
    VirtualKeyCode::Key4,
];

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec2,
    uv: Vec2,
}

struct SoftwareRaster {
    program: Program,
    texture: Texture,
    quad: Mesh<Vertex>,
    demo: RasterDemo,
    input: Input,
}

impl SoftwareRaster {
    fn controls(&self) -> ViewControls {
        let keyboard = &self.input.keyboard;
        ViewControls {
            zoom_in: keyboard.is_pressed(VirtualKeyCode::Z),
            zoom_out: keyboard.is_pressed(VirtualKeyCode::X),
            pan: vec2(
                keyboard.axis(VirtualKeyCode::Left, VirtualKeyCode::Right),
                keyboard.axis(VirtualKeyCode::Down, VirtualKeyCode::Up),
            ),
            reset: keyboard.is_pressed(VirtualKeyCode::R),
        }
    }
}

impl Application for SoftwareRaster {
    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(WIDTH as u32, HEIGHT as u32))
            .with_resizable(false)
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let program = Program::load(
            assets::shader_path("screen.vert.glsl"),
            assets::shader_path("screen.frag.glsl"),
        )
        .context("Cannot load screen shaders")?;
        program.set("uTexture", 0i32);

        let texture = Texture::new(WIDTH as _, HEIGHT as _)?;
        texture.set_filter(SampleMode::Nearest, SampleMode::Nearest)?;
        texture.set_wrap(TextureWrap::ClampToEdge)?;

        let quad = Mesh::new(
            &MeshBuilder::new(|c: Corner| Vertex {
                position: c.position.truncate(),
                uv: c.uv,
            })
            .fullscreen_quad(),
        )?;

        let frame = Framebuffer::backbuffer();
        frame.clear_color(glam::Vec3::ZERO);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));

        Ok(Self {
            program,
            texture,
            quad,
            demo: RasterDemo::new(WIDTH, HEIGHT),
            input: Input::default(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        Framebuffer::backbuffer().viewport(0, 0, uvec2(size.width, size.height));
        Ok(())
    }

    fn interact(&mut self, event: &WindowEvent) -> Result<()> {
        self.input.apply_event(event);
        Ok(())
    }

    fn tick(&mut self, ctx: TickContext) -> Result<()> {
        let selected = EXERCISE_KEYS
            .iter()
            .zip(1..)
            .filter(|(key, _)| self.input.keyboard.just_pressed(**key))
            .find_map(|(_, n)| Exercise::from_number(n));
        if let Some(exercise) = selected {
            self.demo.select(exercise);
        }
        let controls = self.controls();
        self.demo.update(ctx.dt.as_secs_f32(), controls);
        self.input.begin_frame();
        Ok(())
    }

    fn render(&mut self, _ctx: RenderContext) -> Result<()> {
        self.demo.draw();
        self.texture.update_bgra(&self.demo.surface.to_bgra())?;

        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR);
        self.texture.bind_unit(0);
        self.quad.draw(&self.program, &frame)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<SoftwareRaster>("Software Rasterizer")
}
