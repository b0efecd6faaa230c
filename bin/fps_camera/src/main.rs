use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{uvec2, vec3, Mat4, Vec2, Vec3};

use input::Input;
use rose_core::{
    first_person::{move_speed, FirstPersonCamera, MouseLook},
    geometry::{Corner, MeshBuilder, CRATE_PALETTE},
    mesh::Mesh,
    transform::Transform,
};
use rose_platform::{
    events::{VirtualKeyCode, WindowEvent},
    Application, LogicalSize, PhysicalSize, RenderContext, TickContext, WindowBuilder,
};
use violette::{
    framebuffer::{ClearBuffer, DepthTestFunction, Framebuffer},
    program::Program,
};
use violette_derive::VertexAttributes;

const MOVE_SPEED: f32 = 4.;
const SCROLL_ZOOM: f32 = 2.5;
const GRID_COLOR: Vec3 = Vec3::splat(0.5);
/// Position and spin rate (rad/s) of each crate.
const CRATES: [(Vec3, f32); 3] = [
    (Vec3::new(0., 0.5, 0.), 0.4),
    (Vec3::new(3., 0.5, 2.), -0.6),
    (Vec3::new(-4., 0.5, -3.), 0.3),
];

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec3,
    color: Vec3,
}

fn vertex(c: Corner) -> Vertex {
    Vertex {
        position: c.position,
        color: c.color,
    }
}

struct FpsCamera {
    program: Program,
    grid: Mesh<Vertex>,
    crate_mesh: Mesh<Vertex>,
    camera: FirstPersonCamera,
    aspect: f32,
    time: f32,
    look: MouseLook,
    input: Input,
}

impl FpsCamera {
    fn movement(&self) -> Vec3 {
        let keyboard = &self.input.keyboard;
        let axis = |neg, pos| keyboard.axis(neg, pos);
        self.camera.front() * axis(VirtualKeyCode::S, VirtualKeyCode::W)
            + self.camera.right() * axis(VirtualKeyCode::A, VirtualKeyCode::D)
            + self.camera.up() * axis(VirtualKeyCode::Q, VirtualKeyCode::E)
    }
}

impl Application for FpsCamera {
    const QUIT_ON_ESCAPE: bool = false;

    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(1280, 720))
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let program = Program::load(
            "assets/shaders/color_cube.vert.glsl",
            "assets/shaders/color_cube.frag.glsl",
        )
        .context("Cannot load color shaders")?;
        let builder = MeshBuilder::new(vertex);
        let grid = Mesh::new(&builder.grid(20, 10., 0., GRID_COLOR))?;
        let crate_mesh = Mesh::new(&builder.gradient_cube(&CRATE_PALETTE))?;

        let mut camera = FirstPersonCamera::new(vec3(0., 1.5, 6.));
        camera.look_at_target(vec3(0., 0.5, 0.));

        let frame = Framebuffer::backbuffer();
        frame.clear_color(vec3(0.07, 0.08, 0.12));
        frame.enable_depth_test(DepthTestFunction::Less);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));

        Ok(Self {
            program,
            grid,
            crate_mesh,
            camera,
            aspect: size.width / size.height.max(1.),
            time: 0.,
            look: MouseLook::grabbed(),
            input: Input::default(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        self.aspect = size.width as f32 / size.height.max(1) as f32;
        Framebuffer::backbuffer().viewport(0, 0, uvec2(size.width, size.height));
        Ok(())
    }

    fn interact(&mut self, event: &WindowEvent) -> Result<()> {
        self.input.apply_event(event);
        Ok(())
    }

    fn mouse_motion(&mut self, delta: Vec2) -> Result<()> {
        self.input.apply_motion(delta.x as _, delta.y as _);
        Ok(())
    }

    fn tick(&mut self, ctx: TickContext) -> Result<()> {
        let dt = ctx.dt.as_secs_f32();
        self.time += dt;

        if self.input.keyboard.just_pressed(VirtualKeyCode::Escape) {
            self.look.escape();
        }
        if self.input.keyboard.just_pressed(VirtualKeyCode::Tab) {
            self.look.toggle();
        }

        let speed = move_speed(MOVE_SPEED, self.input.keyboard.shift());
        self.camera.position += self.movement() * speed * dt;

        if self.look.grabbed {
            let motion = self.input.mouse.motion();
            if motion != Vec2::ZERO {
                self.camera.process_mouse(motion.x, motion.y);
            }
            let scroll = self.input.mouse.scroll();
            if scroll != 0. {
                self.camera.zoom(scroll * SCROLL_ZOOM);
            }
        }
        self.input.begin_frame();
        Ok(())
    }

    fn render(&mut self, mut ctx: RenderContext) -> Result<()> {
        if self.look.quit {
            ctx.quit();
            return Ok(());
        }
        if let Some(grab) = self.look.take_change() {
            ctx.set_cursor_grab(grab);
        }

        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR | ClearBuffer::DEPTH);
        self.program.set("uView", self.camera.view());
        self.program.set("uProj", self.camera.projection(self.aspect));

        self.program.set("uModel", Mat4::IDENTITY);
        self.grid.draw(&self.program, &frame)?;
        for (position, rate) in CRATES {
            let model = Transform::from_yaw(position, self.time * rate);
            self.program.set("uModel", model.matrix());
            self.crate_mesh.draw(&self.program, &frame)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<FpsCamera>("FPS Camera")
}
