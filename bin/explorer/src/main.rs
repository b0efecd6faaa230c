use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{uvec2, vec3, Mat4, Vec2, Vec3};

use input::Input;
use rose_core::{
    assets,
    first_person::{FirstPersonCamera, MouseLook},
    geometry::{Corner, MeshBuilder},
    mesh::Mesh,
};
use rose_platform::{
    events::{VirtualKeyCode, WindowEvent},
    Application, Fullscreen, LogicalSize, PhysicalSize, RenderContext, TickContext,
    WindowBuilder,
};
use violette::{
    framebuffer::{ClearBuffer, DepthTestFunction, Framebuffer},
    program::Program,
    texture::{SampleMode, Texture, TextureWrap},
};
use violette_derive::VertexAttributes;

const MOVE_SPEED: f32 = 3.5;
const LIGHT_RADIUS: f32 = 2.2;
const LIGHT_HEIGHT: f32 = 1.8;
const CUBE_POSITION: Vec3 = Vec3::new(-1.25, 0.5, 0.);

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec3,
    normal: Vec3,
    uv: Vec2,
}

fn vertex(c: Corner) -> Vertex {
    Vertex {
        position: c.position,
        normal: c.normal,
        uv: c.uv,
    }
}

fn light_position(time: f32) -> Vec3 {
    let (s, c) = time.sin_cos();
    vec3(c * LIGHT_RADIUS, LIGHT_HEIGHT, s * LIGHT_RADIUS)
}

struct Explorer {
    program: Program,
    texture: Texture,
    cube: Mesh<Vertex>,
    plane: Mesh<Vertex>,
    camera: FirstPersonCamera,
    aspect: f32,
    time: f32,
    light_on: bool,
    look: MouseLook,
    input: Input,
}

impl Application for Explorer {
    const QUIT_ON_ESCAPE: bool = false;

    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(1600, 900))
            .with_fullscreen(Some(Fullscreen::Borderless(None)))
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let program = Program::load(
            assets::shader_path("explorer.vert.glsl"),
            assets::shader_path("explorer.frag.glsl"),
        )
        .context("Cannot load explorer shaders")?;
        program.set("uTex0", 0i32);

        let image = assets::load_image_or(assets::texture_path("checker.png"), || {
            assets::checkerboard(8, 32, 230, 60)
        });
        let texture = Texture::from_image(&image).context("Cannot upload checker texture")?;
        texture.set_wrap(TextureWrap::Repeat)?;
        texture.set_filter(SampleMode::LinearMipmapLinear, SampleMode::Linear)?;
        texture.generate_mipmaps()?;

        let builder = MeshBuilder::new(vertex);
        let cube = Mesh::new(&builder.cube())?;
        let plane = Mesh::new(&builder.plane(10.))?;

        let camera = FirstPersonCamera {
            position: vec3(0., 2., 5.),
            sensitivity: 0.08,
            far: 100.,
            ..Default::default()
        };

        let frame = Framebuffer::backbuffer();
        frame.clear_color(vec3(0.08, 0.09, 0.11));
        frame.enable_depth_test(DepthTestFunction::Less);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));

        Ok(Self {
            program,
            texture,
            cube,
            plane,
            camera,
            aspect: size.width / size.height.max(1.),
            time: 0.,
            light_on: true,
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
        let keyboard = &self.input.keyboard;

        if keyboard.just_pressed(VirtualKeyCode::Escape) {
            self.look.escape();
        }
        if keyboard.just_pressed(VirtualKeyCode::E) {
            self.light_on = !self.light_on;
            tracing::info!(light_on = self.light_on, "Toggled light");
        }

        let direction = self.camera.front() * keyboard.axis(VirtualKeyCode::S, VirtualKeyCode::W)
            + self.camera.right() * keyboard.axis(VirtualKeyCode::A, VirtualKeyCode::D)
            + self.camera.up() * keyboard.axis(VirtualKeyCode::LShift, VirtualKeyCode::Space);
        self.camera.position += direction * MOVE_SPEED * dt;

        if self.look.grabbed {
            let motion = self.input.mouse.motion();
            self.camera.process_mouse(motion.x, motion.y);
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
        let p = &self.program;
        p.set("uView", self.camera.view());
        p.set("uProj", self.camera.projection(self.aspect));
        p.set("uViewPos", self.camera.position);
        p.set("uLightPos", light_position(self.time));
        p.set("uLightOn", self.light_on);
        self.texture.bind_unit(0);

        p.set("uModel", Mat4::IDENTITY);
        self.plane.draw(p, &frame)?;
        p.set("uModel", Mat4::from_translation(CUBE_POSITION));
        self.cube.draw(p, &frame)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<Explorer>("Mini 3D Explorer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_orbits_at_fixed_height() {
        assert!(light_position(0.).abs_diff_eq(vec3(2.2, 1.8, 0.), 1e-6));
        let quarter = light_position(std::f32::consts::FRAC_PI_2);
        assert!(quarter.abs_diff_eq(vec3(0., 1.8, 2.2), 1e-5));
    }
}
