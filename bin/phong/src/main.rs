use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{uvec2, vec2, vec3, Mat4, Vec2, Vec3};

use input::Input;
use rose_core::{
    assets::{self, PHONG_FRAG, PHONG_VERT},
    camera::Projection,
    geometry::{Corner, MeshBuilder},
    mesh::Mesh,
    orbit::OrbitCamera,
};
use rose_platform::{
    events::{MouseButton, VirtualKeyCode, WindowEvent},
    Application, PhysicalSize, RenderContext, TickContext,
};
use violette::{
    framebuffer::{Blend, ClearBuffer, DepthTestFunction, Framebuffer},
    program::Program,
};
use violette_derive::VertexAttributes;

const SPIN_SPEED: f32 = 90.;
const LIGHT_SPEED: f32 = 2.;
const DEFAULT_LIGHT: Vec3 = Vec3::new(2., 2., 2.);
const SUN_SIZE: f32 = 0.38;
const SUN_COLOR: Vec3 = Vec3::new(1., 0.92, 0.55);

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec3,
    normal: Vec3,
}

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct BillboardVertex {
    offset: Vec2,
}

/// Values driven by the keyboard, shown in the title.
#[derive(Debug, Clone, PartialEq)]
struct Lighting {
    position: Vec3,
    intensity: f32,
    shininess: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            position: DEFAULT_LIGHT,
            intensity: 1.,
            shininess: 32.,
        }
    }
}

impl Lighting {
    fn title(&self) -> String {
        let p = self.position;
        format!(
            "Phong Lighting | Light:({:.2}, {:.2}, {:.2}) | Intensity:{:.2} | Shininess:{:.0}",
            p.x, p.y, p.z, self.intensity, self.shininess
        )
    }
}

struct PhongApp {
    program: Program,
    sun_program: Program,
    cube: Mesh<Vertex>,
    sun: Mesh<BillboardVertex>,
    projection: Projection,
    orbit: OrbitCamera,
    /// Object yaw and pitch, radians.
    rotation: Vec2,
    lighting: Lighting,
    time: f32,
    title: String,
    input: Input,
}

impl PhongApp {
    fn handle_keys(&mut self, dt: f32) {
        let keyboard = &self.input.keyboard;
        if keyboard.is_pressed(VirtualKeyCode::R) {
            self.orbit.reset();
            self.rotation = Vec2::ZERO;
        }

        let spin = SPIN_SPEED.to_radians() * dt;
        self.rotation.x += keyboard.axis(VirtualKeyCode::Left, VirtualKeyCode::Right) * spin;
        self.rotation.y += keyboard.axis(VirtualKeyCode::Up, VirtualKeyCode::Down) * spin;

        let light = &mut self.lighting;
        light.position += vec3(
            keyboard.axis(VirtualKeyCode::K, VirtualKeyCode::I),
            keyboard.axis(VirtualKeyCode::O, VirtualKeyCode::U),
            keyboard.axis(VirtualKeyCode::L, VirtualKeyCode::J),
        ) * LIGHT_SPEED
            * dt;

        let intensity = keyboard.axis(VirtualKeyCode::LBracket, VirtualKeyCode::RBracket);
        light.intensity = (light.intensity + intensity * 1.5 * dt).clamp(0., 8.);

        let shininess = keyboard.axis(VirtualKeyCode::Minus, VirtualKeyCode::Equals)
            + keyboard.axis(VirtualKeyCode::NumpadSubtract, VirtualKeyCode::NumpadAdd);
        light.shininess = (light.shininess + shininess.clamp(-1., 1.) * 40. * dt).clamp(1., 256.);
    }
}

impl Application for PhongApp {
    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let vert = assets::shader_path("phong.vert.glsl");
        let frag = assets::shader_path("phong.frag.glsl");
        assets::ensure_shader_files(&vert, &frag, PHONG_VERT, PHONG_FRAG)?;
        let program = Program::load(&vert, &frag).context("Cannot load Phong shaders")?;
        let sun_program = Program::load(
            assets::shader_path("sun.vert.glsl"),
            assets::shader_path("sun.frag.glsl"),
        )
        .context("Cannot load sun shaders")?;

        let cube = Mesh::new(
            &MeshBuilder::new(|c: Corner| Vertex {
                position: c.position,
                normal: c.normal,
            })
            .cube(),
        )?;
        let sun = Mesh::new(
            &MeshBuilder::new(|c: Corner| BillboardVertex {
                offset: c.position.truncate(),
            })
            .billboard(),
        )?;

        let mut projection = Projection {
            fovy: 45f32.to_radians(),
            zrange: 0.1..100.,
            ..Default::default()
        };
        projection.update(vec2(size.width, size.height));

        let frame = Framebuffer::backbuffer();
        frame.clear_color(vec3(0.07, 0.08, 0.11));
        frame.enable_depth_test(DepthTestFunction::Less);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));

        Ok(Self {
            program,
            sun_program,
            cube,
            sun,
            projection,
            orbit: OrbitCamera::default(),
            rotation: Vec2::ZERO,
            lighting: Lighting::default(),
            time: 0.,
            title: String::new(),
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
        self.time += dt;
        self.handle_keys(dt);
        if self.input.mouse.state.is_pressed(&MouseButton::Left) {
            self.orbit.drag(self.input.mouse.delta());
        }
        self.orbit.scroll(self.input.mouse.scroll());
        self.input.begin_frame();
        Ok(())
    }

    fn render(&mut self, ctx: RenderContext) -> Result<()> {
        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR | ClearBuffer::DEPTH);

        let view = self.orbit.view();
        let projection = self.projection.matrix();
        let model = Mat4::from_rotation_y(self.rotation.x) * Mat4::from_rotation_x(self.rotation.y);
        let light = &self.lighting;

        let p = &self.program;
        p.set("model", model);
        p.set("view", view);
        p.set("projection", projection);
        p.set("lightPos", light.position);
        p.set("viewPos", self.orbit.eye());
        p.set("lightColor", Vec3::ONE);
        p.set("objectColor", vec3(1., 0.8, 0.6));
        p.set("ambientStrength", 0.12f32);
        p.set("specularStrength", 0.5f32);
        p.set("shininess", light.shininess);
        p.set("lightIntensity", light.intensity);
        p.set("attConst", 1f32);
        p.set("attLinear", 0.12f32);
        p.set("attQuad", 0.032f32);
        p.set("rimStrength", 0.25f32);
        p.set("rimPower", 2f32);
        p.set("enableGamma", true);
        self.cube.draw(p, &frame)?;

        let (right, up) = self.orbit.billboard_basis();
        let sun = &self.sun_program;
        sun.set("lightPos", light.position);
        sun.set("view", view);
        sun.set("projection", projection);
        sun.set("size", SUN_SIZE);
        sun.set("sunColor", SUN_COLOR);
        sun.set("intensity", light.intensity);
        sun.set("time", self.time);
        sun.set("camRight", right);
        sun.set("camUp", up);
        frame.enable_blend(Blend::Additive);
        frame.set_depth_write(false);
        let result = self.sun.draw(sun, &frame);
        frame.set_depth_write(true);
        frame.disable_blend();
        result?;

        let title = light.title();
        if title != self.title {
            ctx.set_title(&title);
            self.title = title;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<PhongApp>("Phong Lighting")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_format() {
        let lighting = Lighting {
            position: vec3(2., 2.5, -1.),
            intensity: 1.234,
            shininess: 31.6,
        };
        assert_eq!(
            lighting.title(),
            "Phong Lighting | Light:(2.00, 2.50, -1.00) | Intensity:1.23 | Shininess:32"
        );
    }
}
