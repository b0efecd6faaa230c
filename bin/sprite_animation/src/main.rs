use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{uvec2, vec3, Mat4, Vec2, Vec4};

use input::{Input, KeyboardInput};
use rose_core::{
    assets,
    camera::Orthographic,
    geometry::{Corner, MeshBuilder},
    mesh::Mesh,
    sprite::{Character, MovementInput, SpriteSheet},
};
use rose_platform::{
    events::{VirtualKeyCode, WindowEvent},
    Application, LogicalSize, PhysicalSize, RenderContext, TickContext, WindowBuilder,
};
use violette::{
    framebuffer::{Blend, ClearBuffer, Framebuffer},
    program::Program,
    texture::{SampleMode, Texture, TextureWrap},
};
use violette_derive::VertexAttributes;

const SCREEN: Vec2 = Vec2::new(800., 600.);
/// Half of the on-screen sprite size.
const HALF_SIZE: Vec2 = Vec2::new(32., 64.);

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec2,
    uv: Vec2,
}

struct SpriteAnimation {
    program: Program,
    texture: Texture,
    quad: Mesh<Vertex>,
    character: Character,
    input: Input,
}

impl Application for SpriteAnimation {
    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(SCREEN.x, SCREEN.y))
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let program = Program::load(
            assets::shader_path("sprite.vert.glsl"),
            assets::shader_path("sprite.frag.glsl"),
        )
        .context("Cannot load sprite shaders")?;

        let image = assets::load_image_or(assets::texture_path("Sprite_Character.png"), || {
            assets::generated_sprite_sheet(&SpriteSheet::CHARACTER)
        });
        let texture = Texture::from_image(&image).context("Cannot upload sprite sheet")?;
        texture.set_filter(SampleMode::Nearest, SampleMode::Nearest)?;
        texture.set_wrap(TextureWrap::ClampToEdge)?;

        let quad = Mesh::new(
            &MeshBuilder::new(|c: Corner| Vertex {
                position: c.position.truncate(),
                uv: c.uv,
            })
            .quad(HALF_SIZE),
        )?;

        program.set("uTexture", 0i32);
        program.set("projection", Orthographic::pixels(SCREEN).matrix());

        let frame = Framebuffer::backbuffer();
        frame.clear_color_alpha(Vec4::ZERO);
        frame.enable_blend(Blend::Alpha);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));

        Ok(Self {
            program,
            texture,
            quad,
            character: Character::default(),
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
        let input = movement_input(&self.input.keyboard);
        self.character.update(ctx.dt.as_secs_f32(), input);
        self.input.begin_frame();
        Ok(())
    }

    fn render(&mut self, _ctx: RenderContext) -> Result<()> {
        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR);
        let position = self.character.position();
        let uv = self.character.frame_uv();
        self.program.set(
            "model",
            Mat4::from_translation(vec3(position.x, position.y, 0.)),
        );
        self.program.set("uOffset", uv.offset);
        self.program.set("uSize", uv.size);
        self.texture.bind_unit(0);
        self.quad.draw(&self.program, &frame)?;
        Ok(())
    }
}

/// Jumps on the Space press edge only; holding it does not jump again on landing.
fn movement_input(keyboard: &KeyboardInput) -> MovementInput {
    MovementInput {
        axis: keyboard.axis(VirtualKeyCode::Left, VirtualKeyCode::Right),
        sprint: keyboard.shift(),
        jump: keyboard.just_pressed(VirtualKeyCode::Space),
    }
}

fn main() -> Result<()> {
    rose_platform::run::<SpriteAnimation>("Sprite Animation")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holding_space_jumps_once() {
        let mut keyboard = KeyboardInput::default();
        let mut character = Character::default();
        keyboard.state.set(VirtualKeyCode::Space);

        let mut takeoffs = 0;
        for _ in 0..(3 * 240) {
            let grounded = character.movement.grounded;
            character.update(1. / 240., movement_input(&keyboard));
            if grounded && !character.movement.grounded {
                takeoffs += 1;
            }
            keyboard.begin_frame();
        }
        assert_eq!(takeoffs, 1);
        assert!(character.movement.grounded);
    }

    #[test]
    fn shift_sprints() {
        let mut keyboard = KeyboardInput::default();
        keyboard.state.set(VirtualKeyCode::Right);
        keyboard.state.set(VirtualKeyCode::LShift);
        let input = movement_input(&keyboard);
        assert_eq!(input.axis, 1.);
        assert!(input.sprint);
        assert!(!input.jump);
    }
}
