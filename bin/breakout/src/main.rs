use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{uvec2, vec2, Vec2, Vec4};

use input::Input;
use rose_core::{
    assets,
    breakout::{Breakout, SCREEN_SIZE},
    camera::Orthographic,
    collision::Rect,
    geometry::{Corner, MeshBuilder},
    glyphs,
    mesh::Mesh,
};
use rose_platform::{
    events::{VirtualKeyCode, WindowEvent},
    Application, LogicalSize, PhysicalSize, RenderContext, TickContext, WindowBuilder,
};
use violette::{
    framebuffer::{Blend, ClearBuffer, Framebuffer},
    program::Program,
};
use violette_derive::VertexAttributes;

const BLUE: Vec4 = Vec4::new(0., 0.475, 0.945, 1.);
const YELLOW: Vec4 = Vec4::new(0.992, 0.976, 0., 1.);
const RED: Vec4 = Vec4::new(0.902, 0.161, 0.216, 1.);
const GRAY: Vec4 = Vec4::new(0.51, 0.51, 0.51, 1.);
const WHITE: Vec4 = Vec4::ONE;
const RAY_WHITE: Vec4 = Vec4::new(0.961, 0.961, 0.961, 1.);

const GAME_OVER_SIZE: f32 = 50.;
const HINT_SIZE: f32 = 20.;

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec2,
}

/// Top-left corner of `text` centred horizontally on the screen.
fn centered(text: &str, size: f32, y: f32) -> Vec2 {
    vec2((SCREEN_SIZE.x - glyphs::text_width(text, size)) / 2., y)
}

struct BreakoutApp {
    program: Program,
    quad: Mesh<Vertex>,
    game: Breakout,
    input: Input,
}

impl BreakoutApp {
    fn draw_rect(&self, frame: &Framebuffer, rect: &Rect, color: Vec4) -> Result<()> {
        self.program
            .set("uRect", rect.position.extend(rect.size.x).extend(rect.size.y));
        self.program.set("uColor", color);
        self.quad.draw(&self.program, frame)
    }

    fn draw_text(&self, frame: &Framebuffer, text: &str, at: Vec2, size: f32, color: Vec4) -> Result<()> {
        for rect in glyphs::layout(text, at, size) {
            self.draw_rect(frame, &rect, color)?;
        }
        Ok(())
    }
}

impl Application for BreakoutApp {
    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(SCREEN_SIZE.x, SCREEN_SIZE.y))
            .with_resizable(false)
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let program = Program::load(
            assets::shader_path("flat.vert.glsl"),
            assets::shader_path("flat.frag.glsl"),
        )
        .context("Cannot load flat shaders")?;
        program.set(
            "uProjection",
            Orthographic::pixels_y_down(SCREEN_SIZE).matrix(),
        );
        let quad = Mesh::new(
            &MeshBuilder::new(|c: Corner| Vertex {
                position: c.position.truncate(),
            })
            .quad(Vec2::splat(0.5)),
        )?;

        let frame = Framebuffer::backbuffer();
        frame.clear_color(glam::Vec3::ZERO);
        frame.enable_blend(Blend::Alpha);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));

        Ok(Self {
            program,
            quad,
            game: Breakout::new(),
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
        let keyboard = &self.input.keyboard;
        if self.game.game_over && keyboard.just_pressed(VirtualKeyCode::R) {
            self.game.restart();
        }
        let axis = keyboard.axis(VirtualKeyCode::Left, VirtualKeyCode::Right);
        self.game.update(ctx.dt.as_secs_f32(), axis);
        self.input.begin_frame();
        Ok(())
    }

    fn render(&mut self, _ctx: RenderContext) -> Result<()> {
        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR);

        self.program.set("uCircle", false);
        self.draw_rect(&frame, &self.game.paddle, BLUE)?;
        for brick in self.game.bricks.iter().filter(|b| !b.destroyed) {
            let color = if brick.solid { GRAY } else { RED };
            self.draw_rect(&frame, &brick.rect, color)?;
        }

        let ball = &self.game.ball;
        self.program.set("uCircle", true);
        self.draw_rect(
            &frame,
            &Rect::new(ball.center() - ball.radius, Vec2::splat(ball.radius * 2.)),
            YELLOW,
        )?;
        self.program.set("uCircle", false);

        self.draw_text(
            &frame,
            "2D Collision: AABB & Circle-AABB Demo",
            vec2(10., 10.),
            20.,
            WHITE,
        )?;
        self.draw_text(
            &frame,
            "Use LEFT/RIGHT to move the paddle",
            vec2(10., 40.),
            18.,
            WHITE,
        )?;

        if self.game.game_over {
            let message = "GAME OVER";
            let y = SCREEN_SIZE.y / 2. - GAME_OVER_SIZE;
            let at = centered(message, GAME_OVER_SIZE, y);
            self.draw_text(&frame, message, at, GAME_OVER_SIZE, RED)?;

            let hint = "Press R to restart";
            let at = centered(hint, HINT_SIZE, y + GAME_OVER_SIZE + 20.);
            self.draw_text(&frame, hint, at, HINT_SIZE, RAY_WHITE)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<BreakoutApp>("2D Collision - Breakout Prototype")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_over_is_centred() {
        let at = centered("GAME OVER", GAME_OVER_SIZE, 250.);
        let width = glyphs::text_width("GAME OVER", GAME_OVER_SIZE);
        assert!((at.x + width / 2. - 400.).abs() < 1e-3);
        assert_eq!(at.y, 250.);
    }
}
