use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use eyre::{Context, Result};
use glam::{uvec2, vec2, vec3, Mat4, Vec3};

use rose_core::{
    assets,
    camera::Projection,
    geometry::Corner,
    mesh::Mesh,
    terrain::TerrainSettings,
};
use rose_platform::{Application, LogicalSize, PhysicalSize, RenderContext, WindowBuilder};
use violette::{
    framebuffer::{ClearBuffer, DepthTestFunction, Framebuffer},
    program::Program,
};
use violette_derive::VertexAttributes;

const FPS_REPORT_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec3,
    color: Vec3,
}

/// Model-view-projection at `t` seconds: the terrain tilts back and spins while the eye flies
/// towards it.
fn mvp(projection: &Projection, t: f32) -> Mat4 {
    let model = Mat4::from_rotation_x((-30f32).to_radians()) * Mat4::from_rotation_y(t * 0.25);
    let eye = vec3(0., 0.6, 2.8 - t * 0.15);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    projection.matrix() * view * model
}

struct TerrainApp {
    program: Program,
    mesh: Mesh<Vertex>,
    projection: Projection,
    frames: u32,
    last_report: Duration,
}

impl Application for TerrainApp {
    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(1280, 720))
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let heightmap = assets::load_heightmap(assets::asset_path("heightmap.png"));
        let data = heightmap.build(&TerrainSettings::default(), |c: Corner| Vertex {
            position: c.position,
            color: c.color,
        });
        let mesh = Mesh::new(&data)?;
        tracing::info!(vertices = data.vertices.len(), "Terrain ready");

        let program = Program::load(
            assets::shader_path("terrain.vert.glsl"),
            assets::shader_path("terrain.frag.glsl"),
        )
        .context("Cannot load terrain shaders")?;

        let mut projection = Projection {
            fovy: 60f32.to_radians(),
            zrange: 0.05..100.,
            ..Default::default()
        };
        projection.update(vec2(size.width, size.height));

        let frame = Framebuffer::backbuffer();
        frame.clear_color(vec3(0.08, 0.08, 0.11));
        frame.enable_depth_test(DepthTestFunction::Less);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));

        Ok(Self {
            program,
            mesh,
            projection,
            frames: 0,
            last_report: Duration::ZERO,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        self.projection
            .update(vec2(size.width as _, size.height as _));
        Framebuffer::backbuffer().viewport(0, 0, uvec2(size.width, size.height));
        Ok(())
    }

    fn render(&mut self, ctx: RenderContext) -> Result<()> {
        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR | ClearBuffer::DEPTH);
        self.program
            .set("uMVP", mvp(&self.projection, ctx.elapsed.as_secs_f32()));
        self.mesh.draw(&self.program, &frame)?;

        self.frames += 1;
        if ctx.elapsed.saturating_sub(self.last_report) >= FPS_REPORT_PERIOD {
            tracing::info!(fps = self.frames, average = ctx.stats.fps_average(), "FPS");
            self.frames = 0;
            self.last_report = ctx.elapsed;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<TerrainApp>("Terrain")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_in_view_at_start() {
        let mut projection = Projection {
            fovy: 60f32.to_radians(),
            zrange: 0.05..100.,
            ..Default::default()
        };
        projection.update(vec2(1280., 720.));
        let clip = mvp(&projection, 0.).project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1. && clip.z.abs() < 1.);
    }
}
