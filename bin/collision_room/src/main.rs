use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use eyre::{eyre, Context, Result};
use glam::{uvec2, vec2, vec3, Vec2, Vec3};

use input::Input;
use rose_core::{
    assets,
    first_person::FirstPersonCamera,
    geometry::{Corner, MeshBuilder},
    mesh::Mesh,
    scene::{ObjectKind, PlayerController, Scene},
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

const EYE_HEIGHT: Vec3 = Vec3::new(0., 1.7, 0.);
const KINDS: [ObjectKind; 5] = [
    ObjectKind::Floor,
    ObjectKind::Wall,
    ObjectKind::Box,
    ObjectKind::Npc,
    ObjectKind::Door,
];

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec3,
    uv: Vec2,
}

/// Texture file and UV tiling per object kind.
fn material(kind: ObjectKind) -> (&'static str, Vec2) {
    match kind {
        ObjectKind::Floor => ("floor.png", vec2(8., 8.)),
        ObjectKind::Wall => ("wall.png", vec2(4., 2.)),
        ObjectKind::Box => ("box.png", Vec2::ONE),
        ObjectKind::Npc => ("npc.png", Vec2::ONE),
        ObjectKind::Door => ("door.png", vec2(1., 2.)),
    }
}

struct CollisionRoom {
    program: Program,
    cube: Mesh<Vertex>,
    textures: HashMap<ObjectKind, Texture>,
    scene: Scene,
    player: PlayerController,
    camera: FirstPersonCamera,
    aspect: f32,
    grab_pending: bool,
    input: Input,
}

impl Application for CollisionRoom {
    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb.with_inner_size(LogicalSize::new(1280, 720))
    }

    #[tracing::instrument(skip_all)]
    fn new(size: PhysicalSize<f32>) -> Result<Self> {
        let program = Program::load(
            assets::shader_path("room.vert.glsl"),
            assets::shader_path("room.frag.glsl"),
        )
        .context("Cannot load room shaders")?;
        program.set("texture0", 0i32);

        let cube = Mesh::new(
            &MeshBuilder::new(|c: Corner| Vertex {
                position: c.position,
                uv: c.uv,
            })
            .unindexed_cube(),
        )?;
        let textures = KINDS
            .into_iter()
            .map(|kind| {
                let (file, _) = material(kind);
                Ok((kind, assets::load_texture_or_checker(assets::texture_path(file))?))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        let player = PlayerController::new(vec3(0., 0., 3.));
        let camera = FirstPersonCamera {
            position: player.position + EYE_HEIGHT,
            pitch: -10.,
            far: 100.,
            ..Default::default()
        };

        let frame = Framebuffer::backbuffer();
        frame.clear_color(vec3(0.2, 0.2, 0.25));
        frame.enable_depth_test(DepthTestFunction::Less);
        frame.viewport(0, 0, uvec2(size.width as _, size.height as _));

        Ok(Self {
            program,
            cube,
            textures,
            scene: Scene::collision_room(),
            player,
            camera,
            aspect: size.width / size.height.max(1.),
            grab_pending: true,
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
        let keyboard = &self.input.keyboard;
        let motion = self.input.mouse.motion();
        self.camera.process_mouse(motion.x, motion.y);

        let axes = vec2(
            keyboard.axis(VirtualKeyCode::A, VirtualKeyCode::D),
            keyboard.axis(VirtualKeyCode::S, VirtualKeyCode::W),
        );
        let right = (self.camera.right() * vec3(1., 0., 1.)).normalize_or_zero();
        self.player.update(
            ctx.dt.as_secs_f32(),
            axes,
            self.camera.flat_front(),
            right,
            &self.scene,
        );
        if keyboard.just_pressed(VirtualKeyCode::E) {
            if let Some(interaction) = self.player.interact(&mut self.scene) {
                tracing::info!("{}", interaction);
            }
        }
        self.camera.position = self.player.position + EYE_HEIGHT;
        self.input.begin_frame();
        Ok(())
    }

    fn render(&mut self, ctx: RenderContext) -> Result<()> {
        if self.grab_pending {
            ctx.set_cursor_grab(true);
            self.grab_pending = false;
        }
        let frame = Framebuffer::backbuffer();
        frame.do_clear(ClearBuffer::COLOR | ClearBuffer::DEPTH);

        self.program.set("view", self.camera.view());
        self.program.set("projection", self.camera.projection(self.aspect));
        self.program.set("tintColor", Vec3::ONE);
        for object in &self.scene.objects {
            let texture = self
                .textures
                .get(&object.kind)
                .ok_or_else(|| eyre!("No texture for {:?}", object.kind))?;
            let (_, uv_scale) = material(object.kind);
            texture.bind_unit(0);
            self.program.set("model", object.model_matrix());
            self.program.set("uvScale", uv_scale);
            self.cube.draw(&self.program, &frame)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    rose_platform::run::<CollisionRoom>("Collision Room")
}
