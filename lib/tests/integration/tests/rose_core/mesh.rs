use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use rose_core::{
    geometry::{Corner, MeshBuilder},
    mesh::Mesh,
    terrain::{Heightmap, TerrainSettings},
};
use rose_platform::PhysicalSize;
use violette::{
    framebuffer::{ClearBuffer, Framebuffer},
    program::Program,
};
use violette_derive::VertexAttributes;

use crate::tests::IntegrationTest;

#[derive(Debug, Default, Clone, Copy, Zeroable, Pod, VertexAttributes)]
#[repr(C)]
struct Vertex {
    position: Vec3,
}

const VERTEX: &str = "#version 330 core
layout(location = 0) in vec3 aPosition;
void main() { gl_Position = vec4(aPosition * 0.5, 1.0); }
";

const FRAGMENT: &str = "#version 330 core
out vec4 FragColor;
uniform vec4 uColor;
void main() { FragColor = uColor; }
";

fn program() -> Program {
    let program = Program::from_sources(VERTEX, FRAGMENT).unwrap();
    program.set("uColor", Vec4::new(1., 0.5, 0.25, 1.));
    program
}

fn test_indexed_draw(_: PhysicalSize<f32>) {
    let program = program();
    let frame = Framebuffer::backbuffer();
    frame.clear_color(Vec3::ZERO);
    frame.do_clear(ClearBuffer::COLOR);
    let builder = MeshBuilder::new(|c: Corner| Vertex {
        position: c.position,
    });
    for data in [builder.quad(Vec2::ONE), builder.cube()] {
        assert!(data.is_indexed());
        Mesh::new(&data).unwrap().draw(&program, &frame).unwrap();
    }
}

fn test_unindexed_draw(_: PhysicalSize<f32>) {
    let program = program();
    let frame = Framebuffer::backbuffer();
    let map = Heightmap::from_fn(8, |x, z| (x + z) as f32 / 14.);
    let data = map.build(&TerrainSettings::default(), |c| Vertex {
        position: c.position,
    });
    let mesh = Mesh::new(&data).unwrap();
    mesh.draw(&program, &frame).unwrap();

    let flat: Vec<_> = data
        .vertices
        .iter()
        .map(|v| Vertex {
            position: v.position * Vec3::new(1., 0., 1.),
        })
        .collect();
    mesh.update_vertices(&flat).unwrap();
    mesh.draw(&program, &frame).unwrap();
}

inventory::submit!(IntegrationTest {
    name: "Indexed mesh draw",
    test_fn: test_indexed_draw,
});

inventory::submit!(IntegrationTest {
    name: "Unindexed mesh draw",
    test_fn: test_unindexed_draw,
});
