use bytemuck::{offset_of, Pod, Zeroable};
use glam::{Vec2, Vec3};
use violette::vertex::{VertexAttributes, VertexDesc};
use violette_derive::VertexAttributes;

#[test]
fn works() {
    #[derive(Debug, Default, Clone, Copy, Pod, Zeroable, VertexAttributes)]
    #[repr(C)]
    struct TestVertex {
        pos: [f32; 3],
        uv: [f32; 2],
        entity_id: u32,
    }

    let expected = vec![
        VertexDesc::from_gl_type::<[f32; 3]>(0),
        VertexDesc::from_gl_type::<[f32; 2]>(offset_of!(TestVertex, uv)),
        VertexDesc::from_gl_type::<u32>(offset_of!(TestVertex, entity_id)),
    ];
    assert_eq!(TestVertex::attributes(), expected.as_slice());
}

#[test]
fn field_options() {
    #[derive(Debug, Default, Clone, Copy, Pod, Zeroable, VertexAttributes)]
    #[repr(C)]
    struct LitVertex {
        position: Vec3,
        normal: Vec3,
        #[attribute(ignore)]
        padding: f32,
        uv: Vec2,
        #[attribute(normalized)]
        color: [u8; 4],
    }

    let attributes = LitVertex::attributes();
    assert_eq!(attributes.len(), 4);
    assert_eq!(attributes[2].offset, offset_of!(LitVertex, uv));
    assert_eq!(attributes[2].components, 2);
    assert!(attributes[3].normalized);
    assert!(attributes.iter().all(|d| d.offset != offset_of!(LitVertex, padding)));
}
