use eyre::{Context, Result};
use violette::{
    buffer::{ArrayBuffer, BufferUsage, ElementBuffer},
    framebuffer::Framebuffer,
    program::Program,
    vertex::{DrawMode, VertexArray, VertexAttributes},
};

use crate::geometry::MeshData;

/// GPU copy of a [`MeshData`].
#[derive(Debug)]
pub struct Mesh<Vertex> {
    array: VertexArray,
    vertices: ArrayBuffer<Vertex>,
    indices: Option<ElementBuffer<u32>>,
    mode: DrawMode,
}

impl<Vertex: VertexAttributes> Mesh<Vertex> {
    #[tracing::instrument(skip_all, fields(vertices = data.vertices.len(), indices = data.indices.len()))]
    pub fn new(data: &MeshData<Vertex>) -> Result<Self> {
        let vertices = ArrayBuffer::with_data(&data.vertices)?;
        let mut array = VertexArray::new()?.with_vertex_buffer(&vertices)?;
        let indices = if data.is_indexed() {
            let indices = ElementBuffer::with_data(&data.indices)?;
            array = array.with_element_buffer(&indices)?;
            Some(indices)
        } else {
            None
        };
        Ok(Self {
            array,
            vertices,
            indices,
            mode: data.mode,
        })
    }

    /// Replace the vertices, keeping the layout. Used for meshes rebuilt every frame.
    pub fn update_vertices(&self, vertices: &[Vertex]) -> Result<()> {
        self.vertices.set_data(vertices, BufferUsage::Dynamic)?;
        Ok(())
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn draw(&self, program: &Program, framebuffer: &Framebuffer) -> Result<()> {
        match &self.indices {
            Some(indices) => framebuffer.draw_elements(program, &self.array, indices, self.mode),
            None => framebuffer.draw_arrays(program, &self.array, self.mode, self.vertices.len()),
        }
        .context("Cannot draw mesh")
    }
}
