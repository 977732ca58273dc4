//! Immutable vertex/index buffers for a textured quad.
//!
//! [`QuadData`] is the validated CPU-side description; [`Geometry`] is the
//! GPU resource created from it once at startup and never written again.

use wgpu::util::DeviceExt;

use crate::error::SetupError;

/// Two triangles sharing the 1-3 diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Positions, texture coordinates and indices of one mesh.
///
/// Construction checks that both attribute streams have the same length and
/// that every index points at an existing vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadData {
    vertices: Vec<QuadVertex>,
    indices: Vec<u32>,
}

impl QuadData {
    pub fn new(
        positions: &[[f32; 3]],
        tex_coords: &[[f32; 2]],
        indices: &[u32],
    ) -> Result<Self, SetupError> {
        if positions.len() != tex_coords.len() {
            return Err(SetupError::AttributeLengthMismatch {
                positions: positions.len(),
                tex_coords: tex_coords.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(SetupError::PartialTriangle(indices.len()));
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= positions.len())
        {
            return Err(SetupError::IndexOutOfRange {
                position,
                index,
                vertices: positions.len(),
            });
        }

        let vertices = positions
            .iter()
            .zip(tex_coords)
            .map(|(&position, &tex_coords)| QuadVertex {
                position,
                tex_coords,
            })
            .collect();
        Ok(Self {
            vertices,
            indices: indices.to_vec(),
        })
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

/// GPU vertex and index buffers of one quad.
#[derive(Debug)]
pub struct Geometry {
    pub name: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_elements: u32,
}

impl Geometry {
    pub fn create(device: &wgpu::Device, name: &str, data: &QuadData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(data.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(data.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!(
            "created geometry `{name}` with {} vertices and {} indices",
            data.vertices().len(),
            data.indices().len()
        );

        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: data.indices().len() as u32,
        }
    }

    pub fn num_elements(&self) -> u32 {
        self.num_elements
    }
}

/// Draw helpers for [`Geometry`] on a render pass.
pub trait DrawGeometry {
    /// Make `geometry` the source of the next indexed draw.
    fn bind_geometry(&mut self, geometry: &Geometry);

    /// Draw every index of the bound `geometry` as `u32` triangles.
    fn draw_geometry(&mut self, geometry: &Geometry);
}

impl DrawGeometry for wgpu::RenderPass<'_> {
    fn bind_geometry(&mut self, geometry: &Geometry) {
        self.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        self.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    fn draw_geometry(&mut self, geometry: &Geometry) {
        self.draw_indexed(0..geometry.num_elements, 0, 0..1);
    }
}
