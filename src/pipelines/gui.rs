//! Overlay pipelines for the control panel: flat-colour quads, then glyphs.

use std::mem;

use crate::{
    data_structures::texture::texture_bind_group_layout,
    pipelines::text::{AtlasTexture, GlyphVertex, mk_text_pipeline},
    text::GlyphAtlas,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PanelVertex {
    /// Normalised device coordinates.
    pub position: [f32; 2],
    pub colour: [f32; 4],
}

impl PanelVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<PanelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

fn mk_pipeline_layout(device: &wgpu::Device) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Panel Render Pipeline Layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    })
}

/// Premultiplied OVER blending, no depth, no culling.
pub(super) fn mk_overlay_pipeline(
    device: &wgpu::Device,
    label: &str,
    color_format: wgpu::TextureFormat,
    render_pipeline_layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(render_pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState {
                    color: wgpu::BlendComponent::OVER,
                    alpha: wgpu::BlendComponent::OVER,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
        cache: None,
    })
}

/// Vertex and index buffers rewritten every frame, grown when too small.
#[derive(Debug)]
struct DynamicMesh {
    label: &'static str,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl DynamicMesh {
    const INITIAL_QUADS: u64 = 64;

    fn new(device: &wgpu::Device, label: &'static str, vertex_size: usize) -> Self {
        Self {
            label,
            vertex_buffer: mk_buffer(
                device,
                &format!("{label} Vertex Buffer"),
                Self::INITIAL_QUADS * 4 * vertex_size as u64,
                wgpu::BufferUsages::VERTEX,
            ),
            index_buffer: mk_buffer(
                device,
                &format!("{label} Index Buffer"),
                Self::INITIAL_QUADS * 6 * mem::size_of::<u16>() as u64,
                wgpu::BufferUsages::INDEX,
            ),
            index_count: 0,
        }
    }

    fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertex_bytes: &[u8],
        indices: &[u16],
    ) {
        self.index_count = indices.len() as u32;
        if indices.is_empty() {
            return;
        }
        // Index writes must be a multiple of four bytes.
        let mut index_bytes = bytemuck::cast_slice::<u16, u8>(indices).to_vec();
        index_bytes.resize(index_bytes.len().next_multiple_of(4), 0);

        if self.vertex_buffer.size() < vertex_bytes.len() as u64 {
            self.vertex_buffer = mk_buffer(
                device,
                &format!("{} Vertex Buffer", self.label),
                (vertex_bytes.len() as u64).next_power_of_two(),
                wgpu::BufferUsages::VERTEX,
            );
        }
        if self.index_buffer.size() < index_bytes.len() as u64 {
            self.index_buffer = mk_buffer(
                device,
                &format!("{} Index Buffer", self.label),
                (index_bytes.len() as u64).next_power_of_two(),
                wgpu::BufferUsages::INDEX,
            );
        }
        queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        queue.write_buffer(&self.index_buffer, 0, &index_bytes);
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Everything needed to draw the panel: both overlay pipelines, the glyph
/// atlas on the CPU and GPU, and a growable mesh per pipeline.
#[derive(Debug)]
pub struct PanelPipeline {
    shapes: wgpu::RenderPipeline,
    glyphs: wgpu::RenderPipeline,
    atlas: GlyphAtlas,
    atlas_texture: AtlasTexture,
    shape_mesh: DynamicMesh,
    glyph_mesh: DynamicMesh,
}

impl PanelPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        atlas: GlyphAtlas,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Panel Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("panel.wgsl").into()),
        });
        let shapes = mk_overlay_pipeline(
            device,
            "Panel Render Pipeline",
            color_format,
            &mk_pipeline_layout(device),
            &shader,
            PanelVertex::desc(),
        );

        let atlas_layout = texture_bind_group_layout(device);
        let glyphs = mk_text_pipeline(device, color_format, &atlas_layout);
        let atlas_texture = AtlasTexture::new(device, queue, &atlas_layout, &atlas);

        Self {
            shapes,
            glyphs,
            atlas,
            atlas_texture,
            shape_mesh: DynamicMesh::new(device, "Panel", mem::size_of::<PanelVertex>()),
            glyph_mesh: DynamicMesh::new(device, "Glyph", mem::size_of::<GlyphVertex>()),
        }
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Draw the quads, then the glyphs, over whatever `target` already holds.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        shapes: (&[PanelVertex], &[u16]),
        glyphs: (&[GlyphVertex], &[u16]),
    ) {
        self.shape_mesh
            .upload(device, queue, bytemuck::cast_slice(shapes.0), shapes.1);
        self.glyph_mesh
            .upload(device, queue, bytemuck::cast_slice(glyphs.0), glyphs.1);
        if self.shape_mesh.index_count == 0 && self.glyph_mesh.index_count == 0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Panel Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        if self.shape_mesh.index_count > 0 {
            render_pass.set_pipeline(&self.shapes);
            self.shape_mesh.draw(&mut render_pass);
        }
        if self.glyph_mesh.index_count > 0 {
            render_pass.set_pipeline(&self.glyphs);
            render_pass.set_bind_group(0, &self.atlas_texture.bind_group, &[]);
            self.glyph_mesh.draw(&mut render_pass);
        }
    }
}

fn mk_buffer(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
