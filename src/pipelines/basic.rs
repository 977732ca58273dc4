use crate::{
    data_structures::{geometry::QuadVertex, texture::DepthTexture},
    resources::ShaderProgram,
};

/// The opaque scene pipeline used for the ground.
pub fn mk_basic_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    layout: &wgpu::PipelineLayout,
    program: &ShaderProgram,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        "Opaque Scene Pipeline",
        layout,
        color_format,
        Some(wgpu::BlendState::REPLACE),
        &[QuadVertex::desc()],
        program,
    )
}

/// Build a scene pipeline.
///
/// Culling is off so both quads show regardless of winding. The depth test
/// always passes and writes nothing: later draws land on top of earlier ones.
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    program: &ShaderProgram,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &program.vertex,
            entry_point: Some(ShaderProgram::VERTEX_ENTRY),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &program.fragment,
            entry_point: Some(ShaderProgram::FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
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
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthTexture::DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
